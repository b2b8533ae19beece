//! Arrange DOM - a headless element tree for the reorder engine.
//!
//! The [`Document`] stands in for a browser DOM: elements carry tags,
//! classes, attributes and inline styles, are laid out with Taffy, and
//! report client rectangles that include transforms and running
//! transitions on a virtual clock.
//!
//! # Example
//!
//! ```
//! use arrange_dom::{Document, Style};
//!
//! let mut doc = Document::new(320.0, 480.0).unwrap();
//! let list = doc.create_element("ul").unwrap();
//! doc.append_child(doc.body(), list).unwrap();
//! for _ in 0..3 {
//!     let item = doc.create_element_with("li", Style::new().height(40.0)).unwrap();
//!     doc.append_child(list, item).unwrap();
//! }
//! assert_eq!(doc.layout_rect(list).height, 120.0);
//! ```

pub mod css;
pub mod dirty;
pub mod document;
pub mod element;
pub mod error;
pub mod query;
pub mod selector;
pub mod style;
pub mod transition;

pub use dirty::DirtyFlags;
pub use document::{Document, DomNode, NodeId};
pub use element::Element;
pub use error::{DomError, DomResult};
pub use query::RectOptions;
pub use selector::{SelectorError, SelectorList};
pub use style::{
    Clear, Display, Edges, FlexDirection, Float, Length, PointerEvents, Position, Style,
};
pub use transition::{Easing, Transition};
