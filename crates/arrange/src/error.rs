//! Error types for the reorder engine.

use crate::sortable::SortableId;
use arrange_dom::{DomError, NodeId};

/// Errors returned by [`SortableSystem`](crate::SortableSystem) registration
/// and lookups. Drag handling itself never fails; denials are control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortableError {
    /// The element does not exist in the document.
    NotAnElement(NodeId),
    /// A container is already registered for this element.
    AlreadyRegistered { element: NodeId, existing: SortableId },
    /// No container with this id is registered.
    UnknownSortable(SortableId),
    /// A document operation failed.
    Dom(DomError),
}

impl std::fmt::Display for SortableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortableError::NotAnElement(node) => {
                write!(f, "{:?} is not an element of this document", node)
            }
            SortableError::AlreadyRegistered { element, existing } => {
                write!(f, "{:?} is already sortable as {:?}", element, existing)
            }
            SortableError::UnknownSortable(id) => write!(f, "Sortable {:?} is not registered", id),
            SortableError::Dom(err) => write!(f, "Document error: {}", err),
        }
    }
}

impl std::error::Error for SortableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SortableError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for SortableError {
    fn from(err: DomError) -> Self {
        SortableError::Dom(err)
    }
}

pub type SortableResult<T> = Result<T, SortableError>;

/// Log-and-continue for best-effort document writes.
pub(crate) trait DomResultExt {
    fn or_trace(self, what: &str);
}

impl DomResultExt for Result<(), DomError> {
    fn or_trace(self, what: &str) {
        if let Err(err) = self {
            tracing::trace!("{} failed: {}", what, err);
        }
    }
}
