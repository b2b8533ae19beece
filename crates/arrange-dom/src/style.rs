//! Element style: the CSS subset the reorder engine reads and writes.
//!
//! Layout-affecting properties are lowered onto a `taffy::Style`; the rest
//! (transform, transition, opacity, pointer-events, ...) are kept for the
//! document's own geometry and hit testing.

use crate::transition::Transition;
use arrange_core::geometry::Matrix2D;
use arrange_core::math::Vec2;
use taffy::{
    Dimension, Display as TaffyDisplay, FlexDirection as TaffyFlexDirection, FlexWrap,
    LengthPercentage as TaffyLengthPercentage, LengthPercentageAuto as TaffyLengthPercentageAuto,
    Position as TaffyPosition, Rect as TaffyRect, Size,
    prelude::fr,
    style::{Style as TaffyStyle, TrackSizingFunction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    Table,
    None,
}

impl Display {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim() {
            "" | "block" => Display::Block,
            "inline" => Display::Inline,
            "inline-block" => Display::InlineBlock,
            "flex" => Display::Flex,
            "grid" => Display::Grid,
            "table" => Display::Table,
            "none" => Display::None,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::Inline => "inline",
            Display::InlineBlock => "inline-block",
            Display::Flex => "flex",
            Display::Grid => "grid",
            Display::Table => "table",
            Display::None => "none",
        }
    }

    /// Inline-level boxes flow horizontally inside a block parent.
    pub fn is_inline_level(&self) -> bool {
        matches!(self, Display::Inline | Display::InlineBlock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim() {
            "" | "static" => Position::Static,
            "relative" => Position::Relative,
            "absolute" => Position::Absolute,
            "fixed" => Position::Fixed,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Static => "static",
            Position::Relative => "relative",
            Position::Absolute => "absolute",
            Position::Fixed => "fixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

impl Float {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim() {
            "" | "none" => Float::None,
            "left" => Float::Left,
            "right" => Float::Right,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Float::None => "none",
            Float::Left => "left",
            Float::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl Clear {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim() {
            "" | "none" => Clear::None,
            "left" => Clear::Left,
            "right" => Clear::Right,
            "both" => Clear::Both,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Clear::None => "none",
            Clear::Left => "left",
            Clear::Right => "right",
            Clear::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.trim() {
            "" | "row" => FlexDirection::Row,
            "row-reverse" => FlexDirection::RowReverse,
            "column" => FlexDirection::Column,
            "column-reverse" => FlexDirection::ColumnReverse,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::RowReverse => "row-reverse",
            FlexDirection::Column => "column",
            FlexDirection::ColumnReverse => "column-reverse",
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self, FlexDirection::Column | FlexDirection::ColumnReverse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
    #[default]
    Auto,
    None,
}

/// A length that may be `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    #[default]
    Auto,
    Px(f32),
    Percent(f32),
}

impl Length {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value == "auto" {
            return Some(Length::Auto);
        }
        if let Some(pct) = value.strip_suffix('%') {
            return pct.trim().parse().ok().map(|p: f32| Length::Percent(p / 100.0));
        }
        let number = value.strip_suffix("px").unwrap_or(value);
        number.trim().parse().ok().map(Length::Px)
    }

    pub fn px(&self) -> Option<f32> {
        match self {
            Length::Px(v) => Some(*v),
            _ => None,
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            Length::Auto => "auto".to_string(),
            Length::Px(v) => format!("{}px", v),
            Length::Percent(p) => format!("{}%", p * 100.0),
        }
    }

    fn to_dimension(self) -> Dimension {
        match self {
            Length::Auto => Dimension::Auto,
            Length::Px(v) => Dimension::Length(v),
            Length::Percent(p) => Dimension::Percent(p),
        }
    }

    fn to_inset(self) -> TaffyLengthPercentageAuto {
        match self {
            Length::Auto => TaffyLengthPercentageAuto::Auto,
            Length::Px(v) => TaffyLengthPercentageAuto::Length(v),
            Length::Percent(p) => TaffyLengthPercentageAuto::Percent(p),
        }
    }
}

/// Per-side pixel values in CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    fn to_length_percentage(self) -> TaffyRect<TaffyLengthPercentage> {
        TaffyRect {
            left: TaffyLengthPercentage::Length(self.left),
            right: TaffyLengthPercentage::Length(self.right),
            top: TaffyLengthPercentage::Length(self.top),
            bottom: TaffyLengthPercentage::Length(self.bottom),
        }
    }

    fn to_margin(self) -> TaffyRect<TaffyLengthPercentageAuto> {
        TaffyRect {
            left: TaffyLengthPercentageAuto::Length(self.left),
            right: TaffyLengthPercentageAuto::Length(self.right),
            top: TaffyLengthPercentageAuto::Length(self.top),
            bottom: TaffyLengthPercentageAuto::Length(self.bottom),
        }
    }
}

/// Computed style of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub display: Display,
    pub position: Position,
    pub float: Float,
    pub clear: Clear,
    pub flex_direction: FlexDirection,
    /// Number of tracks in `grid-template-columns`; `0` means `none`.
    pub grid_columns: usize,
    pub width: Length,
    pub height: Length,
    pub top: Length,
    pub left: Length,
    pub margin: Edges,
    pub padding: Edges,
    pub border: Edges,
    pub gap: f32,
    pub border_box: bool,

    pub transform: Option<Matrix2D>,
    /// `transform-origin` as fractions of the border box; `None` is `50% 50%`.
    pub transform_origin: Option<Vec2>,
    pub transition: Option<Transition>,
    pub opacity: f32,
    pub z_index: Option<i32>,
    pub pointer_events: PointerEvents,
    pub will_change: Option<String>,
    pub user_select: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Block,
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            flex_direction: FlexDirection::Row,
            grid_columns: 0,
            width: Length::Auto,
            height: Length::Auto,
            top: Length::Auto,
            left: Length::Auto,
            margin: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),
            gap: 0.0,
            border_box: false,
            transform: None,
            transform_origin: None,
            transition: None,
            opacity: 1.0,
            z_index: None,
            pointer_events: PointerEvents::Auto,
            will_change: None,
            user_select: None,
        }
    }
}

impl Style {
    /// Create a new default style.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn flex(mut self, direction: FlexDirection) -> Self {
        self.display = Display::Flex;
        self.flex_direction = direction;
        self
    }

    pub fn grid(mut self, columns: usize) -> Self {
        self.display = Display::Grid;
        self.grid_columns = columns;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Length::Px(width);
        self.height = Length::Px(height);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Length::Px(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Length::Px(height);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Position the box at `left`/`top` with the given scheme.
    pub fn inset(mut self, left: f32, top: f32) -> Self {
        self.left = Length::Px(left);
        self.top = Length::Px(top);
        self
    }

    pub fn margin(mut self, margin: Edges) -> Self {
        self.margin = margin;
        self
    }

    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn float(mut self, float: Float) -> Self {
        self.float = float;
        self
    }

    pub fn clear(mut self, clear: Clear) -> Self {
        self.clear = clear;
        self
    }

    pub fn transform(mut self, transform: Matrix2D) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Out-of-flow boxes do not take part in their parent's flow.
    pub fn is_out_of_flow(&self) -> bool {
        matches!(self.position, Position::Absolute | Position::Fixed)
    }

    /// Participates in a horizontal run when its parent is a block container.
    pub fn flows_inline(&self) -> bool {
        self.display.is_inline_level() || self.float != Float::None
    }

    /// Lower onto a taffy style.
    ///
    /// `inline_children` is set when every in-flow child flows inline; the
    /// block container then lays its children out as a wrapping row.
    pub(crate) fn to_taffy(&self, inline_children: bool) -> TaffyStyle {
        let mut layout = TaffyStyle {
            size: Size {
                width: self.width.to_dimension(),
                height: self.height.to_dimension(),
            },
            margin: self.margin.to_margin(),
            padding: self.padding.to_length_percentage(),
            border: self.border.to_length_percentage(),
            gap: Size {
                width: TaffyLengthPercentage::Length(self.gap),
                height: TaffyLengthPercentage::Length(self.gap),
            },
            flex_shrink: 0.0,
            ..Default::default()
        };

        layout.display = match self.display {
            Display::None => TaffyDisplay::None,
            Display::Flex => TaffyDisplay::Flex,
            Display::Grid => TaffyDisplay::Grid,
            Display::Block | Display::Table | Display::Inline | Display::InlineBlock => {
                TaffyDisplay::Flex
            }
        };

        match self.display {
            Display::Flex => {
                layout.flex_direction = match self.flex_direction {
                    FlexDirection::Row => TaffyFlexDirection::Row,
                    FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
                    FlexDirection::Column => TaffyFlexDirection::Column,
                    FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
                };
            }
            Display::Grid => {
                let tracks: Vec<TrackSizingFunction> =
                    (0..self.grid_columns.max(1)).map(|_| fr(1.0)).collect();
                layout.grid_template_columns = tracks;
            }
            _ if inline_children => {
                layout.flex_direction = TaffyFlexDirection::Row;
                layout.flex_wrap = FlexWrap::Wrap;
            }
            // Block flow stacks as a stretched column; flex items never
            // collapse margins through an empty child.
            _ => layout.flex_direction = TaffyFlexDirection::Column,
        }

        layout.position = match self.position {
            Position::Absolute | Position::Fixed => TaffyPosition::Absolute,
            Position::Static | Position::Relative => TaffyPosition::Relative,
        };
        if self.position != Position::Static {
            layout.inset = TaffyRect {
                left: self.left.to_inset(),
                top: self.top.to_inset(),
                right: TaffyLengthPercentageAuto::Auto,
                bottom: TaffyLengthPercentageAuto::Auto,
            };
        }

        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_parse() {
        assert_eq!(Length::parse("12px"), Some(Length::Px(12.0)));
        assert_eq!(Length::parse("12"), Some(Length::Px(12.0)));
        assert_eq!(Length::parse("50%"), Some(Length::Percent(0.5)));
        assert_eq!(Length::parse("auto"), Some(Length::Auto));
        assert_eq!(Length::parse("wide"), None);
    }

    #[test]
    fn test_inline_children_become_wrapping_row() {
        let style = Style::new();
        let layout = style.to_taffy(true);
        assert_eq!(layout.display, TaffyDisplay::Flex);
        assert_eq!(layout.flex_wrap, FlexWrap::Wrap);
        let block = style.to_taffy(false);
        assert_eq!(block.display, TaffyDisplay::Flex);
        assert_eq!(block.flex_direction, TaffyFlexDirection::Column);
    }

    #[test]
    fn test_fixed_maps_to_absolute() {
        let layout = Style::new()
            .position(Position::Fixed)
            .inset(5.0, 7.0)
            .to_taffy(false);
        assert_eq!(layout.position, TaffyPosition::Absolute);
        assert_eq!(layout.inset.left, TaffyLengthPercentageAuto::Length(5.0));
    }
}
