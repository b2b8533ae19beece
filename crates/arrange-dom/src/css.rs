//! String-level `element.style` access.
//!
//! Hosts and the reorder engine read and write styles by CSS property name,
//! the way script does. Values are parsed into the typed [`Style`] and the
//! document relayouts as needed.

use crate::document::{Document, NodeId};
use crate::error::DomResult;
use crate::style::{
    Clear, Display, Edges, FlexDirection, Float, Length, PointerEvents, Position, Style,
};
use crate::transition::Transition;
use arrange_core::geometry::Matrix2D;
use arrange_core::math::Vec2;

impl Document {
    /// Computed value of a CSS property, like `getComputedStyle`.
    ///
    /// Unknown properties and missing nodes read as the empty string.
    pub fn css(&self, node: NodeId, property: &str) -> String {
        let Some(style) = self.style(node) else {
            return String::new();
        };
        match property {
            "display" => style.display.as_str().to_string(),
            "position" => style.position.as_str().to_string(),
            "float" => style.float.as_str().to_string(),
            "clear" => style.clear.as_str().to_string(),
            "flex-direction" => style.flex_direction.as_str().to_string(),
            "grid-template-columns" => {
                if style.display != Display::Grid || style.grid_columns == 0 {
                    "none".to_string()
                } else {
                    let track = self.layout_rect(node).width / style.grid_columns as f32;
                    vec![format!("{}px", track); style.grid_columns].join(" ")
                }
            }
            "transform" => match style.transform {
                Some(_) => self.computed_transform(node).to_css(),
                None => "none".to_string(),
            },
            "transform-origin" => {
                let origin = style.transform_origin.unwrap_or(Vec2::splat(0.5));
                format!("{}% {}%", origin.x * 100.0, origin.y * 100.0)
            }
            "transition" => style
                .transition
                .as_ref()
                .map(Transition::to_css)
                .unwrap_or_default(),
            "opacity" => style.opacity.to_string(),
            "z-index" => style
                .z_index
                .map(|z| z.to_string())
                .unwrap_or_else(|| "auto".to_string()),
            "pointer-events" => match style.pointer_events {
                PointerEvents::Auto => "auto".to_string(),
                PointerEvents::None => "none".to_string(),
            },
            "will-change" => style.will_change.clone().unwrap_or_else(|| "auto".to_string()),
            "user-select" => style.user_select.clone().unwrap_or_else(|| "auto".to_string()),
            "box-sizing" => (if style.border_box { "border-box" } else { "content-box" }).to_string(),
            "width" => format!("{}px", self.layout_rect(node).width),
            "height" => format!("{}px", self.layout_rect(node).height),
            "top" => style.top.to_css(),
            "left" => style.left.to_css(),
            "margin-top" => format!("{}px", style.margin.top),
            "margin-right" => format!("{}px", style.margin.right),
            "margin-bottom" => format!("{}px", style.margin.bottom),
            "margin-left" => format!("{}px", style.margin.left),
            "gap" => format!("{}px", style.gap),
            _ => String::new(),
        }
    }

    /// Set an inline style property, like `element.style[prop] = value`.
    ///
    /// An empty value restores the default. Unknown properties and values
    /// that fail to parse are ignored with a warning, as a browser would.
    pub fn set_css(&mut self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        let value = value.trim();
        let defaults = Style::default();

        match property {
            "transform" => {
                let Some(transform) = parse_transform(value) else {
                    invalid(property, value);
                    return Ok(());
                };
                return self.set_transform(node, transform);
            }
            "transition" => {
                let transition = Transition::parse(value);
                if transition.is_none() && !value.is_empty() && value != "none" {
                    invalid(property, value);
                    return Ok(());
                }
                return self.set_transition(node, transition);
            }
            _ => {}
        }

        let mut parsed = true;
        self.update_style(node, |style| match property {
            "display" => match Display::parse(value) {
                Some(display) => style.display = display,
                None => parsed = false,
            },
            "position" => match Position::parse(value) {
                Some(position) => style.position = position,
                None => parsed = false,
            },
            "float" => match Float::parse(value) {
                Some(float) => style.float = float,
                None => parsed = false,
            },
            "clear" => match Clear::parse(value) {
                Some(clear) => style.clear = clear,
                None => parsed = false,
            },
            "flex-direction" => match FlexDirection::parse(value) {
                Some(direction) => style.flex_direction = direction,
                None => parsed = false,
            },
            "grid-template-columns" => match parse_track_count(value) {
                Some(count) => style.grid_columns = count,
                None => parsed = false,
            },
            "width" | "height" | "top" | "left" => match Length::parse(value) {
                Some(length) => match property {
                    "width" => style.width = length,
                    "height" => style.height = length,
                    "top" => style.top = length,
                    _ => style.left = length,
                },
                None => parsed = false,
            },
            "margin" => match Length::parse(value) {
                Some(length) => style.margin = Edges::all(length.px().unwrap_or(0.0)),
                None => parsed = false,
            },
            "gap" => match Length::parse(value) {
                Some(length) => style.gap = length.px().unwrap_or(0.0),
                None => parsed = false,
            },
            "box-sizing" => match value {
                "" | "content-box" => style.border_box = false,
                "border-box" => style.border_box = true,
                _ => parsed = false,
            },
            "transform-origin" => match parse_origin(value) {
                Some(origin) => style.transform_origin = origin,
                None => parsed = false,
            },
            "opacity" => match value {
                "" => style.opacity = defaults.opacity,
                v => match v.parse::<f32>() {
                    Ok(opacity) => style.opacity = opacity.clamp(0.0, 1.0),
                    Err(_) => parsed = false,
                },
            },
            "z-index" => match value {
                "" | "auto" => style.z_index = None,
                v => match v.parse::<i32>() {
                    Ok(z) => style.z_index = Some(z),
                    Err(_) => parsed = false,
                },
            },
            "pointer-events" => match value {
                "" | "auto" => style.pointer_events = PointerEvents::Auto,
                "none" => style.pointer_events = PointerEvents::None,
                _ => parsed = false,
            },
            "will-change" => style.will_change = non_empty(value),
            "user-select" => style.user_select = non_empty(value),
            _ => parsed = false,
        })?;

        if !parsed {
            invalid(property, value);
        }
        Ok(())
    }
}

fn invalid(property: &str, value: &str) {
    tracing::warn!("Ignoring style {}: {:?}", property, value);
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(token: &str) -> Option<f32> {
    let token = token.trim();
    let token = token.strip_suffix("px").unwrap_or(token);
    token.parse().ok()
}

/// Parse a `transform` value.
///
/// Returns `Some(None)` for `none`/empty and `None` for unsupported input.
/// Translation, scale and `matrix()` are understood; the z components of
/// 3D translations are dropped.
pub fn parse_transform(value: &str) -> Option<Option<Matrix2D>> {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return Some(None);
    }

    let mut matrix = Matrix2D::IDENTITY;
    let mut rest = value;
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = rest.find(')')?;
        let name = rest[..open].trim();
        let args: Vec<f32> = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .map(parse_number)
            .collect::<Option<_>>()?;

        let step = match (name, args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Matrix2D::new(*a, *b, *c, *d, *e, *f),
            ("translate", [x]) => Matrix2D::translation(*x, 0.0),
            ("translate", [x, y]) | ("translate3d", [x, y, _]) => Matrix2D::translation(*x, *y),
            ("translateX", [x]) => Matrix2D::translation(*x, 0.0),
            ("translateY", [y]) => Matrix2D::translation(0.0, *y),
            ("translateZ", [_]) => Matrix2D::IDENTITY,
            ("scale", [s]) => Matrix2D::scale(*s, *s),
            ("scale", [x, y]) => Matrix2D::scale(*x, *y),
            ("scaleX", [x]) => Matrix2D::scale(*x, 1.0),
            ("scaleY", [y]) => Matrix2D::scale(1.0, *y),
            _ => return None,
        };
        matrix = matrix.then(&step);
        rest = rest[close + 1..].trim_start();
    }
    Some(Some(matrix))
}

/// Count the tracks of a `grid-template-columns` value.
fn parse_track_count(value: &str) -> Option<usize> {
    if value.is_empty() || value == "none" {
        return Some(0);
    }
    if let Some(args) = value.strip_prefix("repeat(").and_then(|v| v.strip_suffix(')')) {
        return args.split(',').next()?.trim().parse().ok();
    }
    Some(value.split_whitespace().count())
}

/// `transform-origin` as fractions of the box; `Some(None)` restores the default.
fn parse_origin(value: &str) -> Option<Option<Vec2>> {
    if value.is_empty() {
        return Some(None);
    }
    let mut parts = value.split_whitespace().map(|token| match token {
        "left" | "top" => Some(0.0),
        "center" => Some(0.5),
        "right" | "bottom" => Some(1.0),
        t => t.strip_suffix('%')?.parse::<f32>().ok().map(|p| p / 100.0),
    });
    let x = parts.next()??;
    let y = parts.next().unwrap_or(Some(0.5))?;
    Some(Some(Vec2::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transform_functions() {
        assert_eq!(parse_transform("none"), Some(None));
        assert_eq!(
            parse_transform("translate3d(12px, -4px, 0)"),
            Some(Some(Matrix2D::translation(12.0, -4.0)))
        );
        assert_eq!(
            parse_transform("matrix(1,0,0,1,5,6)"),
            Some(Some(Matrix2D::translation(5.0, 6.0)))
        );
        let composed = parse_transform("translate(10px,0) scale(2)").unwrap().unwrap();
        assert_eq!(composed.a, 2.0);
        assert_eq!(composed.e, 10.0);
        assert_eq!(parse_transform("rotate(45deg)"), None);
    }

    #[test]
    fn test_translate_z_is_identity_but_present() {
        let parsed = parse_transform("translateZ(0)").unwrap();
        assert_eq!(parsed, Some(Matrix2D::IDENTITY));
    }

    #[test]
    fn test_track_count() {
        assert_eq!(parse_track_count("none"), Some(0));
        assert_eq!(parse_track_count("100px 100px 100px"), Some(3));
        assert_eq!(parse_track_count("repeat(4, 1fr)"), Some(4));
    }

    #[test]
    fn test_origin() {
        assert_eq!(parse_origin("25% 75%"), Some(Some(Vec2::new(0.25, 0.75))));
        assert_eq!(parse_origin("left"), Some(Some(Vec2::new(0.0, 0.5))));
        assert_eq!(parse_origin(""), Some(None));
    }

    #[test]
    fn test_set_and_read_back() {
        let mut doc = Document::new(400.0, 400.0).unwrap();
        let el = doc.create_element("div").unwrap();
        doc.append_child(doc.body(), el).unwrap();

        doc.set_css(el, "display", "none").unwrap();
        assert_eq!(doc.css(el, "display"), "none");
        doc.set_css(el, "display", "").unwrap();
        assert_eq!(doc.css(el, "display"), "block");

        doc.set_css(el, "transform", "translate3d(3px,4px,0)").unwrap();
        assert_eq!(doc.css(el, "transform"), "matrix(1,0,0,1,3,4)");
        doc.set_css(el, "transform", "").unwrap();
        assert_eq!(doc.css(el, "transform"), "none");

        doc.set_css(el, "position", "sideways").unwrap();
        assert_eq!(doc.css(el, "position"), "static");
    }
}
