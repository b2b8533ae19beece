//! CSS transform transitions evaluated against the document clock.
//!
//! Only `transform` (or `all`) transitions are emulated; every other property
//! changes instantly.

use arrange_core::geometry::Matrix2D;

/// Timing functions accepted in `transition` declarations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Ease
    }
}

impl Easing {
    /// Parse a CSS timing-function keyword or `cubic-bezier()` call.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input {
            "linear" => return Some(Easing::Linear),
            "ease" => return Some(Easing::Ease),
            "ease-in" => return Some(Easing::EaseIn),
            "ease-out" => return Some(Easing::EaseOut),
            "ease-in-out" => return Some(Easing::EaseInOut),
            _ => {}
        }
        let args = input.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
        let values: Vec<f32> = args
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        match values.as_slice() {
            [x1, y1, x2, y2] if (0.0..=1.0).contains(x1) && (0.0..=1.0).contains(x2) => {
                Some(Easing::CubicBezier(*x1, *y1, *x2, *y2))
            }
            _ => None,
        }
    }

    fn control_points(&self) -> (f32, f32, f32, f32) {
        match *self {
            Easing::Linear => (0.0, 0.0, 1.0, 1.0),
            Easing::Ease => (0.25, 0.1, 0.25, 1.0),
            Easing::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Apply the easing to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if matches!(self, Easing::Linear) || t == 0.0 || t == 1.0 {
            return t;
        }
        let (x1, y1, x2, y2) = self.control_points();
        let bezier = |p1: f32, p2: f32, s: f32| {
            let inv = 1.0 - s;
            3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
        };

        // x(s) is monotonic for x1, x2 in [0, 1]; bisect for s with x(s) = t.
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        let mut s = t;
        for _ in 0..32 {
            let x = bezier(x1, x2, s);
            if (x - t).abs() < 1e-5 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        bezier(y1, y2, s)
    }

    pub fn to_css(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::Ease => "ease".to_string(),
            Easing::EaseIn => "ease-in".to_string(),
            Easing::EaseOut => "ease-out".to_string(),
            Easing::EaseInOut => "ease-in-out".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                format!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

/// A parsed `transition` declaration, e.g. `transform 150ms ease-out`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub property: String,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Transition {
    pub fn new(property: impl Into<String>, duration_ms: f64, easing: Easing) -> Self {
        Self {
            property: property.into(),
            duration_ms,
            easing,
        }
    }

    /// Parse a single-property transition shorthand.
    ///
    /// Returns `None` for an empty declaration or an unknown token.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input == "none" {
            return None;
        }

        // `cubic-bezier(...)` contains spaces after commas, keep it whole.
        let (head, easing) = match input.find("cubic-bezier(") {
            Some(pos) => (&input[..pos], Some(Easing::parse(&input[pos..])?)),
            None => (input, None),
        };

        let mut transition = Transition::new("all", 0.0, easing.unwrap_or_default());
        let mut saw_duration = false;
        for token in head.split_whitespace() {
            if let Some(ms) = parse_time(token) {
                if saw_duration {
                    // Second time value is the delay, which we do not emulate.
                    continue;
                }
                transition.duration_ms = ms;
                saw_duration = true;
            } else if let Some(easing) = Easing::parse(token) {
                transition.easing = easing;
            } else {
                transition.property = token.to_string();
            }
        }
        Some(transition)
    }

    /// True if this transition animates `transform`.
    pub fn covers_transform(&self) -> bool {
        self.duration_ms > 0.0 && (self.property == "transform" || self.property == "all")
    }

    pub fn to_css(&self) -> String {
        format!(
            "{} {}ms {}",
            self.property,
            self.duration_ms,
            self.easing.to_css()
        )
    }
}

fn parse_time(token: &str) -> Option<f64> {
    if let Some(ms) = token.strip_suffix("ms") {
        return ms.parse().ok();
    }
    token.strip_suffix('s')?.parse::<f64>().ok().map(|s| s * 1000.0)
}

/// A running transform transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTransition {
    pub from: Matrix2D,
    pub to: Matrix2D,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl ActiveTransition {
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms >= self.start_ms + self.duration_ms
    }

    /// Interpolated transform at `now_ms`.
    pub fn value_at(&self, now_ms: f64) -> Matrix2D {
        let eased = self.easing.apply(self.progress(now_ms));
        self.from.lerp(&self.to, eased)
    }
}
