//! Transform composition and parsing.
//!
//! Elements may carry a static base transform string from the template and a
//! dynamic rotation from the resolved geometry. [`combine`] joins them into
//! one transform string; [`parse`] turns such a string into an [`Affine`]
//! the rasterizer and surface measurement apply about the element centre.

use layoutkit_core::RenderError;

/// Joins a base transform and a rotation, base first.
///
/// Returns `None` when neither contributes. A rotation of exactly zero
/// contributes nothing.
pub fn combine(base: Option<&str>, rotation_degrees: Option<f64>) -> Option<String> {
    let base = base.map(str::trim).filter(|b| !b.is_empty());
    let rotation = rotation_degrees
        .filter(|r| *r != 0.0 && r.is_finite())
        .map(|r| format!("rotate({}deg)", r));

    match (base, rotation) {
        (None, None) => None,
        (Some(b), None) => Some(b.to_string()),
        (None, Some(r)) => Some(r),
        (Some(b), Some(r)) => Some(format!("{} {}", b, r)),
    }
}

/// 2D affine matrix: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self * other`: `other` is applied to points first.
    pub fn then_local(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Re-centres the transform on `(ox, oy)`.
    pub fn about(&self, ox: f64, oy: f64) -> Affine {
        Affine::translate(ox, oy)
            .then_local(self)
            .then_local(&Affine::translate(-ox, -oy))
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Axis-aligned box `(x, y, w, h)` of the transformed rectangle.
    pub fn map_rect(&self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
        let corners = [
            self.apply(x, y),
            self.apply(x + w, y),
            self.apply(x, y + h),
            self.apply(x + w, y + h),
        ];
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (cx, cy) in corners {
            min_x = min_x.min(cx);
            min_y = min_y.min(cy);
            max_x = max_x.max(cx);
            max_y = max_y.max(cy);
        }
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.a as f32,
            self.b as f32,
            self.c as f32,
            self.d as f32,
            self.e as f32,
            self.f as f32,
        )
    }
}

/// Parses a transform list such as `translate(10px, 4px) scale(1.2) rotate(15deg)`.
///
/// Supported functions: `translate`, `translateX`, `translateY`, `scale`,
/// `scaleX`, `scaleY`, `rotate`. Functions compose left to right.
pub fn parse(input: &str) -> Result<Affine, RenderError> {
    let invalid = |reason: String| RenderError::InvalidTransform {
        input: input.to_string(),
        reason,
    };

    let mut result = Affine::IDENTITY;
    let mut rest = input.trim();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| invalid(format!("expected '(' in '{rest}'")))?;
        let close = rest
            .find(')')
            .ok_or_else(|| invalid("unterminated function".to_string()))?;
        if close < open {
            return Err(invalid("unbalanced parentheses".to_string()));
        }
        let name = rest[..open].trim();
        let args: Vec<&str> = rest[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect();

        let op = match (name, args.as_slice()) {
            ("translate", [x]) => Affine::translate(length(x).map_err(&invalid)?, 0.0),
            ("translate", [x, y]) => Affine::translate(
                length(x).map_err(&invalid)?,
                length(y).map_err(&invalid)?,
            ),
            ("translateX", [x]) => Affine::translate(length(x).map_err(&invalid)?, 0.0),
            ("translateY", [y]) => Affine::translate(0.0, length(y).map_err(&invalid)?),
            ("scale", [s]) => {
                let s = number(s).map_err(&invalid)?;
                Affine::scale(s, s)
            }
            ("scale", [sx, sy]) => {
                Affine::scale(number(sx).map_err(&invalid)?, number(sy).map_err(&invalid)?)
            }
            ("scaleX", [s]) => Affine::scale(number(s).map_err(&invalid)?, 1.0),
            ("scaleY", [s]) => Affine::scale(1.0, number(s).map_err(&invalid)?),
            ("rotate", [a]) => Affine::rotate_degrees(angle(a).map_err(&invalid)?),
            (other, args) => {
                return Err(invalid(format!(
                    "unsupported function {other} with {} argument(s)",
                    args.len()
                )))
            }
        };
        result = result.then_local(&op);
        rest = rest[close + 1..].trim_start();
    }
    Ok(result)
}

fn number(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid number '{s}'"))
}

fn length(s: &str) -> Result<f64, String> {
    number(s.strip_suffix("px").unwrap_or(s))
}

fn angle(s: &str) -> Result<f64, String> {
    if let Some(v) = s.strip_suffix("deg") {
        number(v)
    } else if let Some(v) = s.strip_suffix("rad") {
        number(v).map(f64::to_degrees)
    } else if let Some(v) = s.strip_suffix("turn") {
        number(v).map(|t| t * 360.0)
    } else if s == "0" {
        Ok(0.0)
    } else {
        Err(format!("angle '{s}' needs a unit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_combine_cases() {
        assert_eq!(combine(None, None), None);
        assert_eq!(combine(None, Some(15.0)), Some("rotate(15deg)".to_string()));
        assert_eq!(
            combine(Some("scale(1)"), Some(15.0)),
            Some("scale(1) rotate(15deg)".to_string())
        );
        assert_eq!(combine(Some("scale(1)"), None), Some("scale(1)".to_string()));
        assert_eq!(combine(Some("  "), Some(0.0)), None);
        assert_eq!(combine(None, Some(-12.5)), Some("rotate(-12.5deg)".to_string()));
    }

    #[test]
    fn test_combine_is_stable() {
        let a = combine(Some("translate(4px, 2px)"), Some(30.0));
        let b = combine(Some("translate(4px, 2px)"), Some(30.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rotate_quarter_turn() {
        let m = parse("rotate(90deg)").unwrap();
        assert!(close(m.apply(1.0, 0.0), (0.0, 1.0)));
        let t = parse("rotate(0.25turn)").unwrap();
        assert!(close(t.apply(1.0, 0.0), (0.0, 1.0)));
    }

    #[test]
    fn test_parse_composes_left_to_right() {
        // translate applies after scale to the point
        let m = parse("translate(10px, 0) scale(2)").unwrap();
        assert!(close(m.apply(1.0, 1.0), (12.0, 2.0)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("rotate(15)").is_err());
        assert!(parse("skew(10deg)").is_err());
        assert!(parse("scale(1").is_err());
        assert!(parse("").unwrap().is_identity());
    }

    #[test]
    fn test_about_keeps_origin_fixed() {
        let m = Affine::rotate_degrees(45.0).about(50.0, 50.0);
        assert!(close(m.apply(50.0, 50.0), (50.0, 50.0)));
    }

    #[test]
    fn test_map_rect_rotated_square() {
        let m = Affine::rotate_degrees(90.0).about(50.0, 25.0);
        let (x, y, w, h) = m.map_rect(0.0, 0.0, 100.0, 50.0);
        assert!((w - 50.0).abs() < 1e-9 && (h - 100.0).abs() < 1e-9);
        assert!((x - 25.0).abs() < 1e-9 && (y + 25.0).abs() < 1e-9);
    }
}
