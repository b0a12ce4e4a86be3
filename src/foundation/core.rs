use std::fmt;

pub use kurbo::{Affine, Point, Size};

/// Identifier of a scene node, assigned by the scene graph that produces draw instructions.
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a number the way SVG attribute values and filter signatures expect it.
///
/// Integral values print without a fractional part (`1.0` -> `"1"`), negative zero prints as
/// `"0"`, and non-finite values use `NaN` / `Infinity` / `-Infinity`. Magnitudes of `1e21` and
/// above, or below `1e-6`, use exponent notation with an explicit sign (`1e+21`, `1.5e-7`).
pub fn fmt_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let magnitude = v.abs();
    if !(EXP_LOWER..EXP_UPPER).contains(&magnitude) {
        let s = format!("{v:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    if v.fract() == 0.0 {
        return format!("{v:.0}");
    }
    format!("{v}")
}

// Fixed notation is used for magnitudes in `[EXP_LOWER, EXP_UPPER)`.
const EXP_LOWER: f64 = 1e-6;
const EXP_UPPER: f64 = 1e21;

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
