//! Compilation of [`Filter`] lists into SVG filter primitives.

use serde_json::Value;

use crate::effects::filter::Filter;
use crate::foundation::core::fmt_number;

/// One SVG filter primitive element (`feGaussianBlur`, `feColorMatrix`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// Element tag.
    pub tag: &'static str,
    /// Attributes in emission order.
    pub attrs: Vec<(&'static str, String)>,
    /// Nested elements (transfer functions of `feComponentTransfer`).
    pub children: Vec<Primitive>,
}

impl Primitive {
    fn new(tag: &'static str, attrs: Vec<(&'static str, String)>) -> Self {
        Self {
            tag,
            attrs,
            children: Vec::new(),
        }
    }
}

/// Compile filters into a primitive chain, in list order.
///
/// Each primitive reads the previous one's result. Unknown types and unusable parameters are
/// skipped with a warning; they still take part in the filter signature.
pub fn compile_filters(filters: &[Filter]) -> Vec<Primitive> {
    filters
        .iter()
        .filter_map(|f| {
            let p = compile_filter(f);
            if p.is_none() {
                tracing::warn!(kind = %f.kind, value = %f.value, "skipping unusable filter");
            }
            p
        })
        .collect()
}

fn compile_filter(f: &Filter) -> Option<Primitive> {
    match f.kind.as_str() {
        "blur" => {
            let sd = amount(&f.value, 1.0).filter(|v| *v >= 0.0)?;
            Some(Primitive::new(
                "feGaussianBlur",
                vec![("stdDeviation", fmt_number(sd))],
            ))
        }
        "opacity" => {
            let v = amount(&f.value, 1.0)?;
            Some(component_transfer(&["feFuncA"], || {
                vec![("type", "linear".to_string()), ("slope", fmt_number(v))]
            }))
        }
        "brightness" => {
            let v = amount(&f.value, 1.0)?;
            Some(component_transfer(&RGB_FUNCS, || {
                vec![("type", "linear".to_string()), ("slope", fmt_number(v))]
            }))
        }
        "contrast" => {
            let v = amount(&f.value, 1.0)?;
            Some(component_transfer(&RGB_FUNCS, || {
                vec![
                    ("type", "linear".to_string()),
                    ("slope", fmt_number(v)),
                    ("intercept", fmt_number(-0.5 * v + 0.5)),
                ]
            }))
        }
        "invert" => {
            let v = amount(&f.value, 1.0)?.clamp(0.0, 1.0);
            Some(component_transfer(&RGB_FUNCS, || {
                vec![
                    ("type", "table".to_string()),
                    (
                        "tableValues",
                        format!("{} {}", fmt_number(v), fmt_number(1.0 - v)),
                    ),
                ]
            }))
        }
        "grayscale" => {
            let v = amount(&f.value, 1.0)?.clamp(0.0, 1.0);
            Some(color_matrix("saturate", fmt_number(1.0 - v)))
        }
        "saturate" => {
            let v = amount(&f.value, 1.0).filter(|v| *v >= 0.0)?;
            Some(color_matrix("saturate", fmt_number(v)))
        }
        "hueRotate" => {
            let deg = amount(&f.value, 0.0)?;
            Some(color_matrix("hueRotate", fmt_number(deg)))
        }
        "sepia" => {
            let a = amount(&f.value, 1.0)?.clamp(0.0, 1.0);
            Some(color_matrix("matrix", join_matrix(&sepia_matrix(a))))
        }
        "colorMatrix" => {
            let values = numbers(&f.value)?;
            if values.len() != 20 {
                return None;
            }
            Some(color_matrix("matrix", join_matrix(&values)))
        }
        "dropShadow" => drop_shadow(&f.value),
        _ => None,
    }
}

const RGB_FUNCS: [&str; 3] = ["feFuncR", "feFuncG", "feFuncB"];

fn component_transfer(
    funcs: &[&'static str],
    attrs: impl Fn() -> Vec<(&'static str, String)>,
) -> Primitive {
    let mut p = Primitive::new("feComponentTransfer", Vec::new());
    p.children = funcs
        .iter()
        .map(|&tag| Primitive::new(tag, attrs()))
        .collect();
    p
}

fn color_matrix(kind: &str, values: String) -> Primitive {
    Primitive::new(
        "feColorMatrix",
        vec![("type", kind.to_string()), ("values", values)],
    )
}

fn sepia_matrix(a: f64) -> Vec<f64> {
    let i = 1.0 - a;
    vec![
        0.393 + 0.607 * i,
        0.769 - 0.769 * i,
        0.189 - 0.189 * i,
        0.0,
        0.0,
        0.349 - 0.349 * i,
        0.686 + 0.314 * i,
        0.168 - 0.168 * i,
        0.0,
        0.0,
        0.272 - 0.272 * i,
        0.534 - 0.534 * i,
        0.131 + 0.869 * i,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

fn join_matrix(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| fmt_number(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

// `[dx, dy, blur, color?]`
fn drop_shadow(value: &Value) -> Option<Primitive> {
    let items = value.as_array()?;
    if items.len() < 3 {
        return None;
    }
    let dx = finite(&items[0])?;
    let dy = finite(&items[1])?;
    let blur = finite(&items[2]).filter(|v| *v >= 0.0)?;
    let color = match items.get(3) {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return None,
        None => "black".to_string(),
    };
    Some(Primitive::new(
        "feDropShadow",
        vec![
            ("dx", fmt_number(dx)),
            ("dy", fmt_number(dy)),
            ("stdDeviation", fmt_number(blur)),
            ("flood-color", color),
        ],
    ))
}

/// Scalar parameter: a number, a one-element array, or absent (`default`).
fn amount(value: &Value, default: f64) -> Option<f64> {
    match value {
        Value::Null => Some(default),
        Value::Array(items) if items.len() == 1 => finite(&items[0]),
        other => finite(other),
    }
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(finite).collect()
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/primitives.rs"]
mod tests;
