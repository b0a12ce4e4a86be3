use serde_json::Value;

use crate::foundation::core::fmt_number;

/// Prefix every filter signature starts with.
pub const SIGNATURE_PREFIX: &str = "filter:";

/// A visual filter applied to a node, e.g. `{ "type": "blur", "value": 2 }`.
///
/// `value` is kept as raw JSON: the signature serializes whatever the scene graph sent, and
/// only [`compile_filters`](crate::compile_filters) interprets it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
    /// Filter type name (`blur`, `colorMatrix`, ...). Unrecognized names are allowed.
    #[serde(rename = "type")]
    pub kind: String,
    /// Filter parameters.
    #[serde(default)]
    pub value: Value,
}

impl Filter {
    /// Build a filter from a type name and its parameters.
    pub fn new(kind: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// Deterministic string key of an ordered filter list.
///
/// `"filter:"` followed by `type(params)` per filter, in list order. An empty list yields
/// exactly `"filter:"`.
pub fn filter_signature(filters: &[Filter]) -> String {
    let mut out = String::from(SIGNATURE_PREFIX);
    for f in filters {
        out.push_str(&f.kind);
        out.push('(');
        push_params(&mut out, &f.value);
        out.push(')');
    }
    out
}

// Arrays flatten into a comma-joined list; objects fall back to their JSON text.
fn push_params(out: &mut String, v: &Value) {
    match v {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push_str(&i.to_string());
            } else if let Some(u) = n.as_u64() {
                out.push_str(&u.to_string());
            } else if let Some(f) = n.as_f64() {
                out.push_str(&fmt_number(f));
            }
        }
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_params(out, item);
            }
        }
        Value::Object(_) => out.push_str(&v.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
