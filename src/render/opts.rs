use serde::Deserialize as _;

use crate::foundation::error::{SprigError, SprigResult};

/// Renderer configuration.
///
/// In JSON form the keys are `allowEventDefaults` and `fpsLog`. Absent keys, `null` values and
/// unknown keys all fall back to the defaults (`false` for both).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererOpts {
    /// Let the host perform default actions for handled input events.
    #[serde(deserialize_with = "bool_or_unset")]
    pub allow_event_defaults: bool,
    /// Record frame times and periodically log the frame rate.
    #[serde(deserialize_with = "bool_or_unset")]
    pub fps_log: bool,
}

impl RendererOpts {
    /// Parse options from a JSON object.
    pub fn from_json(s: &str) -> SprigResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| SprigError::serde(format!("parse renderer options JSON: {e}")))
    }
}

fn bool_or_unset<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
#[path = "../../tests/unit/render/opts.rs"]
mod tests;
