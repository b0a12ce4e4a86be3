use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::foundation::error::{SprigError, SprigResult};
use crate::render::opts::RendererOpts;
use crate::scene::message::DrawMessage;

/// A recorded sequence of frames, as produced by a scene graph, plus the surface it targets.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FrameScript {
    /// Surface width.
    pub width: f64,
    /// Surface height.
    pub height: f64,
    /// Renderer options.
    #[serde(default)]
    pub opts: RendererOpts,
    /// Draw instructions, one list per frame.
    #[serde(default)]
    pub frames: Vec<Vec<DrawMessage>>,
}

impl FrameScript {
    /// Load a script from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SprigResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SprigError::config(format!("open frame script '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a script from a JSON reader.
    pub fn from_reader(r: impl Read) -> SprigResult<Self> {
        let script: Self = serde_json::from_reader(r)
            .map_err(|e| SprigError::serde(format!("parse frame script JSON: {e}")))?;
        script.validate()?;
        Ok(script)
    }

    /// Parse a script from a JSON string.
    pub fn from_json(s: &str) -> SprigResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Check surface dimensions.
    pub fn validate(&self) -> SprigResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SprigError::config("script width must be finite and > 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SprigError::config("script height must be finite and > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/script.rs"]
mod tests;
