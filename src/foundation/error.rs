/// Crate-wide result alias.
pub type SprigResult<T> = Result<T, SprigError>;

/// Errors surfaced by the renderer and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum SprigError {
    /// A surface id could not be resolved to an element.
    #[error("unknown element id '{0}'")]
    UnknownElement(String),

    /// Invalid renderer or script configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all for external failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SprigError {
    /// Build a [`SprigError::UnknownElement`] value.
    pub fn unknown_element(id: impl Into<String>) -> Self {
        Self::UnknownElement(id.into())
    }

    /// Build a [`SprigError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SprigError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
