/// Convenience result type used across leaflet.
pub type LeafletResult<T> = Result<T, LeafletError>;

/// Top-level error taxonomy used by composition and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum LeafletError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The drawing surface could not be allocated.
    #[error("surface error: {0}")]
    Surface(String),

    /// No registered font can serve a requested typography style.
    #[error("font error: {0}")]
    Font(String),

    /// Broken invariants inside the pixel pipeline.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors while serializing a surface into an image buffer.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LeafletError {
    /// Build a [`LeafletError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LeafletError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`LeafletError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`LeafletError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`LeafletError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
