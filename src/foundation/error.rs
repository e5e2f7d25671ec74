/// Convenience result type used across padmark.
pub type PadmarkResult<T> = Result<T, PadmarkError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum PadmarkError {
    /// Invalid user-provided configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A run precondition (input directory, watermark file) does not hold.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The source bytes could not be decoded into an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The output image could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PadmarkError {
    /// Build a [`PadmarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PadmarkError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`PadmarkError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PadmarkError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether this error must stop the whole run before any file is touched.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Precondition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
