/// Convenience result type used across aquamark.
pub type AquamarkResult<T> = Result<T, AquamarkError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-item failures (`Decode`, `EmptyOutput`, `Render`) surface to the caller
/// without aborting sibling work; `Validation`/`Serde` are raised before any
/// rendering is attempted.
#[derive(thiserror::Error, Debug)]
pub enum AquamarkError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image or logo failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// A render or encode produced a zero-byte or zero-dimension result.
    #[error("empty output: {0}")]
    EmptyOutput(String),

    /// Errors while compositing or rasterizing a watermark layer.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AquamarkError {
    /// Build a [`AquamarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AquamarkError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`AquamarkError::EmptyOutput`] value.
    pub fn empty_output(msg: impl Into<String>) -> Self {
        Self::EmptyOutput(msg.into())
    }

    /// Build a [`AquamarkError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`AquamarkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let e = AquamarkError::decode("bad png header");
        assert_eq!(e.to_string(), "decode error: bad png header");

        let e = AquamarkError::empty_output("0 bytes after encode");
        assert_eq!(e.to_string(), "empty output: 0 bytes after encode");
    }
}
