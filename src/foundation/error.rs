/// Result alias used across the crate.
pub type GarbleResult<T> = Result<T, GarbleError>;

/// Crate-wide error type.
///
/// Only fatal conditions are represented here. An empty input string and an exhausted font-size
/// search are recovered inside the layout engine and never surface as errors.
#[derive(thiserror::Error, Debug)]
pub enum GarbleError {
    /// No configured font asset could be loaded, or a font file was unreadable.
    #[error("font asset error: {0}")]
    FontAsset(String),

    /// Configuration or input that can never produce an image.
    #[error("validation error: {0}")]
    Validation(String),

    /// An internal invariant was broken while rendering.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// The image encoder rejected the final canvas.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    /// Any other error, carried through `anyhow`.
    Other(#[from] anyhow::Error),
}

impl GarbleError {
    /// Build a [`GarbleError::FontAsset`].
    pub fn font_asset(msg: impl Into<String>) -> Self {
        Self::FontAsset(msg.into())
    }

    /// Build a [`GarbleError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GarbleError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`GarbleError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// `true` for errors caused by missing or unreadable font assets.
    pub fn is_font_asset(&self) -> bool {
        matches!(self, Self::FontAsset(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
