/// Convenience result type used across chalkboard.
pub type ChalkboardResult<T> = Result<T, ChalkboardError>;

/// Top-level error taxonomy used by the lesson pipeline and its boundaries.
#[derive(thiserror::Error, Debug)]
pub enum ChalkboardError {
    /// Generation output does not match the expected step/instruction shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network or API-level failure while calling the external model.
    #[error("generation failure: {0}")]
    GenerationFailure(String),

    /// The submitted question is empty after trimming.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The renderer adapter rejected a tick's element list.
    #[error("render callback failure: {0}")]
    RenderCallback(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChalkboardError {
    /// Build a [`ChalkboardError::MalformedResponse`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Build a [`ChalkboardError::GenerationFailure`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationFailure(msg.into())
    }

    /// Build a [`ChalkboardError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`ChalkboardError::RenderCallback`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderCallback(msg.into())
    }

    /// Return `true` for failures the generation boundary absorbs into the fallback step.
    pub fn is_recoverable_generation(&self) -> bool {
        matches!(self, Self::MalformedResponse(_) | Self::GenerationFailure(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
