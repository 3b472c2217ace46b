/// Convenience result type used across codefall.
pub type CodefallResult<T> = Result<T, CodefallError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The render loop itself never surfaces these; they come out of construction paths
/// (config loading, font discovery, thread pool setup) and supplier internals, which convert
/// them into fallbacks before they reach the frame thread.
#[derive(thiserror::Error, Debug)]
pub enum CodefallError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while fetching or mapping profile records.
    #[error("data error: {0}")]
    Data(String),

    /// Errors while rasterizing or compositing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CodefallError {
    /// Build a [`CodefallError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CodefallError::Data`] value.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`CodefallError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CodefallError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CodefallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
