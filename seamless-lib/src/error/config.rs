//! Configuration error types

/// Errors loading a [`FilterConfig`](crate::FilterConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or has unknown keys.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}
