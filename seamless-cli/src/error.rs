use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid URL {url:?}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    #[error(transparent)]
    Engine(#[from] seamless_lib::Error),

    #[error("failed to encode stats: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl From<seamless_lib::FetchError> for CliError {
    fn from(error: seamless_lib::FetchError) -> Self {
        Self::Engine(error.into())
    }
}

impl From<seamless_lib::ConfigError> for CliError {
    fn from(error: seamless_lib::ConfigError) -> Self {
        Self::Engine(error.into())
    }
}
