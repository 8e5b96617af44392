use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectContextError>;

#[derive(Error, Debug)]
pub enum ProjectContextError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Engine failed to start: {0}")]
    EngineStart(String),

    #[error("Engine {operation} failed: {message}")]
    EngineCall {
        operation: &'static str,
        message: String,
    },

    #[error("Error reading directory {}: {message}", path.display())]
    FilesystemRead { path: PathBuf, message: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl ProjectContextError {
    pub(crate) fn engine_call(operation: &'static str, err: anyhow::Error) -> Self {
        Self::EngineCall {
            operation,
            message: format!("{err:#}"),
        }
    }
}

impl From<toml::de::Error> for ProjectContextError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
