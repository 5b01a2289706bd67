use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse service definition '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unsupported service definition format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("invalid service definition: {message}")]
    InvalidDefinition { message: String },
}

impl ConfigError {
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            message: message.into(),
        }
    }
}
