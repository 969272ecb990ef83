/// Error types for wordfield

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Main error type for wordfield operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown sketch: {0}")]
    UnknownSketch(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Result type alias for wordfield operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");
    }

    #[test]
    fn config_error_is_transparent() {
        let err: Error = ConfigError::ValidationError("terms: too many".into()).into();
        assert_eq!(err.to_string(), "config validation error: terms: too many");
    }
}
