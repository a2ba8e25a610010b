use std::fmt;

use crate::risk::RiskError;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    ValidationError(String),
    IoError(String),
    SerializationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::IoError(msg) => write!(f, "I/O error: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<RiskError> for AppError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::InvalidInput { .. } => AppError::ValidationError(err.to_string()),
            RiskError::Serialization(inner) => AppError::SerializationError(inner.to_string()),
            RiskError::Io(inner) => AppError::IoError(inner.to_string()),
        }
    }
}
