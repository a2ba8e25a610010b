// Risk input error types
use thiserror::Error;

/// Errors raised at the boundary where raw market data enters the pipeline.
/// The scoring formulas themselves never fail.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Malformed market snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to read market snapshot: {0}")]
    Io(#[from] std::io::Error),
}

impl RiskError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RiskError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Reject NaN, infinities and negative magnitudes.
pub fn ensure_non_negative(field: impl Into<String>, value: f64) -> Result<f64, RiskError> {
    if !value.is_finite() {
        return Err(RiskError::invalid_input(field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(RiskError::invalid_input(field, format!("must be non-negative, got {}", value)));
    }
    Ok(value)
}

/// Reject NaN and infinities; sign is unrestricted.
pub fn ensure_finite(field: impl Into<String>, value: f64) -> Result<f64, RiskError> {
    if !value.is_finite() {
        return Err(RiskError::invalid_input(field, format!("must be finite, got {}", value)));
    }
    Ok(value)
}
