use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::models::{BackingTokenData, Bridge, Protocol, Stablecoin};
use crate::risk::RiskError;

/// Everything one index run consumes, as supplied by the data collectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    pub stablecoins: Vec<Stablecoin>,
    pub protocols: Vec<Protocol>,
    #[serde(default)]
    pub bridges: Vec<Bridge>,
    pub current_tvl: f64,
    pub max_historical_tvl: f64,
    /// 10-year treasury yield in percent
    pub treasury_10y_rate: f64,
    pub vix: f64,
    /// 10y-2y spread in percentage points; negative when inverted
    pub yield_curve_spread: f64,
    #[serde(default)]
    pub tvl_history: Option<Vec<f64>>,
    /// Rolling crypto/equity correlation in [-1, 1]
    #[serde(default)]
    pub crypto_equity_corr: Option<f64>,
    /// Externally scored regulatory sentiment risk, 0-100
    #[serde(default)]
    pub regulatory_sentiment: Option<f64>,
    /// Keyed by backing-token symbol
    #[serde(default)]
    pub backing_token_data: Option<HashMap<String, BackingTokenData>>,
}

impl MarketInputs {
    /// Decode a snapshot; missing required fields or wrong types surface as
    /// `RiskError::Serialization`.
    pub fn from_json_str(json: &str) -> Result<Self, RiskError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RiskError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
