use serde::{Deserialize, Serialize};
use std::fmt;

/// Collateral design of a stablecoin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StablecoinType {
    FiatCollateral,
    CryptoCollateral,
    Algorithmic,
    Hybrid,
    Unknown,
}

impl StablecoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StablecoinType::FiatCollateral => "fiat_collateral",
            StablecoinType::CryptoCollateral => "crypto_collateral",
            StablecoinType::Algorithmic => "algorithmic",
            StablecoinType::Hybrid => "hybrid",
            StablecoinType::Unknown => "unknown",
        }
    }

    /// Algorithmic and hybrid designs carry reflexive de-peg risk and are
    /// the only ones scored by the algorithmic aggregator.
    pub fn is_algorithmic_exposure(&self) -> bool {
        matches!(self, StablecoinType::Algorithmic | StablecoinType::Hybrid)
    }
}

impl fmt::Display for StablecoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time market snapshot of one stablecoin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stablecoin {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    /// Circulating supply in USD
    pub circulating: f64,
    /// Fractional deviation from peg, signed (0.01 = 1% above peg)
    #[serde(default)]
    pub peg_deviation: f64,
    /// Free-text peg mechanism reported by the data source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peg_type: Option<String>,
}

impl Stablecoin {
    pub fn new(symbol: impl Into<String>, circulating: f64, peg_deviation: f64) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            circulating,
            peg_deviation,
            peg_type: None,
        }
    }

    pub fn with_peg_type(mut self, peg_type: impl Into<String>) -> Self {
        self.peg_type = Some(peg_type.into());
        self
    }

    /// Supply usable as a weight: negative or non-finite supplies count as zero
    pub fn effective_supply(&self) -> f64 {
        if self.circulating.is_finite() && self.circulating > 0.0 {
            self.circulating
        } else {
            0.0
        }
    }
}

/// Market signals for the asset backing an algorithmic or hybrid stablecoin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackingTokenData {
    /// Annualised 30-day volatility as a fraction (0.8 = 80%)
    #[serde(default)]
    pub volatility_30d: Option<f64>,
    /// 30-day supply growth as a fraction (0.1 = 10%)
    #[serde(default)]
    pub supply_growth_30d: Option<f64>,
    /// Backing value divided by stablecoin supply
    #[serde(default)]
    pub backing_ratio: Option<f64>,
}

impl BackingTokenData {
    pub fn new(volatility_30d: Option<f64>, supply_growth_30d: Option<f64>) -> Self {
        Self {
            volatility_30d,
            supply_growth_30d,
            backing_ratio: None,
        }
    }

    pub fn with_backing_ratio(mut self, backing_ratio: f64) -> Self {
        self.backing_ratio = Some(backing_ratio);
        self
    }
}
