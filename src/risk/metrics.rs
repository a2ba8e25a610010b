// Composite index definitions
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::risk::{RiskFactorContribution, ALGO_BLEND_FACTOR, MIN_ALGO_WEIGHT};

/// Qualitative band of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => RiskLevel::Critical,
            s if s >= 60.0 => RiskLevel::High,
            s if s >= 40.0 => RiskLevel::Medium,
            s if s >= 20.0 => RiskLevel::Low,
            _ => RiskLevel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weights of the four category sub-indices in the composite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub stablecoin: f64,
    pub defi_liquidity: f64,
    pub contagion: f64,
    pub arbitrage_opacity: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            stablecoin: 0.30,
            defi_liquidity: 0.25,
            contagion: 0.25,
            arbitrage_opacity: 0.20,
        }
    }
}

impl CompositeWeights {
    pub fn total(&self) -> f64 {
        self.stablecoin + self.defi_liquidity + self.contagion + self.arbitrage_opacity
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.stablecoin, self.defi_liquidity, self.contagion, self.arbitrage_opacity]
    }
}

/// Parameters of the algorithmic-stablecoin adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmicBlend {
    pub blend_factor: f64,
    pub min_weight: f64,
}

impl Default for AlgorithmicBlend {
    fn default() -> Self {
        Self {
            blend_factor: ALGO_BLEND_FACTOR,
            min_weight: MIN_ALGO_WEIGHT,
        }
    }
}

/// Final index with its explainability breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRiskIndex {
    /// Stablecoin sub-index before the algorithmic adjustment
    pub base_stablecoin_index: f64,
    /// Stablecoin sub-index after the algorithmic adjustment
    pub stablecoin_index: f64,
    pub defi_liquidity_index: f64,
    pub contagion_index: f64,
    pub arbitrage_opacity_index: f64,
    pub composite: f64,
    pub risk_level: RiskLevel,
    /// Category contributions to `composite`, largest first
    pub contributions: Vec<RiskFactorContribution>,
}
