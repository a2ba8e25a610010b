use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::risk::{AlgorithmicBlend, CompositeWeights, ALGO_BLEND_FACTOR, MIN_ALGO_WEIGHT};

/// Optional settings file looked up next to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "asri";
/// Prefix of environment overrides, e.g. `ASRI__RISK__ALGO_BLEND_FACTOR`
pub const ENV_PREFIX: &str = "ASRI";

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub risk: RiskSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    pub algo_blend_factor: f64,
    pub algo_min_weight: f64,
    pub weights: CompositeWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for RiskSettings {
    fn default() -> Self {
        RiskSettings {
            algo_blend_factor: ALGO_BLEND_FACTOR,
            algo_min_weight: MIN_ALGO_WEIGHT,
            weights: CompositeWeights::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl RiskSettings {
    pub fn blend(&self) -> AlgorithmicBlend {
        AlgorithmicBlend {
            blend_factor: self.algo_blend_factor,
            min_weight: self.algo_min_weight,
        }
    }

    pub fn weights(&self) -> CompositeWeights {
        self.weights
    }
}

impl LoggingSettings {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn ensure_unit_interval(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AppError::ConfigError(format!(
            "{} must be within [0, 1], got {}",
            field, value
        )));
    }
    Ok(())
}

impl Settings {
    /// Load from defaults, then `asri.toml` if present, then `ASRI__*`
    /// environment variables (a `.env` file is read first).
    pub fn new() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load(DEFAULT_CONFIG_FILE)
    }

    /// Like [`Settings::new`] with an explicit settings file and no `.env` lookup.
    pub fn load(config_file: &str) -> Result<Self, AppError> {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(config_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(
            algo_blend_factor = %settings.risk.algo_blend_factor,
            algo_min_weight = %settings.risk.algo_min_weight,
            log_format = %settings.logging.format,
            "Settings loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        ensure_unit_interval("risk.algo_blend_factor", self.risk.algo_blend_factor)?;
        ensure_unit_interval("risk.algo_min_weight", self.risk.algo_min_weight)?;

        let weights = self.risk.weights;
        let named = [
            ("risk.weights.stablecoin", weights.stablecoin),
            ("risk.weights.defi_liquidity", weights.defi_liquidity),
            ("risk.weights.contagion", weights.contagion),
            ("risk.weights.arbitrage_opacity", weights.arbitrage_opacity),
        ];
        for (field, value) in named {
            ensure_unit_interval(field, value)?;
        }
        if (weights.total() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AppError::ConfigError(format!(
                "composite weights must sum to 1, got {}",
                weights.total()
            )));
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(AppError::ConfigError(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                other
            ))),
        }
    }
}
