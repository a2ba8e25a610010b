// Single-metric risk curves for algorithmic stablecoins.
//
// Each curve is a breakpoint table interpolated linearly and clamped at the
// ends, so monotonicity follows from the table ordering.
use crate::risk::DEFAULT_RISK_SCORE;
use crate::utils::math::{clamp_score, interpolate_breakpoints};

/// Risk when backing-token supply growth is unknown
pub const DEFAULT_DILUTION_RISK: f64 = 30.0;

/// Backing ratio (collateral value / stablecoin supply) → risk.
/// Parity sits at exactly 50; 2x overcollateralization is low risk.
const BACKING_RATIO_BREAKPOINTS: [(f64, f64); 5] = [
    (0.0, 100.0),
    (0.5, 80.0),
    (1.0, 50.0),
    (2.0, 20.0),
    (4.0, 0.0),
];

/// Annualised 30d volatility of the collateral asset → risk
const COLLATERAL_VOLATILITY_BREAKPOINTS: [(f64, f64); 5] = [
    (0.0, 0.0),
    (0.2, 30.0),
    (0.6, 60.0),
    (1.0, 85.0),
    (1.5, 100.0),
];

/// 30d supply growth of the backing token → dilution risk
const DILUTION_BREAKPOINTS: [(f64, f64); 5] = [
    (0.0, 0.0),
    (0.05, 20.0),
    (0.2, 50.0),
    (0.5, 80.0),
    (2.0, 100.0),
];

/// Share of total stablecoin supply held by one coin → risk
const CONCENTRATION_BREAKPOINTS: [(f64, f64); 5] = [
    (0.0, 0.0),
    (0.05, 20.0),
    (0.15, 50.0),
    (0.30, 80.0),
    (1.0, 100.0),
];

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub fn calculate_backing_ratio_risk(backing_ratio: Option<f64>) -> f64 {
    match finite(backing_ratio) {
        Some(ratio) => clamp_score(interpolate_breakpoints(ratio, &BACKING_RATIO_BREAKPOINTS)),
        None => DEFAULT_RISK_SCORE,
    }
}

pub fn calculate_collateral_volatility_risk(volatility: Option<f64>) -> f64 {
    match finite(volatility) {
        Some(vol) => clamp_score(interpolate_breakpoints(vol, &COLLATERAL_VOLATILITY_BREAKPOINTS)),
        None => DEFAULT_RISK_SCORE,
    }
}

/// Supply contraction (negative growth) carries no dilution risk.
pub fn calculate_dilution_risk(supply_growth: Option<f64>) -> f64 {
    match finite(supply_growth) {
        Some(growth) => clamp_score(interpolate_breakpoints(growth, &DILUTION_BREAKPOINTS)),
        None => DEFAULT_DILUTION_RISK,
    }
}

/// A zero total supply leaves the share undefined and is scored as no risk.
pub fn calculate_concentration_risk(entity_supply: f64, total_supply: f64) -> f64 {
    if !total_supply.is_finite() || total_supply <= 0.0 || !entity_supply.is_finite() {
        return 0.0;
    }

    let share = entity_supply / total_supply;
    clamp_score(interpolate_breakpoints(share, &CONCENTRATION_BREAKPOINTS))
}
