// Category-level risk input interface
use serde::{Deserialize, Serialize};

use crate::models::{
    ArbitrageOpacityRiskInputs, ContagionRiskInputs, DeFiLiquidityRiskInputs, StablecoinRiskInputs,
};
use crate::risk::RiskLevel;
use crate::utils::math::clamp_score;

/// Implemented by every normalized per-category input struct
pub trait RiskCategory {
    /// Stable identifier used in reports
    fn category_name(&self) -> &'static str;

    /// `(field name, value, weight)`. Weights sum to 1.
    fn components(&self) -> Vec<(&'static str, f64, f64)>;

    /// Weighted sub-index of the category, 0-100
    fn sub_index(&self) -> f64 {
        let score: f64 = self
            .components()
            .iter()
            .map(|(_, value, weight)| value * weight)
            .sum();
        clamp_score(score)
    }

    /// Per-field contributions, largest first
    fn factor_contributions(&self) -> Vec<RiskFactorContribution> {
        let mut contributions: Vec<RiskFactorContribution> = self
            .components()
            .into_iter()
            .map(|(name, value, weight)| RiskFactorContribution::new(name, value, weight))
            .collect();
        contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
        contributions
    }
}

/// One factor's share of a weighted score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorContribution {
    pub factor_name: String,
    /// Factor score, 0-100
    pub score: f64,
    pub weight: f64,
    /// score × weight, in index points
    pub contribution: f64,
    pub impact_level: RiskLevel,
}

impl RiskFactorContribution {
    pub fn new(factor_name: impl Into<String>, score: f64, weight: f64) -> Self {
        let score = clamp_score(score);
        Self {
            factor_name: factor_name.into(),
            score,
            weight,
            contribution: score * weight,
            impact_level: RiskLevel::from_score(score),
        }
    }
}

impl RiskCategory for StablecoinRiskInputs {
    fn category_name(&self) -> &'static str {
        "stablecoin_risk"
    }

    fn components(&self) -> Vec<(&'static str, f64, f64)> {
        vec![
            ("tvl_ratio", self.tvl_ratio, 0.30),
            ("treasury_stress", self.treasury_stress, 0.20),
            ("concentration_hhi", self.concentration_hhi, 0.25),
            ("peg_volatility", self.peg_volatility, 0.25),
        ]
    }
}

impl RiskCategory for DeFiLiquidityRiskInputs {
    fn category_name(&self) -> &'static str {
        "defi_liquidity_risk"
    }

    fn components(&self) -> Vec<(&'static str, f64, f64)> {
        vec![
            ("top10_concentration", self.top10_concentration, 0.30),
            ("tvl_volatility", self.tvl_volatility, 0.20),
            ("smart_contract_risk", self.smart_contract_risk, 0.25),
            ("flash_loan_proxy", self.flash_loan_proxy, 0.15),
            ("leverage_change", self.leverage_change, 0.10),
        ]
    }
}

impl RiskCategory for ContagionRiskInputs {
    fn category_name(&self) -> &'static str {
        "contagion_risk"
    }

    fn components(&self) -> Vec<(&'static str, f64, f64)> {
        vec![
            ("rwa_growth_rate", self.rwa_growth_rate, 0.25),
            ("bank_exposure", self.bank_exposure, 0.20),
            ("tradfi_linkage", self.tradfi_linkage, 0.20),
            ("crypto_equity_correlation", self.crypto_equity_correlation, 0.20),
            ("bridge_exploit_frequency", self.bridge_exploit_frequency, 0.15),
        ]
    }
}

impl RiskCategory for ArbitrageOpacityRiskInputs {
    fn category_name(&self) -> &'static str {
        "arbitrage_opacity_risk"
    }

    fn components(&self) -> Vec<(&'static str, f64, f64)> {
        vec![
            ("unregulated_exposure", self.unregulated_exposure, 0.25),
            ("multi_issuer_risk", self.multi_issuer_risk, 0.20),
            ("custody_concentration", self.custody_concentration, 0.20),
            ("regulatory_sentiment", self.regulatory_sentiment, 0.15),
            ("transparency_score", self.transparency_score, 0.20),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(category: &dyn RiskCategory) -> f64 {
        category.components().iter().map(|(_, _, w)| w).sum()
    }

    #[test]
    fn test_component_weights_sum_to_one() {
        let stablecoin = StablecoinRiskInputs::new(10.0, 20.0, 30.0, 40.0);
        let defi = DeFiLiquidityRiskInputs::new(10.0, 20.0, 30.0, 40.0, 50.0);
        let contagion = ContagionRiskInputs::new(10.0, 20.0, 30.0, 40.0, 50.0);
        let arbitrage = ArbitrageOpacityRiskInputs::new(10.0, 20.0, 30.0, 40.0, 50.0);
        for category in [
            &stablecoin as &dyn RiskCategory,
            &defi,
            &contagion,
            &arbitrage,
        ] {
            assert!((weight_sum(category) - 1.0).abs() < 1e-12, "{}", category.category_name());
        }
    }

    #[test]
    fn test_uniform_inputs_give_same_sub_index() {
        let defi = DeFiLiquidityRiskInputs::new(40.0, 40.0, 40.0, 40.0, 40.0);
        assert!((defi.sub_index() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_contributions_sorted_descending() {
        let stablecoin = StablecoinRiskInputs::new(90.0, 10.0, 50.0, 0.0);
        let contributions = stablecoin.factor_contributions();
        assert_eq!(contributions[0].factor_name, "tvl_ratio");
        assert_eq!(contributions.last().unwrap().factor_name, "peg_volatility");
        assert_eq!(contributions[0].impact_level, RiskLevel::Critical);
    }
}
