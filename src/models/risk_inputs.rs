// Normalized per-category risk inputs. Every field is a 0-100 risk score,
// higher meaning riskier; constructors clamp.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::AlgorithmicStablecoinRiskResult;
use crate::utils::math::clamp_score;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StablecoinRiskInputs {
    pub tvl_ratio: f64,
    pub treasury_stress: f64,
    pub concentration_hhi: f64,
    pub peg_volatility: f64,
}

impl StablecoinRiskInputs {
    pub fn new(
        tvl_ratio: f64,
        treasury_stress: f64,
        concentration_hhi: f64,
        peg_volatility: f64,
    ) -> Self {
        Self {
            tvl_ratio: clamp_score(tvl_ratio),
            treasury_stress: clamp_score(treasury_stress),
            concentration_hhi: clamp_score(concentration_hhi),
            peg_volatility: clamp_score(peg_volatility),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeFiLiquidityRiskInputs {
    pub top10_concentration: f64,
    pub tvl_volatility: f64,
    pub smart_contract_risk: f64,
    pub flash_loan_proxy: f64,
    pub leverage_change: f64,
}

impl DeFiLiquidityRiskInputs {
    pub fn new(
        top10_concentration: f64,
        tvl_volatility: f64,
        smart_contract_risk: f64,
        flash_loan_proxy: f64,
        leverage_change: f64,
    ) -> Self {
        Self {
            top10_concentration: clamp_score(top10_concentration),
            tvl_volatility: clamp_score(tvl_volatility),
            smart_contract_risk: clamp_score(smart_contract_risk),
            flash_loan_proxy: clamp_score(flash_loan_proxy),
            leverage_change: clamp_score(leverage_change),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContagionRiskInputs {
    pub rwa_growth_rate: f64,
    pub bank_exposure: f64,
    pub tradfi_linkage: f64,
    pub crypto_equity_correlation: f64,
    pub bridge_exploit_frequency: f64,
}

impl ContagionRiskInputs {
    pub fn new(
        rwa_growth_rate: f64,
        bank_exposure: f64,
        tradfi_linkage: f64,
        crypto_equity_correlation: f64,
        bridge_exploit_frequency: f64,
    ) -> Self {
        Self {
            rwa_growth_rate: clamp_score(rwa_growth_rate),
            bank_exposure: clamp_score(bank_exposure),
            tradfi_linkage: clamp_score(tradfi_linkage),
            crypto_equity_correlation: clamp_score(crypto_equity_correlation),
            bridge_exploit_frequency: clamp_score(bridge_exploit_frequency),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpacityRiskInputs {
    pub unregulated_exposure: f64,
    pub multi_issuer_risk: f64,
    pub custody_concentration: f64,
    pub regulatory_sentiment: f64,
    /// Opacity: 100 means no audited coverage at all
    pub transparency_score: f64,
}

impl ArbitrageOpacityRiskInputs {
    pub fn new(
        unregulated_exposure: f64,
        multi_issuer_risk: f64,
        custody_concentration: f64,
        regulatory_sentiment: f64,
        transparency_score: f64,
    ) -> Self {
        Self {
            unregulated_exposure: clamp_score(unregulated_exposure),
            multi_issuer_risk: clamp_score(multi_issuer_risk),
            custody_concentration: clamp_score(custody_concentration),
            regulatory_sentiment: clamp_score(regulatory_sentiment),
            transparency_score: clamp_score(transparency_score),
        }
    }
}

/// Entity counts and raw macro values carried alongside the normalized inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub num_stablecoins: usize,
    pub num_protocols: usize,
    pub num_bridges: usize,
    pub total_stablecoin_supply: f64,
    pub total_protocol_tvl: f64,
    pub current_tvl: f64,
    pub max_historical_tvl: f64,
    pub treasury_10y_rate: f64,
    pub vix: f64,
    pub yield_curve_spread: f64,
}

/// Output of one full transform run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformedData {
    pub stablecoin_risk: StablecoinRiskInputs,
    pub defi_liquidity_risk: DeFiLiquidityRiskInputs,
    pub contagion_risk: ContagionRiskInputs,
    pub arbitrage_opacity_risk: ArbitrageOpacityRiskInputs,
    pub algorithmic_stablecoin_risk: AlgorithmicStablecoinRiskResult,
    pub raw_metrics: RawMetrics,
    pub computed_at: DateTime<Utc>,
}
