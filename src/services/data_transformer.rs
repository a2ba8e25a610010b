// Turns raw market snapshots into normalized per-category risk inputs
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::models::{
    ArbitrageOpacityRiskInputs, Bridge, ContagionRiskInputs, DeFiLiquidityRiskInputs,
    MarketInputs, Protocol, RawMetrics, Stablecoin, StablecoinRiskInputs, StablecoinType,
    TransformedData,
};
use crate::risk::{
    calculate_algorithmic_stablecoin_risk, classify_stablecoin, ensure_finite,
    ensure_non_negative, RiskError, DEFAULT_RISK_SCORE,
};
use crate::utils::math::{
    calculate_hhi, clamp_score, largest_positive, normalize_hhi_to_risk, normalize_to_100,
    period_returns, share_where, standard_deviation, weighted_mean,
};

/// TVL drawdown from the historical peak at which stress saturates
const TVL_DRAWDOWN_SATURATION: f64 = 0.75;
/// 10y treasury yield band (percent) mapped onto treasury stress
const TREASURY_RATE_FLOOR: f64 = 1.0;
const TREASURY_RATE_CEILING: f64 = 6.0;
/// VIX band mapped onto equity stress
const VIX_FLOOR: f64 = 10.0;
const VIX_CEILING: f64 = 50.0;
/// Yield-curve spread (percentage points) band; inversion is the risky end
const SPREAD_BAND: f64 = 2.0;
/// Supply-weighted mean |peg deviation| at which peg stress saturates
const PEG_MEAN_DEVIATION_SATURATION: f64 = 0.02;
/// Worst single-coin |peg deviation| at which peg stress saturates
const PEG_MAX_DEVIATION_SATURATION: f64 = 0.05;
/// Std-dev of period TVL returns at which volatility saturates
const TVL_RETURN_VOLATILITY_SATURATION: f64 = 0.10;
/// TVL-weighted mean |1d change| (percent) at which the flash-loan proxy saturates
const FLASH_LOAN_CHANGE_SATURATION_PCT: f64 = 10.0;
/// 1d change band (percent) for leverage build-up / unwind
const LEVERAGE_CHANGE_BAND_PCT: f64 = 10.0;
/// RWA share of DeFi TVL at which the share term saturates
const RWA_SHARE_SATURATION: f64 = 0.10;
/// 1d RWA TVL change band (percent)
const RWA_CHANGE_BAND_PCT: f64 = 5.0;
/// Number of live bridges at which the exploit-surface proxy saturates
const BRIDGE_COUNT_SATURATION: f64 = 50.0;
/// Non-dominant issuer share at which multi-issuer risk saturates
const MULTI_ISSUER_SATURATION: f64 = 0.6;
const TOP_PROTOCOL_COUNT: usize = 10;

fn validate_stablecoins(stablecoins: &[Stablecoin]) -> Result<(), RiskError> {
    for (i, coin) in stablecoins.iter().enumerate() {
        if coin.symbol.trim().is_empty() {
            return Err(RiskError::invalid_input(
                format!("stablecoins[{}].symbol", i),
                "must not be empty",
            ));
        }
        ensure_non_negative(format!("stablecoins[{}].circulating", i), coin.circulating)?;
        ensure_finite(format!("stablecoins[{}].peg_deviation", i), coin.peg_deviation)?;
    }
    Ok(())
}

fn validate_protocols(protocols: &[Protocol]) -> Result<(), RiskError> {
    for (i, protocol) in protocols.iter().enumerate() {
        ensure_non_negative(format!("protocols[{}].tvl", i), protocol.tvl)?;
        ensure_finite(format!("protocols[{}].change_1d", i), protocol.change_1d)?;
    }
    Ok(())
}

fn validate_optional(field: &str, value: Option<f64>) -> Result<(), RiskError> {
    if let Some(v) = value {
        ensure_finite(field, v)?;
    }
    Ok(())
}

/// Protocols holding value; zero-TVL entries have no share to contribute
fn active_protocols(protocols: &[Protocol]) -> Vec<&Protocol> {
    let active: Vec<&Protocol> = protocols.iter().filter(|p| p.tvl > 0.0).collect();
    if active.len() != protocols.len() {
        warn!(
            dropped = protocols.len() - active.len(),
            total = protocols.len(),
            "Excluded zero-TVL protocols from share calculations"
        );
    }
    active
}

fn vix_stress(vix: f64) -> f64 {
    normalize_to_100(vix, VIX_FLOOR, VIX_CEILING)
}

fn treasury_stress(rate: f64) -> f64 {
    normalize_to_100(rate, TREASURY_RATE_FLOOR, TREASURY_RATE_CEILING)
}

/// Stateless converter from market collections to risk inputs.
///
/// Every method validates its raw inputs first; negative magnitudes and
/// non-finite numbers are rejected with `RiskError::InvalidInput`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTransformer;

impl DataTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform_stablecoin_risk(
        &self,
        stablecoins: &[Stablecoin],
        current_tvl: f64,
        max_historical_tvl: f64,
        treasury_10y_rate: f64,
    ) -> Result<StablecoinRiskInputs, RiskError> {
        validate_stablecoins(stablecoins)?;
        ensure_non_negative("current_tvl", current_tvl)?;
        ensure_non_negative("max_historical_tvl", max_historical_tvl)?;
        ensure_finite("treasury_10y_rate", treasury_10y_rate)?;

        // Without a historical peak there is no drawdown to measure
        let tvl_ratio = if max_historical_tvl > 0.0 {
            let ratio = (current_tvl / max_historical_tvl).min(1.0);
            normalize_to_100(1.0 - ratio, 0.0, TVL_DRAWDOWN_SATURATION)
        } else {
            0.0
        };

        let supplies: Vec<f64> = stablecoins.iter().map(|c| c.circulating).collect();
        let hhi = calculate_hhi(&supplies);
        let concentration_hhi = normalize_hhi_to_risk(hhi);

        let mean_deviation = weighted_mean(
            stablecoins
                .iter()
                .map(|c| (c.peg_deviation.abs(), c.circulating)),
        )
        .unwrap_or(0.0);
        let max_deviation = stablecoins
            .iter()
            .map(|c| c.peg_deviation.abs())
            .fold(0.0, f64::max);
        let peg_volatility =
            0.7 * normalize_to_100(mean_deviation, 0.0, PEG_MEAN_DEVIATION_SATURATION)
                + 0.3 * normalize_to_100(max_deviation, 0.0, PEG_MAX_DEVIATION_SATURATION);

        debug!(
            stablecoins = stablecoins.len(),
            hhi = %hhi,
            mean_peg_deviation = %mean_deviation,
            max_peg_deviation = %max_deviation,
            "Transformed stablecoin risk inputs"
        );

        Ok(StablecoinRiskInputs::new(
            tvl_ratio,
            treasury_stress(treasury_10y_rate),
            concentration_hhi,
            peg_volatility,
        ))
    }

    pub fn transform_defi_liquidity_risk(
        &self,
        protocols: &[Protocol],
        tvl_history: Option<&[f64]>,
    ) -> Result<DeFiLiquidityRiskInputs, RiskError> {
        validate_protocols(protocols)?;
        if let Some(history) = tvl_history {
            for (i, value) in history.iter().enumerate() {
                ensure_non_negative(format!("tvl_history[{}]", i), *value)?;
            }
        }

        let tvl_volatility = self.tvl_volatility(tvl_history);
        let active = active_protocols(protocols);
        if active.is_empty() {
            debug!("No protocols with positive TVL, using neutral DeFi liquidity inputs");
            return Ok(DeFiLiquidityRiskInputs::new(
                DEFAULT_RISK_SCORE,
                tvl_volatility,
                DEFAULT_RISK_SCORE,
                DEFAULT_RISK_SCORE,
                DEFAULT_RISK_SCORE,
            ));
        }

        let mut tvls: Vec<f64> = active.iter().map(|p| p.tvl).collect();
        tvls.sort_by(|a, b| b.total_cmp(a));
        tvls.truncate(TOP_PROTOCOL_COUNT);
        let top10_concentration = normalize_hhi_to_risk(calculate_hhi(&tvls));

        let unaudited = active.iter().filter(|p| !p.is_audited()).count();
        let smart_contract_risk = unaudited as f64 / active.len() as f64 * 100.0;

        let mean_abs_change = weighted_mean(active.iter().map(|p| (p.change_1d.abs(), p.tvl)))
            .unwrap_or(0.0);
        let flash_loan_proxy =
            normalize_to_100(mean_abs_change, 0.0, FLASH_LOAN_CHANGE_SATURATION_PCT);

        let leverage_venues: Vec<&&Protocol> =
            active.iter().filter(|p| p.is_leverage_venue()).collect();
        let leverage_change_pct = if leverage_venues.is_empty() {
            weighted_mean(active.iter().map(|p| (p.change_1d, p.tvl)))
        } else {
            weighted_mean(leverage_venues.iter().map(|p| (p.change_1d, p.tvl)))
        }
        .unwrap_or(0.0);
        let leverage_change = normalize_to_100(
            leverage_change_pct,
            -LEVERAGE_CHANGE_BAND_PCT,
            LEVERAGE_CHANGE_BAND_PCT,
        );

        debug!(
            protocols = active.len(),
            unaudited = unaudited,
            mean_abs_change_1d = %mean_abs_change,
            leverage_change_1d = %leverage_change_pct,
            "Transformed DeFi liquidity risk inputs"
        );

        Ok(DeFiLiquidityRiskInputs::new(
            top10_concentration,
            tvl_volatility,
            smart_contract_risk,
            flash_loan_proxy,
            leverage_change,
        ))
    }

    /// Volatility of period TVL returns; neutral when the history is absent
    /// or too short to estimate a dispersion.
    fn tvl_volatility(&self, tvl_history: Option<&[f64]>) -> f64 {
        let returns = match tvl_history {
            Some(history) => period_returns(history),
            None => return DEFAULT_RISK_SCORE,
        };
        if returns.len() < 2 {
            return DEFAULT_RISK_SCORE;
        }
        normalize_to_100(standard_deviation(&returns), 0.0, TVL_RETURN_VOLATILITY_SATURATION)
    }

    pub fn transform_contagion_risk(
        &self,
        protocols: &[Protocol],
        treasury_10y_rate: f64,
        vix: f64,
        yield_curve_spread: f64,
        bridges: &[Bridge],
        crypto_equity_corr: Option<f64>,
    ) -> Result<ContagionRiskInputs, RiskError> {
        validate_protocols(protocols)?;
        ensure_finite("treasury_10y_rate", treasury_10y_rate)?;
        ensure_non_negative("vix", vix)?;
        ensure_finite("yield_curve_spread", yield_curve_spread)?;
        validate_optional("crypto_equity_corr", crypto_equity_corr)?;

        let active = active_protocols(protocols);
        let rwa_share = share_where(&active, |p| p.tvl, |p| p.is_rwa()).unwrap_or(0.0);
        let rwa_change = weighted_mean(
            active
                .iter()
                .filter(|p| p.is_rwa())
                .map(|p| (p.change_1d, p.tvl)),
        );
        let rwa_growth_term = rwa_change
            .map(|change| normalize_to_100(change, -RWA_CHANGE_BAND_PCT, RWA_CHANGE_BAND_PCT))
            .unwrap_or(DEFAULT_RISK_SCORE);
        let rwa_growth_rate =
            0.6 * normalize_to_100(rwa_share, 0.0, RWA_SHARE_SATURATION) + 0.4 * rwa_growth_term;

        let bank_exposure = 0.5 * treasury_stress(treasury_10y_rate) + 0.5 * vix_stress(vix);

        // Inverted curve (negative spread) pushes linkage up
        let tradfi_linkage = 0.7 * normalize_to_100(-yield_curve_spread, -SPREAD_BAND, SPREAD_BAND)
            + 0.3 * vix_stress(vix);

        let crypto_equity_correlation = crypto_equity_corr
            .map(|corr| clamp_score(corr * 100.0))
            .unwrap_or(DEFAULT_RISK_SCORE);

        let bridge_exploit_frequency =
            normalize_to_100(bridges.len() as f64, 0.0, BRIDGE_COUNT_SATURATION);

        debug!(
            rwa_share = %rwa_share,
            vix = %vix,
            yield_curve_spread = %yield_curve_spread,
            bridges = bridges.len(),
            "Transformed contagion risk inputs"
        );

        Ok(ContagionRiskInputs::new(
            rwa_growth_rate,
            bank_exposure,
            tradfi_linkage,
            crypto_equity_correlation,
            bridge_exploit_frequency,
        ))
    }

    pub fn transform_arbitrage_opacity_risk(
        &self,
        stablecoins: &[Stablecoin],
        protocols: &[Protocol],
        regulatory_sentiment: Option<f64>,
    ) -> Result<ArbitrageOpacityRiskInputs, RiskError> {
        validate_stablecoins(stablecoins)?;
        validate_protocols(protocols)?;
        validate_optional("regulatory_sentiment", regulatory_sentiment)?;

        let supplies: Vec<(StablecoinType, f64)> = stablecoins
            .iter()
            .map(|c| (classify_stablecoin(&c.symbol, c.peg_type.as_deref()), c.circulating))
            .collect();

        // Grouped supplies are kept relative to the largest coin
        let mut supply_by_type: HashMap<StablecoinType, f64> = HashMap::new();
        let (unregulated_exposure, multi_issuer_risk) =
            match largest_positive(supplies.iter().map(|(_, supply)| *supply)) {
                Some(scale) => {
                    for (kind, supply) in &supplies {
                        *supply_by_type.entry(*kind).or_insert(0.0) += supply / scale;
                    }
                    let scaled_total: f64 = supply_by_type.values().sum();
                    let fiat_share = share_where(
                        &supplies,
                        |(_, supply)| *supply,
                        |(kind, _)| *kind == StablecoinType::FiatCollateral,
                    )
                    .unwrap_or(0.0);
                    // The largest coin is exactly 1 after rescaling
                    let top_share = 1.0 / scaled_total;
                    (
                        (1.0 - fiat_share) * 100.0,
                        normalize_to_100(1.0 - top_share, 0.0, MULTI_ISSUER_SATURATION),
                    )
                }
                None => (0.0, 0.0),
            };

        let grouped: Vec<f64> = supply_by_type.values().copied().collect();
        let custody_concentration = normalize_hhi_to_risk(calculate_hhi(&grouped));

        let regulatory_sentiment = regulatory_sentiment
            .map(clamp_score)
            .unwrap_or(DEFAULT_RISK_SCORE);

        let active = active_protocols(protocols);
        let transparency_score = share_where(&active, |p| p.tvl, |p| !p.is_audited())
            .map(|share| share * 100.0)
            .unwrap_or(DEFAULT_RISK_SCORE);

        debug!(
            stablecoins = stablecoins.len(),
            issuer_groups = supply_by_type.len(),
            protocols = active.len(),
            "Transformed arbitrage/opacity risk inputs"
        );

        Ok(ArbitrageOpacityRiskInputs::new(
            unregulated_exposure,
            multi_issuer_risk,
            custody_concentration,
            regulatory_sentiment,
            transparency_score,
        ))
    }
}

/// Run every transform over one market snapshot.
pub fn transform_all_data(inputs: &MarketInputs) -> Result<TransformedData, RiskError> {
    let transformer = DataTransformer::new();

    info!(
        stablecoins = inputs.stablecoins.len(),
        protocols = inputs.protocols.len(),
        bridges = inputs.bridges.len(),
        "Starting market data transformation"
    );

    let stablecoin_risk = transformer.transform_stablecoin_risk(
        &inputs.stablecoins,
        inputs.current_tvl,
        inputs.max_historical_tvl,
        inputs.treasury_10y_rate,
    )?;
    let defi_liquidity_risk = transformer
        .transform_defi_liquidity_risk(&inputs.protocols, inputs.tvl_history.as_deref())?;
    let contagion_risk = transformer.transform_contagion_risk(
        &inputs.protocols,
        inputs.treasury_10y_rate,
        inputs.vix,
        inputs.yield_curve_spread,
        &inputs.bridges,
        inputs.crypto_equity_corr,
    )?;
    let arbitrage_opacity_risk = transformer.transform_arbitrage_opacity_risk(
        &inputs.stablecoins,
        &inputs.protocols,
        inputs.regulatory_sentiment,
    )?;
    let algorithmic_stablecoin_risk = calculate_algorithmic_stablecoin_risk(
        &inputs.stablecoins,
        inputs.backing_token_data.as_ref(),
    );

    let raw_metrics = RawMetrics {
        num_stablecoins: inputs.stablecoins.len(),
        num_protocols: inputs.protocols.len(),
        num_bridges: inputs.bridges.len(),
        total_stablecoin_supply: inputs.stablecoins.iter().map(|c| c.circulating).sum(),
        total_protocol_tvl: inputs.protocols.iter().map(|p| p.tvl).sum(),
        current_tvl: inputs.current_tvl,
        max_historical_tvl: inputs.max_historical_tvl,
        treasury_10y_rate: inputs.treasury_10y_rate,
        vix: inputs.vix,
        yield_curve_spread: inputs.yield_curve_spread,
    };

    info!(
        algo_stablecoin_risk = %algorithmic_stablecoin_risk.algo_stablecoin_risk,
        algo_stablecoin_weight = %algorithmic_stablecoin_risk.algo_stablecoin_weight,
        "Completed market data transformation"
    );

    Ok(TransformedData {
        stablecoin_risk,
        defi_liquidity_risk,
        contagion_risk,
        arbitrage_opacity_risk,
        algorithmic_stablecoin_risk,
        raw_metrics,
        computed_at: Utc::now(),
    })
}
