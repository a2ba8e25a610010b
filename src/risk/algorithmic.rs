// Algorithmic / hybrid stablecoin risk aggregation
use std::collections::HashMap;
use tracing::{debug, info};

use crate::models::{
    AlgorithmicStablecoinRiskResult, BackingTokenData, ComponentRisks, Stablecoin,
    StablecoinRiskDetail,
};
use crate::risk::classifier::{classify_stablecoin, get_backing_token};
use crate::risk::transforms::{
    calculate_backing_ratio_risk, calculate_collateral_volatility_risk,
    calculate_concentration_risk, calculate_dilution_risk,
};
use crate::utils::math::{clamp_fraction, clamp_score, largest_positive, weighted_mean};

/// Share of the base score replaced by algorithmic risk at full exposure
pub const ALGO_BLEND_FACTOR: f64 = 0.4;
/// Exposure below this fraction of supply leaves the base score untouched
pub const MIN_ALGO_WEIGHT: f64 = 0.01;

/// Per-coin weights for backing ratio, collateral volatility, dilution and concentration
const COMPONENT_WEIGHTS: [f64; 4] = [0.25, 0.25, 0.25, 0.25];

fn lookup_backing_data<'a>(
    data: Option<&'a HashMap<String, BackingTokenData>>,
    backing_token: &str,
) -> Option<&'a BackingTokenData> {
    let data = data?;
    data.get(backing_token).or_else(|| {
        data.iter()
            .find(|(symbol, _)| symbol.eq_ignore_ascii_case(backing_token))
            .map(|(_, entry)| entry)
    })
}

fn composite_risk(components: &ComponentRisks) -> f64 {
    let score: f64 = components
        .iter()
        .zip(COMPONENT_WEIGHTS.iter())
        .map(|((_, value), weight)| value * weight)
        .sum();
    clamp_score(score)
}

/// Supplies are divided by the largest one so totals of finite supplies
/// cannot overflow; shares are unaffected.
#[derive(Debug, Clone, Copy)]
struct SupplyScale {
    scale: f64,
    scaled_total: f64,
}

impl SupplyScale {
    fn of(stablecoins: &[Stablecoin]) -> Self {
        let scale = largest_positive(stablecoins.iter().map(Stablecoin::effective_supply))
            .unwrap_or(1.0);
        let scaled_total = stablecoins
            .iter()
            .map(|coin| coin.effective_supply() / scale)
            .sum();
        Self { scale, scaled_total }
    }

    fn scaled(&self, supply: f64) -> f64 {
        supply / self.scale
    }
}

fn score_stablecoin(
    coin: &Stablecoin,
    supply: SupplyScale,
    backing_token_data: Option<&HashMap<String, BackingTokenData>>,
) -> Option<StablecoinRiskDetail> {
    let stablecoin_type = classify_stablecoin(&coin.symbol, coin.peg_type.as_deref());
    if !stablecoin_type.is_algorithmic_exposure() {
        return None;
    }

    let backing_token = get_backing_token(&coin.symbol);
    let data = backing_token.and_then(|token| lookup_backing_data(backing_token_data, token));

    let component_risks = ComponentRisks {
        backing_ratio_risk: calculate_backing_ratio_risk(data.and_then(|d| d.backing_ratio)),
        collateral_volatility_risk: calculate_collateral_volatility_risk(
            data.and_then(|d| d.volatility_30d),
        ),
        dilution_risk: calculate_dilution_risk(data.and_then(|d| d.supply_growth_30d)),
        concentration_risk: calculate_concentration_risk(
            supply.scaled(coin.effective_supply()),
            supply.scaled_total,
        ),
    };
    let risk = composite_risk(&component_risks);

    debug!(
        symbol = %coin.symbol,
        kind = %stablecoin_type,
        backing_token = ?backing_token,
        has_market_data = data.is_some(),
        risk = %risk,
        "Scored algorithmic stablecoin"
    );

    Some(StablecoinRiskDetail {
        symbol: coin.symbol.clone(),
        stablecoin_type,
        backing_token: backing_token.map(str::to_string),
        circulating: coin.effective_supply(),
        component_risks,
        risk,
    })
}

/// Supply-weighted average of `f` over the details. When every in-scope
/// coin has zero supply the coins are weighted equally.
fn supply_weighted<F>(details: &[StablecoinRiskDetail], f: F) -> f64
where
    F: Fn(&StablecoinRiskDetail) -> f64,
{
    weighted_mean(details.iter().map(|d| (f(d), d.circulating)))
        .or_else(|| weighted_mean(details.iter().map(|d| (f(d), 1.0))))
        .map(clamp_score)
        .unwrap_or(0.0)
}

/// Score the algorithmic and hybrid stablecoins in a supply snapshot.
///
/// Fiat- and crypto-collateralized coins contribute nothing and are left out
/// of the detail list, but their supply still counts toward the total used
/// for concentration and for the exposure weight.
pub fn calculate_algorithmic_stablecoin_risk(
    stablecoins: &[Stablecoin],
    backing_token_data: Option<&HashMap<String, BackingTokenData>>,
) -> AlgorithmicStablecoinRiskResult {
    let supply = SupplyScale::of(stablecoins);

    let details: Vec<StablecoinRiskDetail> = stablecoins
        .iter()
        .filter_map(|coin| score_stablecoin(coin, supply, backing_token_data))
        .collect();

    if details.is_empty() {
        debug!(
            stablecoin_count = stablecoins.len(),
            "No algorithmic or hybrid stablecoins in scope"
        );
        return AlgorithmicStablecoinRiskResult::empty();
    }

    let in_scope_supply: f64 = details.iter().map(|d| supply.scaled(d.circulating)).sum();
    let algo_stablecoin_weight = if supply.scaled_total > 0.0 {
        clamp_fraction(in_scope_supply / supply.scaled_total)
    } else {
        0.0
    };

    let component_risks = ComponentRisks {
        backing_ratio_risk: supply_weighted(&details, |d| d.component_risks.backing_ratio_risk),
        collateral_volatility_risk: supply_weighted(&details, |d| {
            d.component_risks.collateral_volatility_risk
        }),
        dilution_risk: supply_weighted(&details, |d| d.component_risks.dilution_risk),
        concentration_risk: supply_weighted(&details, |d| d.component_risks.concentration_risk),
    };
    let algo_stablecoin_risk = supply_weighted(&details, |d| d.risk);

    info!(
        in_scope = details.len(),
        algo_stablecoin_risk = %algo_stablecoin_risk,
        algo_stablecoin_weight = %algo_stablecoin_weight,
        "Completed algorithmic stablecoin risk calculation"
    );

    AlgorithmicStablecoinRiskResult {
        algo_stablecoin_risk,
        algo_stablecoin_weight,
        component_risks,
        stablecoin_details: details,
    }
}

/// Blend algorithmic stablecoin risk into a base stablecoin/systemic score.
///
/// Exposure under 1% of supply returns `base_scr` unchanged. Otherwise the
/// blend factor grows linearly with exposure, reaching 0.4 at full exposure.
pub fn adjust_scr_for_algorithmic_risk(
    base_scr: f64,
    result: &AlgorithmicStablecoinRiskResult,
) -> f64 {
    adjust_scr_with(base_scr, result, ALGO_BLEND_FACTOR, MIN_ALGO_WEIGHT)
}

/// `adjust_scr_for_algorithmic_risk` with explicit blend parameters
pub fn adjust_scr_with(
    base_scr: f64,
    result: &AlgorithmicStablecoinRiskResult,
    blend_factor: f64,
    min_weight: f64,
) -> f64 {
    let weight = result.algo_stablecoin_weight;
    if weight.is_nan() || weight < min_weight {
        return base_scr;
    }

    let factor = clamp_fraction(blend_factor) * clamp_fraction(weight);
    let adjusted = (1.0 - factor) * base_scr + factor * result.algo_stablecoin_risk;

    debug!(
        base_scr = %base_scr,
        algo_risk = %result.algo_stablecoin_risk,
        algo_weight = %weight,
        blend = %factor,
        adjusted = %adjusted,
        "Adjusted SCR for algorithmic stablecoin exposure"
    );

    clamp_score(adjusted)
}
