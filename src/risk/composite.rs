// Aggregated systemic risk index
use tracing::info;

use crate::models::TransformedData;
use crate::risk::algorithmic::adjust_scr_with;
use crate::risk::{
    AlgorithmicBlend, CompositeRiskIndex, CompositeWeights, RiskCategory, RiskFactorContribution,
    RiskLevel,
};
use crate::utils::math::clamp_score;

/// Combine the four category sub-indices into the composite index.
///
/// The stablecoin sub-index is first blended with the algorithmic
/// stablecoin risk. Weights that do not sum to 1 are renormalized; all-zero
/// weights fall back to the defaults.
pub fn calculate_composite_index(
    data: &TransformedData,
    weights: &CompositeWeights,
    blend: &AlgorithmicBlend,
) -> CompositeRiskIndex {
    let base_stablecoin_index = data.stablecoin_risk.sub_index();
    let stablecoin_index = adjust_scr_with(
        base_stablecoin_index,
        &data.algorithmic_stablecoin_risk,
        blend.blend_factor,
        blend.min_weight,
    );
    let defi_liquidity_index = data.defi_liquidity_risk.sub_index();
    let contagion_index = data.contagion_risk.sub_index();
    let arbitrage_opacity_index = data.arbitrage_opacity_risk.sub_index();

    let weights = if weights.total() > 0.0 && weights.as_array().iter().all(|w| *w >= 0.0) {
        *weights
    } else {
        CompositeWeights::default()
    };
    let total_weight = weights.total();

    let mut contributions = vec![
        RiskFactorContribution::new(
            data.stablecoin_risk.category_name(),
            stablecoin_index,
            weights.stablecoin / total_weight,
        ),
        RiskFactorContribution::new(
            data.defi_liquidity_risk.category_name(),
            defi_liquidity_index,
            weights.defi_liquidity / total_weight,
        ),
        RiskFactorContribution::new(
            data.contagion_risk.category_name(),
            contagion_index,
            weights.contagion / total_weight,
        ),
        RiskFactorContribution::new(
            data.arbitrage_opacity_risk.category_name(),
            arbitrage_opacity_index,
            weights.arbitrage_opacity / total_weight,
        ),
    ];

    let composite = clamp_score(contributions.iter().map(|c| c.contribution).sum());
    contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    let risk_level = RiskLevel::from_score(composite);

    info!(
        composite = %composite,
        risk_level = %risk_level,
        stablecoin_index = %stablecoin_index,
        defi_liquidity_index = %defi_liquidity_index,
        contagion_index = %contagion_index,
        arbitrage_opacity_index = %arbitrage_opacity_index,
        "Calculated composite risk index"
    );

    CompositeRiskIndex {
        base_stablecoin_index,
        stablecoin_index,
        defi_liquidity_index,
        contagion_index,
        arbitrage_opacity_index,
        composite,
        risk_level,
        contributions,
    }
}
