use std::collections::HashMap;

use asri::models::{BackingTokenData, Bridge, MarketInputs, Protocol, Stablecoin};
use asri::risk::{RiskCategory, RiskError};
use asri::services::{transform_all_data, DataTransformer};
use asri::utils::math::{calculate_hhi, normalize_hhi_to_risk, normalize_to_100};

fn coin(symbol: &str, circulating: f64, peg_deviation: f64) -> Stablecoin {
    Stablecoin::new(symbol, circulating, peg_deviation)
}

fn protocol(tvl: f64, category: &str, audits: u32, change_1d: f64) -> Protocol {
    Protocol::new("protocol", tvl, category)
        .with_audits(audits)
        .with_change_1d(change_1d)
}

fn bridges(n: usize) -> Vec<Bridge> {
    (0..n).map(|i| Bridge::new(format!("bridge_{}", i))).collect()
}

fn assert_bounded<C: RiskCategory>(inputs: &C) {
    for (name, value, _) in inputs.components() {
        assert!(
            (0.0..=100.0).contains(&value),
            "{}.{}={} out of range",
            inputs.category_name(),
            name,
            value
        );
    }
}

fn sample_coins() -> Vec<Stablecoin> {
    vec![
        coin("USDT", 80e9, 0.0005),
        coin("USDC", 30e9, 0.0003),
        coin("DAI", 5e9, 0.002),
    ]
}

fn sample_protocols() -> Vec<Protocol> {
    vec![
        protocol(10e9, "DEX", 1, 2.0),
        protocol(5e9, "Lending", 1, -1.0),
        protocol(3e9, "DEX", 0, 5.0),
        protocol(1e9, "Yield", 1, 0.5),
    ]
}

#[test]
fn test_hhi_properties() {
    assert!((calculate_hhi(&[100.0; 4]) - 2_500.0).abs() < 1e-9);
    assert!((calculate_hhi(&[500.0]) - 10_000.0).abs() < 1e-9);
    assert!((calculate_hhi(&[50.0, 50.0]) - 5_000.0).abs() < 1e-9);
    assert!((calculate_hhi(&[1.0, 1.0, 1.0]) - calculate_hhi(&[1e9, 1e9, 1e9])).abs() < 1e-6);
}

#[test]
fn test_normalize_extremes() {
    assert_eq!(normalize_to_100(1e12, 0.0, 100.0), 100.0);
    assert_eq!(normalize_to_100(-1e12, 0.0, 100.0), 0.0);
    assert!(normalize_to_100(0.0, 0.0, 10.0).abs() < 1e-9);
    assert!((normalize_to_100(10.0, 0.0, 10.0) - 100.0).abs() < 1e-9);
}

#[test]
fn test_hhi_risk_monotone() {
    let mut prev = -1.0;
    for hhi in (0..=10_000).step_by(500) {
        let risk = normalize_hhi_to_risk(hhi as f64);
        assert!(risk >= prev, "non-monotonic at HHI={}", hhi);
        prev = risk;
    }
}

#[test]
fn test_stablecoin_risk_bounded() {
    let inputs = DataTransformer::new()
        .transform_stablecoin_risk(&sample_coins(), 50e9, 100e9, 4.0)
        .unwrap();
    assert_bounded(&inputs);
}

#[test]
fn test_tvl_at_peak_is_low_risk() {
    let inputs = DataTransformer::new()
        .transform_stablecoin_risk(&sample_coins(), 100e9, 100e9, 3.0)
        .unwrap();
    assert!(inputs.tvl_ratio <= 10.0);
}

#[test]
fn test_single_stablecoin_is_concentrated() {
    let inputs = DataTransformer::new()
        .transform_stablecoin_risk(&[coin("USDT", 80e9, 0.001)], 50e9, 100e9, 4.0)
        .unwrap();
    assert!(inputs.concentration_hhi > 80.0);
}

#[test]
fn test_peg_deviation_raises_peg_volatility() {
    let transformer = DataTransformer::new();
    let tight = transformer
        .transform_stablecoin_risk(&[coin("USDT", 1e9, 0.0001)], 1.0, 1.0, 4.0)
        .unwrap();
    let loose = transformer
        .transform_stablecoin_risk(&[coin("USDT", 1e9, -0.03)], 1.0, 1.0, 4.0)
        .unwrap();
    assert!(loose.peg_volatility > tight.peg_volatility);
}

#[test]
fn test_defi_liquidity_bounded_with_history() {
    let history = [50e9, 52e9, 48e9, 55e9, 47e9];
    let inputs = DataTransformer::new()
        .transform_defi_liquidity_risk(&sample_protocols(), Some(&history))
        .unwrap();
    assert_bounded(&inputs);
    assert!(inputs.tvl_volatility > 50.0);
}

#[test]
fn test_unaudited_protocols_are_max_risk() {
    let unaudited = vec![protocol(10e9, "DEX", 0, 0.0), protocol(5e9, "DEX", 0, 0.0)];
    let inputs = DataTransformer::new()
        .transform_defi_liquidity_risk(&unaudited, None)
        .unwrap();
    assert!((inputs.smart_contract_risk - 100.0).abs() < 1e-9);
}

#[test]
fn test_zero_tvl_protocols_are_ignored() {
    let transformer = DataTransformer::new();
    let with_zeros = vec![
        protocol(0.0, "DEX", 0, 0.0),
        protocol(0.0, "DEX", 0, 0.0),
        protocol(10e9, "DEX", 1, 0.0),
    ];
    let single = vec![protocol(10e9, "DEX", 1, 0.0)];
    assert_eq!(
        transformer.transform_defi_liquidity_risk(&with_zeros, None).unwrap(),
        transformer.transform_defi_liquidity_risk(&single, None).unwrap()
    );
}

#[test]
fn test_contagion_bounded() {
    let protocols = vec![
        protocol(10e9, "DEX", 1, 0.0),
        protocol(2e9, "RWA", 1, 0.0),
        protocol(1e9, "Lending", 1, 0.0),
    ];
    let inputs = DataTransformer::new()
        .transform_contagion_risk(&protocols, 4.0, 25.0, -0.5, &bridges(20), None)
        .unwrap();
    assert_bounded(&inputs);
    assert!(inputs.rwa_growth_rate > 0.0);
}

#[test]
fn test_inverted_yield_curve_raises_linkage() {
    let transformer = DataTransformer::new();
    let protocols = sample_protocols();
    let normal = transformer
        .transform_contagion_risk(&protocols, 4.0, 20.0, 1.0, &bridges(20), None)
        .unwrap();
    let inverted = transformer
        .transform_contagion_risk(&protocols, 4.0, 20.0, -1.0, &bridges(20), None)
        .unwrap();
    assert!(inverted.tradfi_linkage > normal.tradfi_linkage);
}

#[test]
fn test_arbitrage_opacity_bounded() {
    let protocols = vec![protocol(10e9, "DEX", 1, 0.0), protocol(5e9, "DEX", 0, 0.0)];
    let inputs = DataTransformer::new()
        .transform_arbitrage_opacity_risk(&sample_coins(), &protocols, None)
        .unwrap();
    assert_bounded(&inputs);
    assert!((inputs.transparency_score - 100.0 / 3.0).abs() < 1e-9);
    assert!(inputs.unregulated_exposure > 0.0);
}

#[test]
fn test_non_finite_macro_input_rejected() {
    let err = DataTransformer::new()
        .transform_contagion_risk(&[], f64::NAN, 20.0, 0.5, &[], None)
        .unwrap_err();
    assert!(matches!(
        err,
        RiskError::InvalidInput { ref field, .. } if field == "treasury_10y_rate"
    ));
}

#[test]
fn test_transform_all_data_minimal() {
    let inputs = MarketInputs {
        stablecoins: vec![coin("USDT", 80e9, 0.001), coin("USDC", 30e9, 0.001)],
        protocols: vec![protocol(10e9, "DEX", 1, 0.0), protocol(5e9, "DEX", 0, 0.0)],
        bridges: bridges(1),
        current_tvl: 50e9,
        max_historical_tvl: 100e9,
        treasury_10y_rate: 4.0,
        vix: 20.0,
        yield_curve_spread: 0.5,
        ..MarketInputs::default()
    };
    let data = transform_all_data(&inputs).unwrap();

    assert_eq!(data.raw_metrics.num_stablecoins, 2);
    assert_eq!(data.raw_metrics.num_protocols, 2);
    assert_eq!(data.raw_metrics.num_bridges, 1);
    assert!(!data.algorithmic_stablecoin_risk.has_exposure());
}

#[test]
fn test_transform_all_data_with_optional_inputs() {
    let mut backing = HashMap::new();
    backing.insert("LUNA".to_string(), BackingTokenData::new(Some(1.2), Some(0.5)));
    let inputs = MarketInputs {
        stablecoins: vec![coin("USDT", 80e9, 0.001), coin("UST", 18e9, 0.01)],
        protocols: vec![protocol(10e9, "DEX", 1, 0.0)],
        bridges: Vec::new(),
        current_tvl: 50e9,
        max_historical_tvl: 100e9,
        treasury_10y_rate: 4.0,
        vix: 20.0,
        yield_curve_spread: 0.5,
        tvl_history: Some(vec![50e9, 52e9, 48e9]),
        crypto_equity_corr: Some(0.7),
        regulatory_sentiment: Some(65.0),
        backing_token_data: Some(backing),
    };
    let data = transform_all_data(&inputs).unwrap();

    assert!((data.contagion_risk.crypto_equity_correlation - 70.0).abs() < 1e-9);
    assert_eq!(data.arbitrage_opacity_risk.regulatory_sentiment, 65.0);
    assert!(data.algorithmic_stablecoin_risk.has_exposure());
    assert_eq!(data.contagion_risk.bridge_exploit_frequency, 0.0);
}
