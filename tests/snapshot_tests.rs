use std::fs;

use asri::config::Settings;
use asri::models::MarketInputs;
use asri::risk::{calculate_composite_index, RiskError, RiskLevel};
use asri::services::transform_all_data;
use asri::AppError;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
    "stablecoins": [
        {"symbol": "USDT", "name": "Tether", "circulating": 80000000000, "peg_deviation": 0.0005},
        {"symbol": "USDC", "circulating": 30000000000, "peg_deviation": 0.0003},
        {"symbol": "DAI", "circulating": 5000000000, "peg_deviation": 0.002,
         "peg_type": "crypto-backed"},
        {"symbol": "UST", "circulating": 18000000000, "peg_deviation": 0.01},
        {"symbol": "FRAX", "circulating": 1000000000, "peg_deviation": 0.001}
    ],
    "protocols": [
        {"name": "aave", "tvl": 12000000000, "category": "Lending", "audits": 4, "change_1d": -1.5},
        {"name": "uniswap", "tvl": 5000000000, "category": "Dexes", "audits": 3, "change_1d": 0.5},
        {"name": "ondo", "tvl": 600000000, "category": "RWA", "audits": 1, "change_1d": 2.0},
        {"name": "degen-farm", "tvl": 90000000, "category": "Yield", "change_1d": 12.0},
        {"name": "dead", "tvl": 0, "category": "Dexes"}
    ],
    "bridges": [{"name": "wormhole"}, {"name": "stargate", "tvl": 400000000}],
    "current_tvl": 90000000000,
    "max_historical_tvl": 180000000000,
    "treasury_10y_rate": 4.3,
    "vix": 18.5,
    "yield_curve_spread": -0.3,
    "tvl_history": [95000000000, 93000000000, 91000000000, 90000000000],
    "crypto_equity_corr": 0.45,
    "backing_token_data": {
        "LUNA": {"volatility_30d": 1.1, "supply_growth_30d": 0.6},
        "FXS": {"volatility_30d": 0.7, "supply_growth_30d": 0.02, "backing_ratio": 0.9}
    }
}"#;

#[test]
fn test_snapshot_file_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market.json");
    fs::write(&path, SNAPSHOT).unwrap();

    let market = MarketInputs::from_path(&path).unwrap();
    assert_eq!(market.stablecoins[0].name, "Tether");
    assert_eq!(market.protocols[3].audits, 0);

    let data = transform_all_data(&market).unwrap();
    assert_eq!(data.raw_metrics.num_protocols, 5);
    assert_eq!(data.algorithmic_stablecoin_risk.stablecoin_details.len(), 2);
    assert!(data.defi_liquidity_risk.tvl_volatility < 50.0);

    let settings = Settings::default();
    let index =
        calculate_composite_index(&data, &settings.risk.weights(), &settings.risk.blend());
    assert!((0.0..=100.0).contains(&index.composite));
    assert_eq!(index.risk_level, RiskLevel::from_score(index.composite));
    assert!(index.stablecoin_index > index.base_stablecoin_index);
    assert_eq!(index.contributions.len(), 4);

    let json = serde_json::to_string(&index).unwrap();
    assert!(json.contains("\"contributions\""));
}

#[test]
fn test_missing_snapshot_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = MarketInputs::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RiskError::Io(_)));
    assert!(matches!(AppError::from(err), AppError::IoError(_)));
}

#[test]
fn test_malformed_snapshot_is_serialization_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"stablecoins": [{"symbol": "USDT"}]"#).unwrap();

    let err = MarketInputs::from_path(&path).unwrap_err();
    assert!(matches!(err, RiskError::Serialization(_)));
}

#[test]
fn test_negative_supply_is_rejected_by_transform() {
    let json = SNAPSHOT.replace(
        r#""circulating": 80000000000"#,
        r#""circulating": -80000000000"#,
    );
    let market = MarketInputs::from_json_str(&json).unwrap();
    let err = transform_all_data(&market).unwrap_err();
    assert!(matches!(err, RiskError::InvalidInput { .. }));
    assert!(matches!(AppError::from(err), AppError::ValidationError(_)));
}

#[test]
fn test_settings_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("asri.toml");
    fs::write(
        &path,
        r#"
[risk]
algo_blend_factor = 0.5

[risk.weights]
stablecoin = 0.25
defi_liquidity = 0.25
contagion = 0.25
arbitrage_opacity = 0.25

[logging]
format = "json"
"#,
    )
    .unwrap();

    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.risk.algo_blend_factor, 0.5);
    assert_eq!(settings.risk.algo_min_weight, 0.01);
    assert_eq!(settings.risk.weights.stablecoin, 0.25);
    assert_eq!(settings.logging.level, "info");
    assert!(settings.logging.is_json());
}

#[test]
fn test_settings_file_with_bad_weights_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("asri.toml");
    fs::write(&path, "[risk.weights]\nstablecoin = 0.9\n").unwrap();

    let err = Settings::load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, AppError::ConfigError(_)));
}
