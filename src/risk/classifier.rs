// Stablecoin classification and backing-token lookup
use tracing::debug;

use crate::models::StablecoinType;

const FIAT_COLLATERALIZED: &[&str] = &[
    "USDT", "USDC", "BUSD", "TUSD", "USDP", "GUSD", "PYUSD", "FDUSD", "EURC",
];

const CRYPTO_COLLATERALIZED: &[&str] = &["RAI", "LUSD", "GHO", "CRVUSD", "SUSD"];

const KNOWN_ALGORITHMIC: &[&str] = &[
    "UST", "USTC", "USDN", "BEAN", "ESD", "BAC", "DSD", "IRON", "USDD",
];

const KNOWN_HYBRID: &[&str] = &["FRAX", "FEI", "USDX", "YUSD"];

/// Symbol → asset whose price and supply back the peg. `None` entries are
/// known coins without a separate backing token.
const BACKING_TOKENS: &[(&str, Option<&str>)] = &[
    ("UST", Some("LUNA")),
    ("USTC", Some("LUNA")),
    ("FRAX", Some("FXS")),
    ("FEI", Some("TRIBE")),
    ("USDN", Some("WAVES")),
    ("IRON", Some("TITAN")),
    ("USDD", Some("TRX")),
    ("ESD", None),
    ("DSD", None),
    ("BAC", None),
    ("BEAN", None),
];

/// Hint keyword families, checked in order. The first family with a
/// matching substring decides.
const HINT_KEYWORDS: &[(StablecoinType, &[&str])] = &[
    (StablecoinType::Algorithmic, &["algo", "seigniorage"]),
    (StablecoinType::Hybrid, &["hybrid", "fractional"]),
    (StablecoinType::CryptoCollateral, &["crypto", "overcollateral"]),
    (StablecoinType::FiatCollateral, &["fiat"]),
];

fn classify_hint(hint: &str) -> Option<StablecoinType> {
    let hint = hint.to_lowercase();
    HINT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| hint.contains(k)))
        .map(|(kind, _)| *kind)
}

/// Classify a stablecoin by symbol, letting a recognized peg-type hint
/// override the static tables.
pub fn classify_stablecoin(symbol: &str, peg_type_hint: Option<&str>) -> StablecoinType {
    if let Some(kind) = peg_type_hint.and_then(classify_hint) {
        debug!(symbol = %symbol, kind = %kind, "Classified stablecoin from hint");
        return kind;
    }

    let symbol = symbol.to_uppercase();
    let tables: [(&[&str], StablecoinType); 4] = [
        (FIAT_COLLATERALIZED, StablecoinType::FiatCollateral),
        (CRYPTO_COLLATERALIZED, StablecoinType::CryptoCollateral),
        (KNOWN_ALGORITHMIC, StablecoinType::Algorithmic),
        (KNOWN_HYBRID, StablecoinType::Hybrid),
    ];

    tables
        .iter()
        .find(|(table, _)| table.contains(&symbol.as_str()))
        .map(|(_, kind)| *kind)
        .unwrap_or(StablecoinType::Unknown)
}

pub fn get_backing_token(symbol: &str) -> Option<&'static str> {
    let symbol = symbol.to_uppercase();
    BACKING_TOKENS
        .iter()
        .find(|(coin, _)| *coin == symbol)
        .and_then(|(_, backing)| *backing)
}
