use serde::{Deserialize, Serialize};

/// DeFi protocol snapshot as reported by a TVL aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    #[serde(default)]
    pub name: String,
    /// Total value locked in USD
    pub tvl: f64,
    #[serde(default)]
    pub category: String,
    /// Number of published audits
    #[serde(default)]
    pub audits: u32,
    /// 1-day TVL change in percent (2.5 = +2.5%)
    #[serde(default)]
    pub change_1d: f64,
}

impl Protocol {
    pub fn new(name: impl Into<String>, tvl: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tvl,
            category: category.into(),
            audits: 1,
            change_1d: 0.0,
        }
    }

    pub fn with_audits(mut self, audits: u32) -> Self {
        self.audits = audits;
        self
    }

    pub fn with_change_1d(mut self, change_1d: f64) -> Self {
        self.change_1d = change_1d;
        self
    }

    pub fn is_audited(&self) -> bool {
        self.audits > 0
    }

    pub fn is_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }

    /// Lending markets and CDPs are where leverage builds up
    pub fn is_leverage_venue(&self) -> bool {
        ["lending", "cdp", "leveraged farming"]
            .iter()
            .any(|c| self.is_category(c))
    }

    pub fn is_rwa(&self) -> bool {
        self.is_category("rwa") || self.is_category("rwa lending")
    }
}

/// Cross-chain bridge snapshot. Only the number of live bridges feeds the
/// contagion inputs; other fields a feed attaches (such as `tvl`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub name: String,
}

impl Bridge {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_defaults_on_decode() {
        let protocol: Protocol = serde_json::from_str(r#"{"tvl": 1000.0}"#).unwrap();
        assert_eq!(protocol.audits, 0);
        assert_eq!(protocol.change_1d, 0.0);
        assert!(!protocol.is_audited());
    }

    #[test]
    fn test_category_matching_is_case_insensitive() {
        assert!(Protocol::new("aave", 1.0, "Lending").is_leverage_venue());
        assert!(Protocol::new("ondo", 1.0, "RWA").is_rwa());
        assert!(!Protocol::new("uniswap", 1.0, "Dexes").is_leverage_venue());
    }

    #[test]
    fn test_bridge_ignores_feed_tvl() {
        let bridge: Bridge =
            serde_json::from_str(r#"{"name": "stargate", "tvl": 400000000}"#).unwrap();
        assert_eq!(bridge, Bridge::new("stargate"));
        assert_eq!(serde_json::to_string(&bridge).unwrap(), r#"{"name":"stargate"}"#);
    }

    #[test]
    fn test_missing_tvl_is_rejected() {
        let result: Result<Protocol, _> = serde_json::from_str(r#"{"name": "x"}"#);
        assert!(result.is_err());
    }
}
