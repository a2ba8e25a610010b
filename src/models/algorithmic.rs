use serde::{Deserialize, Serialize};

use crate::models::StablecoinType;

/// The four algorithmic-stablecoin component risks, each 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRisks {
    pub backing_ratio_risk: f64,
    pub collateral_volatility_risk: f64,
    pub dilution_risk: f64,
    pub concentration_risk: f64,
}

impl ComponentRisks {
    pub const KEYS: [&'static str; 4] = [
        "backing_ratio_risk",
        "collateral_volatility_risk",
        "dilution_risk",
        "concentration_risk",
    ];

    /// Look up a component by its serialized key
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "backing_ratio_risk" => Some(self.backing_ratio_risk),
            "collateral_volatility_risk" => Some(self.collateral_volatility_risk),
            "dilution_risk" => Some(self.dilution_risk),
            "concentration_risk" => Some(self.concentration_risk),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("backing_ratio_risk", self.backing_ratio_risk),
            ("collateral_volatility_risk", self.collateral_volatility_risk),
            ("dilution_risk", self.dilution_risk),
            ("concentration_risk", self.concentration_risk),
        ]
        .into_iter()
    }
}

/// Per-coin breakdown for an in-scope (algorithmic or hybrid) stablecoin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StablecoinRiskDetail {
    pub symbol: String,
    pub stablecoin_type: StablecoinType,
    pub backing_token: Option<String>,
    pub circulating: f64,
    pub component_risks: ComponentRisks,
    pub risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmicStablecoinRiskResult {
    /// Supply-weighted composite risk across in-scope coins, 0-100
    pub algo_stablecoin_risk: f64,
    /// In-scope share of total stablecoin supply, 0-1
    pub algo_stablecoin_weight: f64,
    /// Supply-weighted average of each component; all zero when nothing is in scope
    pub component_risks: ComponentRisks,
    pub stablecoin_details: Vec<StablecoinRiskDetail>,
}

impl AlgorithmicStablecoinRiskResult {
    /// Result for a portfolio with no algorithmic exposure
    pub fn empty() -> Self {
        Self {
            algo_stablecoin_risk: 0.0,
            algo_stablecoin_weight: 0.0,
            component_risks: ComponentRisks::default(),
            stablecoin_details: Vec::new(),
        }
    }

    pub fn has_exposure(&self) -> bool {
        !self.stablecoin_details.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_lookup_by_key() {
        let risks = ComponentRisks {
            backing_ratio_risk: 50.0,
            collateral_volatility_risk: 60.0,
            dilution_risk: 30.0,
            concentration_risk: 10.0,
        };
        for key in ComponentRisks::KEYS {
            assert!(risks.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(risks.get("dilution_risk"), Some(30.0));
        assert_eq!(risks.get("peg_risk"), None);
    }

    #[test]
    fn test_serialized_keys_match() {
        let value = serde_json::to_value(ComponentRisks::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        for key in ComponentRisks::KEYS {
            assert!(object.contains_key(key));
        }
    }
}
