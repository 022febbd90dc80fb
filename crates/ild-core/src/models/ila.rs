//! Interstitial lung abnormality (ILA) classification models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// ILA category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IlaCategory {
    None,
    NonSubpleural,
    SubpleuralNonfibrotic,
    SubpleuralFibrotic,
}

impl IlaCategory {
    pub fn key(&self) -> &'static str {
        match self {
            IlaCategory::None => "none",
            IlaCategory::NonSubpleural => "non_subpleural",
            IlaCategory::SubpleuralNonfibrotic => "subpleural_nonfibrotic",
            IlaCategory::SubpleuralFibrotic => "subpleural_fibrotic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IlaCategory::None => "No ILA detected",
            IlaCategory::NonSubpleural => "Non-subpleural ILA",
            IlaCategory::SubpleuralNonfibrotic => "Subpleural non-fibrotic ILA",
            IlaCategory::SubpleuralFibrotic => "Subpleural fibrotic ILA",
        }
    }
}

/// Risk of progression to ILD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// Outcome of one ILA classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IlaResult {
    pub present: bool,
    pub category: IlaCategory,
    pub category_label: String,
    pub risk_level: RiskLevel,
    /// Extent of lung involvement in percent
    pub extent_percent: f64,
    pub has_fibrotic_features: bool,
    pub is_subpleural: bool,
    pub follow_up: String,
    pub selected_findings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_category_keys() {
        assert_eq!(IlaCategory::SubpleuralFibrotic.key(), "subpleural_fibrotic");
        let json = serde_json::to_string(&IlaCategory::NonSubpleural).unwrap();
        assert_eq!(json, "\"non_subpleural\"");
    }
}
