//! Interstitial lung abnormality (ILA) classifier.
//!
//! Category and progression risk follow the Fleischner Society position
//! paper; follow-up advice is looked up by (category, risk).

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::{FindingSet, IlaCategory, IlaResult, RiskLevel};

/// Extent above which ILA is high risk.
pub const HIGH_EXTENT: f64 = 15.0;
/// Extent above which ILA is at least medium risk.
pub const MEDIUM_EXTENT: f64 = 5.0;

const NO_ILA_FOLLOW_UP: &str = "No ILA detected. Routine follow-up is sufficient.";
const GENERIC_FOLLOW_UP: &str =
    "ILA detected. Clinical evaluation and follow-up are recommended.";

/// Classifies ILA findings into a category, risk level and follow-up advice.
pub struct IlaClassifier {
    /// Findings that mark an ILA as fibrotic
    fibrotic_markers: HashSet<String>,
    /// (category, risk) → follow-up advice
    follow_ups: HashMap<(IlaCategory, RiskLevel), String>,
}

impl Default for IlaClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IlaClassifier {
    /// Create a classifier with the default fibrotic markers and follow-up table.
    pub fn new() -> Self {
        Self {
            fibrotic_markers: default_fibrotic_markers(),
            follow_ups: default_follow_ups(),
        }
    }

    /// Classify an ILA.
    ///
    /// `extent_percent` is taken as given. When `present` is false the other
    /// inputs are ignored.
    pub fn classify(
        &self,
        present: bool,
        subpleural: bool,
        extent_percent: f64,
        findings: &FindingSet,
    ) -> IlaResult {
        if !present {
            return IlaResult {
                present: false,
                category: IlaCategory::None,
                category_label: IlaCategory::None.label().into(),
                risk_level: RiskLevel::Low,
                extent_percent: 0.0,
                has_fibrotic_features: false,
                is_subpleural: false,
                follow_up: NO_ILA_FOLLOW_UP.into(),
                selected_findings: Vec::new(),
            };
        }

        let has_fibrotic = findings.iter().any(|f| self.fibrotic_markers.contains(f));

        let category = if has_fibrotic && subpleural {
            IlaCategory::SubpleuralFibrotic
        } else if subpleural {
            IlaCategory::SubpleuralNonfibrotic
        } else {
            IlaCategory::NonSubpleural
        };

        let risk_level = determine_risk(category, extent_percent, has_fibrotic, findings.len());
        let follow_up = self.follow_up(category, risk_level, extent_percent);

        debug!(
            category = category.key(),
            risk = %risk_level,
            extent_percent,
            "classified ILA"
        );

        IlaResult {
            present: true,
            category,
            category_label: category.label().into(),
            risk_level,
            extent_percent,
            has_fibrotic_features: has_fibrotic,
            is_subpleural: subpleural,
            follow_up,
            selected_findings: findings.iter().cloned().collect(),
        }
    }

    /// Follow-up advice, falling back to generic text when no entry exists.
    pub fn follow_up(&self, category: IlaCategory, risk: RiskLevel, extent_percent: f64) -> String {
        if let Some(text) = self.follow_ups.get(&(category, risk)) {
            return text.clone();
        }
        if risk == RiskLevel::High {
            format!(
                "ILA extent is {:.0}% with a high risk of progression. PFTs, respiratory \
                 consultation and follow-up HRCT within 3-6 months are recommended.",
                extent_percent
            )
        } else {
            GENERIC_FOLLOW_UP.into()
        }
    }
}

/// Fibrotic features always mean high risk; otherwise risk follows extent.
fn determine_risk(
    category: IlaCategory,
    extent_percent: f64,
    has_fibrotic: bool,
    finding_count: usize,
) -> RiskLevel {
    if has_fibrotic || extent_percent > HIGH_EXTENT {
        RiskLevel::High
    } else if extent_percent > MEDIUM_EXTENT {
        RiskLevel::Medium
    } else if category == IlaCategory::NonSubpleural || finding_count <= 1 {
        RiskLevel::Low
    } else {
        RiskLevel::Medium
    }
}

fn default_fibrotic_markers() -> HashSet<String> {
    ["ila_traction_bronchiectasis", "ila_honeycombing"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_follow_ups() -> HashMap<(IlaCategory, RiskLevel), String> {
    let mut map = HashMap::new();

    map.insert(
        (IlaCategory::SubpleuralFibrotic, RiskLevel::High),
        "Fibrotic ILA detected with a high risk of progression to ILD. PFTs and a \
         follow-up HRCT within 3-6 months are recommended. If symptomatic, refer to \
         respiratory medicine and consider MDD."
            .to_string(),
    );
    map.insert(
        (IlaCategory::SubpleuralNonfibrotic, RiskLevel::Medium),
        "Subpleural non-fibrotic ILA detected. A follow-up HRCT within 12 months is \
         recommended to assess progression, with baseline PFTs."
            .to_string(),
    );
    map.insert(
        (IlaCategory::SubpleuralNonfibrotic, RiskLevel::Low),
        "Minimal subpleural ILA detected. A follow-up HRCT within 12-24 months may be \
         considered, earlier if symptoms develop."
            .to_string(),
    );
    map.insert(
        (IlaCategory::NonSubpleural, RiskLevel::Medium),
        "Non-subpleural ILA detected. Investigate the aetiology (exposure history, \
         autoimmune markers). A follow-up HRCT within 12 months is recommended."
            .to_string(),
    );
    map.insert(
        (IlaCategory::NonSubpleural, RiskLevel::Low),
        "Minimal non-subpleural ILA detected. Clinical significance is uncertain; \
         evaluate if symptoms develop."
            .to_string(),
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finding_set;

    #[test]
    fn test_not_present() {
        let result = IlaClassifier::new().classify(false, true, 30.0, &finding_set(["ila_honeycombing"]));
        assert!(!result.present);
        assert_eq!(result.category, IlaCategory::None);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.extent_percent, 0.0);
        assert!(result.selected_findings.is_empty());
        assert_eq!(result.follow_up, NO_ILA_FOLLOW_UP);
    }

    #[test]
    fn test_subpleural_fibrotic_is_high() {
        let classifier = IlaClassifier::new();
        let result = classifier.classify(true, true, 20.0, &finding_set(["ila_honeycombing"]));
        assert_eq!(result.category, IlaCategory::SubpleuralFibrotic);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.has_fibrotic_features);
        assert!(result.follow_up.starts_with("Fibrotic ILA detected"));

        // fibrosis overrides a small extent
        let result = classifier.classify(true, true, 2.0, &finding_set(["ila_traction_bronchiectasis"]));
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_fibrotic_non_subpleural_uses_generic_high_text() {
        let result = IlaClassifier::new().classify(true, false, 3.0, &finding_set(["ila_honeycombing"]));
        assert_eq!(result.category, IlaCategory::NonSubpleural);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.follow_up.contains("3%"));
    }

    #[test]
    fn test_extent_thresholds() {
        let c = IlaClassifier::new();
        let one = finding_set(["ila_reticulation"]);
        assert_eq!(c.classify(true, true, 16.0, &one).risk_level, RiskLevel::High);
        assert_eq!(c.classify(true, true, 15.0, &one).risk_level, RiskLevel::Medium);
        assert_eq!(c.classify(true, false, 6.0, &one).risk_level, RiskLevel::Medium);
        assert_eq!(c.classify(true, true, 5.0, &one).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_small_extent_finding_count() {
        let c = IlaClassifier::new();
        let two = finding_set(["ila_reticulation", "ila_ground_glass"]);
        assert_eq!(c.classify(true, true, 4.0, &two).risk_level, RiskLevel::Medium);
        assert_eq!(c.classify(true, false, 4.0, &two).risk_level, RiskLevel::Low);
        assert_eq!(c.classify(true, true, 4.0, &FindingSet::new()).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_high_extent_nonfibrotic_fallback() {
        let result = IlaClassifier::new().classify(true, true, 22.4, &finding_set(["ila_reticulation"]));
        assert_eq!(result.category, IlaCategory::SubpleuralNonfibrotic);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.follow_up.starts_with("ILA extent is 22%"));
    }

    #[test]
    fn test_table_lookup() {
        let c = IlaClassifier::new();
        let text = c.follow_up(IlaCategory::NonSubpleural, RiskLevel::Medium, 8.0);
        assert!(text.starts_with("Non-subpleural ILA detected"));
        let text = c.follow_up(IlaCategory::SubpleuralFibrotic, RiskLevel::Medium, 8.0);
        assert_eq!(text, GENERIC_FOLLOW_UP);
    }
}
