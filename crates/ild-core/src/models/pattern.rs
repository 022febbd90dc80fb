//! Pattern definitions and cross-finding rules.

use serde::{Deserialize, Serialize};

use super::context::{ClinicalCondition, ClinicalContext};

/// Guideline tier used by the MDD decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidelineTier {
    /// Top-tier pattern that can stand alone when confidently matched
    Definite,
    /// Second-tier pattern that still benefits from discussion
    Probable,
}

/// Signed score delta applied when a clinical condition holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClinicalModifier {
    pub condition: ClinicalCondition,
    pub delta: f64,
}

/// Static rule describing one radiological pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternDefinition {
    /// Unique key (e.g., "uip_definite")
    pub key: String,
    /// Display name
    pub name: String,
    /// Category label (e.g., "UIP")
    pub category: String,
    /// At least one must be present for the primary trigger path
    pub required_findings: Vec<String>,
    /// Each set is a complete alternate trigger; all members must be present
    #[serde(default)]
    pub alternative_required_sets: Vec<Vec<String>>,
    #[serde(default)]
    pub supportive_findings: Vec<String>,
    #[serde(default)]
    pub against_findings: Vec<String>,
    /// Typical distribution findings
    #[serde(default)]
    pub distribution: Vec<String>,
    /// Base score (0-100)
    pub base_score: f64,
    #[serde(default)]
    pub clinical_modifiers: Vec<ClinicalModifier>,
    #[serde(default)]
    pub associated_diagnoses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guideline_tier: Option<GuidelineTier>,
}

impl PatternDefinition {
    /// Create a pattern with a name, category and base score.
    pub fn new(key: &str, name: &str, category: &str, base_score: f64) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            category: category.into(),
            required_findings: Vec::new(),
            alternative_required_sets: Vec::new(),
            supportive_findings: Vec::new(),
            against_findings: Vec::new(),
            distribution: Vec::new(),
            base_score,
            clinical_modifiers: Vec::new(),
            associated_diagnoses: Vec::new(),
            guideline_tier: None,
        }
    }

    /// Sum of modifier deltas whose condition holds for this case.
    pub fn clinical_modifier_total(&self, ctx: &ClinicalContext) -> f64 {
        self.clinical_modifiers
            .iter()
            .filter(|m| m.condition.applies(ctx))
            .map(|m| m.delta)
            .sum()
    }

    /// Every finding key this pattern references.
    pub fn referenced_findings(&self) -> impl Iterator<Item = &String> {
        self.required_findings
            .iter()
            .chain(self.alternative_required_sets.iter().flatten())
            .chain(&self.supportive_findings)
            .chain(&self.against_findings)
            .chain(&self.distribution)
    }

    pub fn is_definite(&self) -> bool {
        self.guideline_tier == Some(GuidelineTier::Definite)
    }

    pub fn is_probable(&self) -> bool {
        self.guideline_tier == Some(GuidelineTier::Probable)
    }
}

/// A composite finding and the component findings it entails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindingImplication {
    pub composite: String,
    pub components: Vec<String>,
}

/// Score delta for one pattern inside a co-occurrence rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternModifier {
    pub pattern: String,
    pub delta: f64,
}

/// Cross-pattern adjustment triggered when all trigger findings co-occur.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CooccurrenceRule {
    pub name: String,
    pub description: String,
    pub trigger_findings: Vec<String>,
    pub pattern_modifiers: Vec<PatternModifier>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::context::{ConnectiveTissueDisease, Sex};

    fn sample() -> PatternDefinition {
        let mut p = PatternDefinition::new("nsip_fibrotic", "Fibrotic NSIP", "NSIP", 70.0);
        p.required_findings = vec!["reticulation".into()];
        p.alternative_required_sets = vec![vec!["ground_glass".into(), "subpleural_sparing".into()]];
        p.distribution = vec!["basal_predominant".into()];
        p.clinical_modifiers = vec![
            ClinicalModifier { condition: ClinicalCondition::CtdPresent, delta: 15.0 },
            ClinicalModifier { condition: ClinicalCondition::Female, delta: 5.0 },
            ClinicalModifier { condition: ClinicalCondition::AgeOver60, delta: -2.0 },
        ];
        p
    }

    #[test]
    fn test_clinical_modifier_total() {
        let p = sample();
        let ctx = ClinicalContext {
            age: 45,
            sex: Sex::Female,
            ctd: ConnectiveTissueDisease::SystemicSclerosis,
            ..Default::default()
        };
        assert!((p.clinical_modifier_total(&ctx) - 20.0).abs() < 1e-9);

        let ctx = ClinicalContext { age: 70, ..Default::default() };
        assert!((p.clinical_modifier_total(&ctx) + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_referenced_findings_include_alternatives() {
        let p = sample();
        let refs: Vec<&str> = p.referenced_findings().map(String::as_str).collect();
        assert!(refs.contains(&"subpleural_sparing"));
        assert!(refs.contains(&"basal_predominant"));
    }

    #[test]
    fn test_guideline_tier_helpers() {
        let mut p = sample();
        assert!(!p.is_definite() && !p.is_probable());
        p.guideline_tier = Some(GuidelineTier::Probable);
        assert!(p.is_probable());
        assert!(!p.is_definite());
        p.guideline_tier = Some(GuidelineTier::Definite);
        assert!(p.is_definite());
    }

    #[test]
    fn test_pattern_defaults_deserialize() {
        let json = r#"{
            "key": "ppfe",
            "name": "PPFE",
            "category": "PPFE",
            "required_findings": ["pleuroparenchymal_fibroelastosis"],
            "base_score": 70
        }"#;
        let p: PatternDefinition = serde_json::from_str(json).unwrap();
        assert!(p.supportive_findings.is_empty());
        assert!(p.guideline_tier.is_none());
        assert!(!p.is_definite());
    }
}
