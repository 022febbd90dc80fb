//! Analysis results produced by the decision engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Score and evidence trail for one pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternResult {
    pub pattern_key: String,
    pub pattern_name: String,
    pub base_score: f64,
    /// Trigger score after the required-ratio and inference factor
    pub trigger_score: f64,
    /// Supportive finding bonus (capped)
    pub supportive_score: f64,
    /// Flat bonus for a typical distribution
    pub distribution_score: f64,
    /// Against-finding penalty (positive number, subtracted)
    pub penalty_score: f64,
    /// Trigger + supportive + distribution - penalty, before modifiers
    pub finding_score: f64,
    /// Clinical modifiers plus any co-occurrence adjustment
    pub clinical_modifier_score: f64,
    /// Clamped to [0, 100]
    pub final_score: f64,
    /// True when the pattern was triggered by an alternative required set
    pub used_alternative: bool,
    pub matched_required: Vec<String>,
    pub matched_supportive: Vec<String>,
    pub matched_against: Vec<String>,
    pub associated_diagnoses: Vec<String>,
}

impl PatternResult {
    /// Zero-score result for a pattern whose trigger was not satisfied.
    pub fn untriggered(
        pattern_key: &str,
        pattern_name: &str,
        base_score: f64,
        associated_diagnoses: &[String],
    ) -> Self {
        Self {
            pattern_key: pattern_key.into(),
            pattern_name: pattern_name.into(),
            base_score,
            trigger_score: 0.0,
            supportive_score: 0.0,
            distribution_score: 0.0,
            penalty_score: 0.0,
            finding_score: 0.0,
            clinical_modifier_score: 0.0,
            final_score: 0.0,
            used_alternative: false,
            matched_required: Vec::new(),
            matched_supportive: Vec::new(),
            matched_against: Vec::new(),
            associated_diagnoses: associated_diagnoses.to_vec(),
        }
    }

    pub fn is_triggered(&self) -> bool {
        !self.matched_required.is_empty()
    }

    /// Confidence band for the final score.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.final_score)
    }
}

/// Traffic-light colour for a confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceColor {
    Green,
    Orange,
    Red,
}

/// Confidence band for a pattern score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    ModerateHigh,
    Moderate,
    LowModerate,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ConfidenceLevel::High
        } else if score >= 70.0 {
            ConfidenceLevel::ModerateHigh
        } else if score >= 51.0 {
            ConfidenceLevel::Moderate
        } else if score >= 30.0 {
            ConfidenceLevel::LowModerate
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High confidence - typical pattern",
            ConfidenceLevel::ModerateHigh => "Moderate-high confidence - probable pattern",
            ConfidenceLevel::Moderate => "Moderate confidence - compatible pattern",
            ConfidenceLevel::LowModerate => "Low-moderate confidence - indeterminate",
            ConfidenceLevel::Low => "Low confidence - consider alternatives",
        }
    }

    pub fn color(&self) -> ConfidenceColor {
        match self {
            ConfidenceLevel::High | ConfidenceLevel::ModerateHigh => ConfidenceColor::Green,
            ConfidenceLevel::Moderate | ConfidenceLevel::LowModerate => ConfidenceColor::Orange,
            ConfidenceLevel::Low => ConfidenceColor::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => {
                "CT findings match this pattern with high confidence. May be diagnostic in the appropriate clinical context."
            }
            ConfidenceLevel::ModerateHigh => {
                "CT findings strongly suggest this pattern. Clinical correlation is recommended."
            }
            ConfidenceLevel::Moderate => {
                "CT findings are compatible with this pattern but differentials remain. MDD is recommended."
            }
            ConfidenceLevel::LowModerate => {
                "CT findings overlap several patterns. Biopsy or further work-up may be required."
            }
            ConfidenceLevel::Low => {
                "CT findings are insufficient for this pattern. Alternative diagnoses should be considered."
            }
        }
    }
}

/// Which MDD rule decided the recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MddBasis {
    /// Nothing was selected
    NoFindings,
    /// No pattern scored above zero
    InsufficientFindings,
    /// The primary pattern has contradicting findings
    ConflictingFindings { findings: Vec<String> },
    /// A definite-tier pattern at high confidence
    DefinitePattern { pattern_name: String, score: f64 },
    /// The top two patterns are too close to separate
    CloseDifferential {
        first_name: String,
        first_score: f64,
        second_name: String,
        second_score: f64,
    },
    /// The primary score is below the confidence threshold
    LowConfidence { score: f64 },
    /// A probable-tier pattern
    ProbablePattern { pattern_name: String },
    /// Confident, non-conflicting primary pattern
    ConfidentPattern { pattern_name: String, score: f64 },
}

impl MddBasis {
    /// Stable key of the deciding rule.
    pub fn rule_key(&self) -> &'static str {
        match self {
            MddBasis::NoFindings => "no_findings",
            MddBasis::InsufficientFindings => "insufficient_findings",
            MddBasis::ConflictingFindings { .. } => "conflicting_findings",
            MddBasis::DefinitePattern { .. } => "definite_pattern",
            MddBasis::CloseDifferential { .. } => "close_differential",
            MddBasis::LowConfidence { .. } => "low_confidence",
            MddBasis::ProbablePattern { .. } => "probable_pattern",
            MddBasis::ConfidentPattern { .. } => "confident_pattern",
        }
    }

    /// Whether this basis leads to an MDD recommendation.
    pub fn recommends_mdd(&self) -> bool {
        matches!(
            self,
            MddBasis::ConflictingFindings { .. }
                | MddBasis::CloseDifferential { .. }
                | MddBasis::LowConfidence { .. }
                | MddBasis::ProbablePattern { .. }
        )
    }
}

impl fmt::Display for MddBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MddBasis::NoFindings => write!(f, "No findings selected."),
            MddBasis::InsufficientFindings => write!(
                f,
                "Insufficient findings: no pattern could be assessed."
            ),
            MddBasis::ConflictingFindings { findings } => write!(
                f,
                "Findings inconsistent with the primary pattern are present: {}. \
                 MDD is recommended because of atypical features.",
                findings.join(", ")
            ),
            MddBasis::DefinitePattern { pattern_name, score } => write!(
                f,
                "{} identified with high confidence ({:.0}%). Per the 2025 ERS/ATS guideline, \
                 this pattern is sufficient for diagnosis in the appropriate clinical context.",
                pattern_name, score
            ),
            MddBasis::CloseDifferential {
                first_name,
                first_score,
                second_name,
                second_score,
            } => write!(
                f,
                "The score gap between the top two patterns is small \
                 ({}: {:.0}% vs {}: {:.0}%). MDD is recommended for the differential.",
                first_name, first_score, second_name, second_score
            ),
            MddBasis::LowConfidence { score } => write!(
                f,
                "Diagnostic confidence is moderate to low ({:.0}%). MDD, serology and/or \
                 biopsy should be considered for a definite diagnosis.",
                score
            ),
            MddBasis::ProbablePattern { pattern_name } => write!(
                f,
                "{} identified. A diagnosis can be made for this pattern, but MDD may \
                 increase diagnostic confidence in uncertain cases.",
                pattern_name
            ),
            MddBasis::ConfidentPattern { pattern_name, score } => write!(
                f,
                "{} identified with sufficient confidence ({:.0}%). Routine MDD is not \
                 required but may be considered if clinical suspicion persists.",
                pattern_name, score
            ),
        }
    }
}

/// Outcome of one `analyze` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticResult {
    /// Highest-scoring pattern with score > 0
    pub primary_pattern: Option<PatternResult>,
    /// All patterns, descending by final score
    pub ranked_patterns: Vec<PatternResult>,
    pub mdd_recommended: bool,
    pub mdd_basis: MddBasis,
    pub mdd_reason: String,
    /// The findings as selected, before expansion
    pub selected_findings: Vec<String>,
    /// Version of the knowledge base that produced this result
    pub knowledge_base_version: String,
    /// Fingerprint of the knowledge base that produced this result
    pub knowledge_base_fingerprint: String,
}

impl DiagnosticResult {
    /// Patterns among the top `limit` ranked that are not the primary and score above `min_score`.
    pub fn differential(&self, limit: usize, min_score: f64) -> Vec<&PatternResult> {
        let primary_key = self.primary_pattern.as_ref().map(|p| p.pattern_key.as_str());
        self.ranked_patterns
            .iter()
            .take(limit)
            .filter(|p| p.final_score > min_score && Some(p.pattern_key.as_str()) != primary_key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(key: &str, score: f64) -> PatternResult {
        let mut r = PatternResult::untriggered(key, key, 50.0, &[]);
        r.final_score = score;
        r
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceLevel::from_score(95.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(90.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(70.0), ConfidenceLevel::ModerateHigh);
        assert_eq!(ConfidenceLevel::from_score(51.0), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(50.9), ConfidenceLevel::LowModerate);
        assert_eq!(ConfidenceLevel::from_score(29.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::Moderate.color(), ConfidenceColor::Orange);
    }

    #[test]
    fn test_untriggered_is_empty() {
        let r = PatternResult::untriggered("op", "OP", 70.0, &["COP".to_string()]);
        assert!(!r.is_triggered());
        assert_eq!(r.final_score, 0.0);
        assert_eq!(r.associated_diagnoses, vec!["COP".to_string()]);
    }

    #[test]
    fn test_mdd_basis_recommendation() {
        assert!(!MddBasis::NoFindings.recommends_mdd());
        assert!(MddBasis::LowConfidence { score: 40.0 }.recommends_mdd());
        assert!(MddBasis::ProbablePattern { pattern_name: "x".into() }.recommends_mdd());
        assert!(!MddBasis::ConfidentPattern { pattern_name: "x".into(), score: 80.0 }.recommends_mdd());
    }

    #[test]
    fn test_mdd_basis_text() {
        let text = MddBasis::ConflictingFindings {
            findings: vec!["ground_glass".into(), "cysts".into()],
        }
        .to_string();
        assert!(text.contains("ground_glass, cysts"));
        assert_eq!(
            MddBasis::LowConfidence { score: 40.0 }.rule_key(),
            "low_confidence"
        );
        assert_eq!(MddBasis::NoFindings.to_string(), "No findings selected.");
    }

    #[test]
    fn test_differential_excludes_primary() {
        let ranked = vec![result("a", 80.0), result("b", 60.0), result("c", 8.0), result("d", 50.0)];
        let diag = DiagnosticResult {
            primary_pattern: Some(ranked[0].clone()),
            ranked_patterns: ranked,
            mdd_recommended: false,
            mdd_basis: MddBasis::NoFindings,
            mdd_reason: String::new(),
            selected_findings: vec![],
            knowledge_base_version: String::new(),
            knowledge_base_fingerprint: String::new(),
        };
        let keys: Vec<&str> = diag.differential(3, 10.0).iter().map(|p| p.pattern_key.as_str()).collect();
        assert_eq!(keys, vec!["b"]);
    }
}
