//! Finding/pattern knowledge base.
//!
//! The knowledge base is declarative data: the finding taxonomy, pattern
//! definitions, finding implications and co-occurrence rules. It is built
//! once, indexed by key, and never mutated afterwards.

mod patterns;
mod rules;
mod taxonomy;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strsim::jaro_winkler;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    CooccurrenceRule, Finding, FindingCategory, FindingImplication, PatternDefinition,
};

/// Version label of the built-in knowledge base.
pub const BUILTIN_VERSION: &str = "2025.1";

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Knowledge base errors.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{owner} references unknown finding '{key}'{}", suggestion_suffix(.suggestion))]
    UnknownFinding {
        owner: String,
        key: String,
        suggestion: Option<String>,
    },

    #[error("rule '{rule}' modifies unknown pattern '{pattern}'")]
    UnknownPattern { rule: String, pattern: String },

    #[error("pattern '{pattern}' has base score {score} outside [0, 100]")]
    BaseScoreOutOfRange { pattern: String, score: f64 },

    #[error("pattern '{pattern}' lists '{key}' as a distribution but it is not a distribution finding")]
    NotDistribution { pattern: String, key: String },

    #[error("pattern '{pattern}' repeats clinical condition {condition}")]
    DuplicateCondition { pattern: String, condition: String },

    #[error("pattern '{0}' has an empty alternative required set")]
    EmptyAlternativeSet(String),

    #[error("duplicate finding key: {0}")]
    DuplicateFinding(String),

    #[error("duplicate pattern key: {0}")]
    DuplicatePattern(String),

    #[error("implication '{composite}' entails '{component}', which is itself composite")]
    ChainedImplication { composite: String, component: String },

    #[error("co-occurrence rule '{0}' has no trigger findings")]
    EmptyTrigger(String),

    #[error("knowledge base failed validation with {} problem(s)", .0.len())]
    Invalid(Vec<KnowledgeError>),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Serializable knowledge-base document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeBaseData {
    pub version: String,
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub ila_findings: Vec<Finding>,
    pub patterns: Vec<PatternDefinition>,
    #[serde(default)]
    pub implications: Vec<FindingImplication>,
    #[serde(default)]
    pub cooccurrence_rules: Vec<CooccurrenceRule>,
    /// Pre-2025 pattern key → current key
    #[serde(default)]
    pub legacy_pattern_keys: BTreeMap<String, String>,
}

impl KnowledgeBaseData {
    /// The built-in 2025 ERS/ATS knowledge base.
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_VERSION.into(),
            findings: taxonomy::default_findings(),
            ila_findings: taxonomy::default_ila_findings(),
            patterns: patterns::default_patterns(),
            implications: rules::default_implications(),
            cooccurrence_rules: rules::default_cooccurrence_rules(),
            legacy_pattern_keys: rules::default_legacy_keys(),
        }
    }
}

/// Indexed, immutable knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    data: KnowledgeBaseData,
    finding_index: HashMap<String, usize>,
    ila_index: HashMap<String, usize>,
    pattern_index: HashMap<String, usize>,
    implication_index: HashMap<String, usize>,
    fingerprint: String,
}

static BUILTIN: OnceLock<Arc<KnowledgeBase>> = OnceLock::new();

impl KnowledgeBase {
    /// Process-wide built-in knowledge base, initialised on first use.
    pub fn builtin() -> &'static KnowledgeBase {
        Self::builtin_shared().as_ref()
    }

    /// Shared handle to the built-in knowledge base.
    pub fn builtin_shared() -> &'static Arc<KnowledgeBase> {
        BUILTIN.get_or_init(|| Arc::new(KnowledgeBase::from_data(KnowledgeBaseData::builtin())))
    }

    /// Index a knowledge-base document without validating it.
    ///
    /// Duplicate keys resolve to their first declaration.
    pub fn from_data(data: KnowledgeBaseData) -> Self {
        fn index<T>(items: &[T], key: impl Fn(&T) -> &str) -> HashMap<String, usize> {
            let mut map = HashMap::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                map.entry(key(item).to_string()).or_insert(i);
            }
            map
        }

        let finding_index = index(&data.findings, |f| &f.key);
        let ila_index = index(&data.ila_findings, |f| &f.key);
        let pattern_index = index(&data.patterns, |p| &p.key);
        let implication_index = index(&data.implications, |i| &i.composite);
        let fingerprint = compute_fingerprint(&data);

        Self {
            data,
            finding_index,
            ila_index,
            pattern_index,
            implication_index,
            fingerprint,
        }
    }

    /// Parse and validate a knowledge base from JSON.
    pub fn from_json(json: &str) -> KnowledgeResult<Self> {
        let data: KnowledgeBaseData = serde_json::from_str(json)?;
        let kb = Self::from_data(data);

        let problems = kb.validate();
        if !problems.is_empty() {
            for problem in &problems {
                warn!(%problem, "knowledge base validation problem");
            }
            return Err(KnowledgeError::Invalid(problems));
        }

        debug!(
            version = %kb.version(),
            patterns = kb.patterns().len(),
            findings = kb.findings().len(),
            fingerprint = %kb.fingerprint(),
            "loaded knowledge base"
        );
        Ok(kb)
    }

    /// Serialize the underlying document as pretty JSON.
    pub fn to_json(&self) -> KnowledgeResult<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn data(&self) -> &KnowledgeBaseData {
        &self.data
    }

    pub fn version(&self) -> &str {
        &self.data.version
    }

    /// SHA-256 of the canonical JSON document, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// ILD checklist findings in display order.
    pub fn findings(&self) -> &[Finding] {
        &self.data.findings
    }

    pub fn ila_findings(&self) -> &[Finding] {
        &self.data.ila_findings
    }

    /// Look up an ILD or ILA finding by key.
    pub fn finding(&self, key: &str) -> Option<&Finding> {
        self.finding_index
            .get(key)
            .map(|&i| &self.data.findings[i])
            .or_else(|| self.ila_index.get(key).map(|&i| &self.data.ila_findings[i]))
    }

    /// Findings of one checklist category, in display order.
    pub fn findings_in(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> {
        self.data
            .findings
            .iter()
            .filter(move |f| f.category == Some(category))
    }

    /// Patterns in declaration order.
    pub fn patterns(&self) -> &[PatternDefinition] {
        &self.data.patterns
    }

    /// Look up a pattern by current or legacy key.
    pub fn pattern(&self, key: &str) -> Option<&PatternDefinition> {
        self.pattern_index
            .get(self.resolve_pattern_key(key))
            .map(|&i| &self.data.patterns[i])
    }

    /// Map a pre-2025 pattern key to its current key; other keys pass through.
    pub fn resolve_pattern_key<'k>(&'k self, key: &'k str) -> &'k str {
        self.data
            .legacy_pattern_keys
            .get(key)
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn implications(&self) -> &[FindingImplication] {
        &self.data.implications
    }

    /// Components entailed by a composite finding.
    pub fn implied_components(&self, key: &str) -> Option<&[String]> {
        self.implication_index
            .get(key)
            .map(|&i| self.data.implications[i].components.as_slice())
    }

    /// Co-occurrence rules in declaration order.
    pub fn cooccurrence_rules(&self) -> &[CooccurrenceRule] {
        &self.data.cooccurrence_rules
    }

    /// Closest known finding key, if any is similar enough.
    pub fn suggest_finding(&self, key: &str) -> Option<&str> {
        self.data
            .findings
            .iter()
            .chain(&self.data.ila_findings)
            .map(|f| (f.key.as_str(), jaro_winkler(key, &f.key)))
            .filter(|&(_, score)| score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(k, _)| k)
    }

    /// Check data integrity. Returns every problem found.
    pub fn validate(&self) -> Vec<KnowledgeError> {
        let mut problems = Vec::new();

        let mut seen = HashSet::new();
        for f in self.data.findings.iter().chain(&self.data.ila_findings) {
            if !seen.insert(f.key.as_str()) {
                problems.push(KnowledgeError::DuplicateFinding(f.key.clone()));
            }
        }

        let mut seen = HashSet::new();
        for p in &self.data.patterns {
            if !seen.insert(p.key.as_str()) {
                problems.push(KnowledgeError::DuplicatePattern(p.key.clone()));
            }
            self.validate_pattern(p, &mut problems);
        }

        for imp in &self.data.implications {
            let owner = format!("implication '{}'", imp.composite);
            self.check_finding(&owner, &imp.composite, &mut problems);
            for component in &imp.components {
                self.check_finding(&owner, component, &mut problems);
                if self.implication_index.contains_key(component) {
                    problems.push(KnowledgeError::ChainedImplication {
                        composite: imp.composite.clone(),
                        component: component.clone(),
                    });
                }
            }
        }

        for rule in &self.data.cooccurrence_rules {
            if rule.trigger_findings.is_empty() {
                problems.push(KnowledgeError::EmptyTrigger(rule.name.clone()));
            }
            let owner = format!("co-occurrence rule '{}'", rule.name);
            for key in &rule.trigger_findings {
                self.check_finding(&owner, key, &mut problems);
            }
            for m in &rule.pattern_modifiers {
                if !self.pattern_index.contains_key(&m.pattern) {
                    problems.push(KnowledgeError::UnknownPattern {
                        rule: rule.name.clone(),
                        pattern: m.pattern.clone(),
                    });
                }
            }
        }

        for (legacy, current) in &self.data.legacy_pattern_keys {
            if !self.pattern_index.contains_key(current) {
                problems.push(KnowledgeError::UnknownPattern {
                    rule: format!("legacy key '{}'", legacy),
                    pattern: current.clone(),
                });
            }
        }

        problems
    }

    fn validate_pattern(&self, p: &PatternDefinition, problems: &mut Vec<KnowledgeError>) {
        if !(0.0..=100.0).contains(&p.base_score) {
            problems.push(KnowledgeError::BaseScoreOutOfRange {
                pattern: p.key.clone(),
                score: p.base_score,
            });
        }

        let owner = format!("pattern '{}'", p.key);
        for key in p.referenced_findings() {
            self.check_finding(&owner, key, problems);
        }

        if p.alternative_required_sets.iter().any(Vec::is_empty) {
            problems.push(KnowledgeError::EmptyAlternativeSet(p.key.clone()));
        }

        for key in &p.distribution {
            if let Some(f) = self.finding(key) {
                if !f.is_distribution() {
                    problems.push(KnowledgeError::NotDistribution {
                        pattern: p.key.clone(),
                        key: key.clone(),
                    });
                }
            }
        }

        let mut conditions = HashSet::new();
        for m in &p.clinical_modifiers {
            if !conditions.insert(m.condition) {
                problems.push(KnowledgeError::DuplicateCondition {
                    pattern: p.key.clone(),
                    condition: format!("{:?}", m.condition),
                });
            }
        }
    }

    fn check_finding(&self, owner: &str, key: &str, problems: &mut Vec<KnowledgeError>) {
        if self.finding(key).is_none() {
            problems.push(KnowledgeError::UnknownFinding {
                owner: owner.to_string(),
                key: key.to_string(),
                suggestion: self.suggest_finding(key).map(str::to_string),
            });
        }
    }
}

fn compute_fingerprint(data: &KnowledgeBaseData) -> String {
    // plain data with string map keys always serializes
    let bytes = serde_json::to_vec(data).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let problems = KnowledgeBase::builtin().validate();
        assert!(
            problems.is_empty(),
            "built-in knowledge base has problems: {:?}",
            problems.iter().map(|p| p.to_string()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_lookup_by_key() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.pattern("uip_definite").unwrap().base_score, 95.0);
        assert_eq!(kb.finding("honeycombing").unwrap().label, "Honeycombing");
        assert!(kb.finding("ila_honeycombing").is_some());
        assert!(kb.finding("not_a_finding").is_none());
    }

    #[test]
    fn test_legacy_keys_resolve() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.resolve_pattern_key("dip"), "amp");
        assert_eq!(kb.resolve_pattern_key("hp_fibrotic"), "bip_fibrotic");
        assert_eq!(kb.resolve_pattern_key("op"), "op");
        assert_eq!(kb.pattern("aip").unwrap().key, "dad");
    }

    #[test]
    fn test_implied_components() {
        let kb = KnowledgeBase::builtin();
        let components = kb.implied_components("head_cheese_sign").unwrap();
        assert_eq!(components.len(), 3);
        assert!(kb.implied_components("honeycombing").is_none());
    }

    #[test]
    fn test_json_roundtrip_preserves_fingerprint() {
        let kb = KnowledgeBase::builtin();
        let json = kb.to_json().unwrap();
        let loaded = KnowledgeBase::from_json(&json).unwrap();
        assert_eq!(loaded.fingerprint(), kb.fingerprint());
        assert_eq!(loaded.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let mut data = KnowledgeBaseData::builtin();
        data.patterns[0].base_score = 90.0;
        let changed = KnowledgeBase::from_data(data);
        assert_ne!(changed.fingerprint(), KnowledgeBase::builtin().fingerprint());
    }

    #[test]
    fn test_unknown_finding_gets_suggestion() {
        let mut data = KnowledgeBaseData::builtin();
        data.patterns[0].supportive_findings.push("honeycombng".into());
        let kb = KnowledgeBase::from_data(data);

        let problems = kb.validate();
        assert_eq!(problems.len(), 1);
        match &problems[0] {
            KnowledgeError::UnknownFinding { key, suggestion, .. } => {
                assert_eq!(key, "honeycombng");
                assert_eq!(suggestion.as_deref(), Some("honeycombing"));
            }
            other => panic!("unexpected problem: {}", other),
        }
        assert!(problems[0].to_string().contains("did you mean 'honeycombing'"));
    }

    #[test]
    fn test_validation_catches_bad_data() {
        let mut data = KnowledgeBaseData::builtin();
        data.patterns[1].base_score = 120.0;
        data.patterns[2].distribution.push("honeycombing".into());
        data.implications.push(FindingImplication {
            composite: "reversed_halo".into(),
            components: vec!["crazy_paving".into()],
        });
        data.cooccurrence_rules[0].pattern_modifiers[0].pattern = "hp".into();
        let kb = KnowledgeBase::from_data(data);

        let problems = kb.validate();
        assert!(problems.iter().any(|p| matches!(p, KnowledgeError::BaseScoreOutOfRange { .. })));
        assert!(problems.iter().any(|p| matches!(p, KnowledgeError::NotDistribution { .. })));
        assert!(problems.iter().any(|p| matches!(p, KnowledgeError::ChainedImplication { .. })));
        assert!(problems.iter().any(|p| matches!(p, KnowledgeError::UnknownPattern { .. })));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let mut data = KnowledgeBaseData::builtin();
        data.findings.push(data.findings[0].clone());
        let json = serde_json::to_string(&data).unwrap();

        let err = KnowledgeBase::from_json(&json).unwrap_err();
        match err {
            KnowledgeError::Invalid(problems) => {
                assert!(matches!(problems[0], KnowledgeError::DuplicateFinding(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            KnowledgeBase::from_json("{ not json"),
            Err(KnowledgeError::Json(_))
        ));
    }

    #[test]
    fn test_findings_in_category() {
        let kb = KnowledgeBase::builtin();
        let dist: Vec<_> = kb.findings_in(FindingCategory::Distribution).collect();
        assert_eq!(dist.len(), 7);
        assert!(dist.iter().all(|f| f.is_distribution()));
    }
}
