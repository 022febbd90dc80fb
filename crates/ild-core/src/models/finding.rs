//! CT finding taxonomy models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A set of selected finding keys. Order-irrelevant, no duplicates.
pub type FindingSet = BTreeSet<String>;

/// Category a finding is grouped under in the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Distribution,
    Fibrotic,
    NonFibrotic,
    Specific,
}

impl FindingCategory {
    /// Report heading for findings in this category.
    pub fn heading(&self) -> &'static str {
        match self {
            FindingCategory::Distribution => "Distribution",
            FindingCategory::Fibrotic => "Fibrotic findings",
            FindingCategory::NonFibrotic => "Non-fibrotic findings",
            FindingCategory::Specific => "Specific findings",
        }
    }

    /// All categories in checklist order.
    pub fn all() -> [FindingCategory; 4] {
        [
            FindingCategory::Distribution,
            FindingCategory::Fibrotic,
            FindingCategory::NonFibrotic,
            FindingCategory::Specific,
        ]
    }
}

/// An observable CT feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    /// Unique key (e.g., "honeycombing")
    pub key: String,
    /// Display label
    pub label: String,
    /// Short radiological description
    pub description: String,
    /// Checklist category; ILA findings carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FindingCategory>,
}

impl Finding {
    /// Create a categorised ILD finding.
    pub fn new(key: &str, label: &str, description: &str, category: FindingCategory) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            category: Some(category),
        }
    }

    /// Create an uncategorised ILA finding.
    pub fn ila(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            category: None,
        }
    }

    pub fn is_distribution(&self) -> bool {
        self.category == Some(FindingCategory::Distribution)
    }
}

/// Build a finding set from string-like keys.
pub fn finding_set<I, S>(keys: I) -> FindingSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_set_dedupes() {
        let set = finding_set(["reticulation", "honeycombing", "reticulation"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("honeycombing"));
    }

    #[test]
    fn test_ila_finding_has_no_category() {
        let f = Finding::ila("ila_reticulation", "Reticulation", "Fine reticular opacities.");
        assert!(f.category.is_none());
        assert!(!f.is_distribution());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&FindingCategory::NonFibrotic).unwrap();
        assert_eq!(json, "\"non_fibrotic\"");
    }
}
