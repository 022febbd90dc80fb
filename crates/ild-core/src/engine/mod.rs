//! HRCT pattern decision engine.
//!
//! Pipeline: Expansion → Scoring → Co-occurrence → Ranking → MDD decision

mod cooccurrence;
mod expansion;
mod mdd;
mod scorer;

pub use cooccurrence::*;
pub use expansion::*;
pub use mdd::*;
pub use scorer::*;

use std::cmp::Ordering;

use tracing::debug;

use crate::knowledge::KnowledgeBase;
use crate::models::{ClinicalContext, DiagnosticResult, FindingSet, MddBasis, PatternResult};

/// Stateless engine over a borrowed knowledge base.
///
/// Holds no mutable state; one engine can serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine<'a> {
    kb: &'a KnowledgeBase,
}

impl DecisionEngine<'static> {
    /// Engine over the built-in knowledge base.
    pub fn builtin() -> Self {
        Self::new(KnowledgeBase::builtin())
    }
}

impl<'a> DecisionEngine<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &'a KnowledgeBase {
        self.kb
    }

    /// Map a pre-2025 pattern key to its current key.
    pub fn resolve_pattern_key<'k>(&self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.kb.resolve_pattern_key(key)
    }

    /// Expand composite findings using this knowledge base's implications.
    pub fn expand(&self, selected: &FindingSet) -> FindingSet {
        expand(selected, self.kb.implications())
    }

    /// Analyze a case.
    ///
    /// Unknown finding keys are ignored. An empty selection is a valid
    /// input and yields a result with no primary pattern.
    pub fn analyze(&self, selected: &FindingSet, ctx: &ClinicalContext) -> DiagnosticResult {
        if selected.is_empty() {
            debug!("no findings selected");
            return self.result(None, Vec::new(), MddBasis::NoFindings, selected);
        }

        // Step 1: Expand composite findings
        let expanded = self.expand(selected);
        debug!(
            selected = selected.len(),
            expanded = expanded.len(),
            "expanded findings"
        );

        // Step 2: Score every pattern
        let mut ranked: Vec<PatternResult> = self
            .kb
            .patterns()
            .iter()
            .map(|p| score_pattern(p, &expanded, ctx))
            .collect();

        // Step 3: Cross-pattern adjustments
        apply_cooccurrence(&mut ranked, &expanded, self.kb.cooccurrence_rules());

        // Step 4: Rank (stable, so ties keep declaration order)
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });

        let primary = ranked.first().filter(|r| r.final_score > 0.0).cloned();

        // Step 5: MDD decision
        let basis = evaluate_mdd(primary.as_ref(), &ranked, self.kb);
        debug!(
            primary = primary.as_ref().map(|p| p.pattern_key.as_str()).unwrap_or("none"),
            score = primary.as_ref().map(|p| p.final_score).unwrap_or(0.0),
            mdd = basis.recommends_mdd(),
            "analysis complete"
        );

        self.result(primary, ranked, basis, selected)
    }

    fn result(
        &self,
        primary: Option<PatternResult>,
        ranked: Vec<PatternResult>,
        basis: MddBasis,
        selected: &FindingSet,
    ) -> DiagnosticResult {
        DiagnosticResult {
            primary_pattern: primary,
            ranked_patterns: ranked,
            mdd_recommended: basis.recommends_mdd(),
            mdd_reason: basis.to_string(),
            mdd_basis: basis,
            selected_findings: selected.iter().cloned().collect(),
            knowledge_base_version: self.kb.version().to_string(),
            knowledge_base_fingerprint: self.kb.fingerprint().to_string(),
        }
    }
}
