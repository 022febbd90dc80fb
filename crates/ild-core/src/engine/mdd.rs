//! Multidisciplinary discussion (MDD) recommendation.
//!
//! Rules are checked in strict priority order; the first match decides.
//! Conflicting findings are checked before the definite-pattern shortcut so
//! a high-scoring pattern with contradicting evidence still goes to MDD.

use crate::knowledge::KnowledgeBase;
use crate::models::{MddBasis, PatternDefinition, PatternResult};

/// Score at or above which a definite-tier pattern needs no discussion.
pub const DEFINITE_THRESHOLD: f64 = 90.0;
/// Primary scores below this are not confident enough.
pub const CONFIDENCE_THRESHOLD: f64 = 70.0;
/// Maximum gap between the top two patterns that counts as close.
pub const CLOSE_GAP: f64 = 15.0;
/// Minimum second-ranked score for a close differential.
pub const SECOND_MIN_SCORE: f64 = 20.0;

/// Decide whether the case should go to MDD.
pub fn evaluate_mdd(
    primary: Option<&PatternResult>,
    ranked: &[PatternResult],
    kb: &KnowledgeBase,
) -> MddBasis {
    let Some(primary) = primary else {
        return MddBasis::InsufficientFindings;
    };

    if !primary.matched_against.is_empty() {
        return MddBasis::ConflictingFindings {
            findings: primary.matched_against.clone(),
        };
    }

    let definition = kb.pattern(&primary.pattern_key);

    if definition.is_some_and(PatternDefinition::is_definite)
        && primary.final_score >= DEFINITE_THRESHOLD
    {
        return MddBasis::DefinitePattern {
            pattern_name: primary.pattern_name.clone(),
            score: primary.final_score,
        };
    }

    if let [first, second, ..] = ranked {
        if first.final_score - second.final_score < CLOSE_GAP
            && second.final_score > SECOND_MIN_SCORE
        {
            return MddBasis::CloseDifferential {
                first_name: first.pattern_name.clone(),
                first_score: first.final_score,
                second_name: second.pattern_name.clone(),
                second_score: second.final_score,
            };
        }
    }

    if primary.final_score < CONFIDENCE_THRESHOLD {
        return MddBasis::LowConfidence {
            score: primary.final_score,
        };
    }

    if definition.is_some_and(PatternDefinition::is_probable) {
        return MddBasis::ProbablePattern {
            pattern_name: primary.pattern_name.clone(),
        };
    }

    MddBasis::ConfidentPattern {
        pattern_name: primary.pattern_name.clone(),
        score: primary.final_score,
    }
}
