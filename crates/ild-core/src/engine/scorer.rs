//! Per-pattern scoring.
//!
//! Scoring is a pure function of a pattern definition, the expanded finding
//! set and the clinical context.

use tracing::trace;

use crate::models::{ClinicalContext, FindingSet, PatternDefinition, PatternResult};

/// Discount for patterns triggered by an alternative required set.
pub const INFERENCE_FACTOR: f64 = 0.90;
/// Bonus per supportive finding.
pub const SUPPORTIVE_BONUS: f64 = 3.0;
pub const SUPPORTIVE_CAP: f64 = 15.0;
/// Flat bonus when any typical distribution is present.
pub const DISTRIBUTION_BONUS: f64 = 5.0;
/// Penalty per against-finding.
pub const AGAINST_PENALTY: f64 = 8.0;

/// Clamp a score into [0, 100].
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// How a pattern's trigger was satisfied.
struct Trigger {
    matched: Vec<String>,
    used_alternative: bool,
}

/// Required findings first, then the longest fully-present alternative set.
/// Equal-length alternatives resolve to the first declared.
fn resolve_trigger(pattern: &PatternDefinition, findings: &FindingSet) -> Option<Trigger> {
    let matched: Vec<String> = pattern
        .required_findings
        .iter()
        .filter(|f| findings.contains(*f))
        .cloned()
        .collect();
    if !matched.is_empty() {
        return Some(Trigger {
            matched,
            used_alternative: false,
        });
    }

    let mut best: Option<&Vec<String>> = None;
    for set in &pattern.alternative_required_sets {
        if set.is_empty() || !set.iter().all(|f| findings.contains(f)) {
            continue;
        }
        if best.map_or(true, |b| set.len() > b.len()) {
            best = Some(set);
        }
    }

    best.map(|set| Trigger {
        matched: set.clone(),
        used_alternative: true,
    })
}

/// Score one pattern against an expanded finding set.
pub fn score_pattern(
    pattern: &PatternDefinition,
    findings: &FindingSet,
    ctx: &ClinicalContext,
) -> PatternResult {
    let Some(trigger) = resolve_trigger(pattern, findings) else {
        return PatternResult::untriggered(
            &pattern.key,
            &pattern.name,
            pattern.base_score,
            &pattern.associated_diagnoses,
        );
    };

    let (ratio, factor) = if trigger.used_alternative {
        let n = trigger.matched.len() as f64;
        (n / n.max(1.0), INFERENCE_FACTOR)
    } else {
        let n = trigger.matched.len() as f64;
        (n / pattern.required_findings.len().max(1) as f64, 1.0)
    };
    let trigger_score = pattern.base_score * (0.6 + 0.4 * ratio) * factor;

    // alternative-set members are not counted twice
    let matched_supportive: Vec<String> = pattern
        .supportive_findings
        .iter()
        .filter(|f| findings.contains(*f))
        .filter(|f| !(trigger.used_alternative && trigger.matched.contains(*f)))
        .cloned()
        .collect();
    let supportive_score = (matched_supportive.len() as f64 * SUPPORTIVE_BONUS).min(SUPPORTIVE_CAP);

    let distribution_score = if pattern.distribution.iter().any(|f| findings.contains(f)) {
        DISTRIBUTION_BONUS
    } else {
        0.0
    };

    let matched_against: Vec<String> = pattern
        .against_findings
        .iter()
        .filter(|f| findings.contains(*f))
        .cloned()
        .collect();
    let penalty_score = matched_against.len() as f64 * AGAINST_PENALTY;

    let finding_score = trigger_score + supportive_score + distribution_score - penalty_score;
    let clinical_modifier_score = pattern.clinical_modifier_total(ctx);
    let final_score = clamp_score(finding_score + clinical_modifier_score);

    trace!(
        pattern = %pattern.key,
        trigger_score,
        supportive_score,
        distribution_score,
        penalty_score,
        clinical_modifier_score,
        final_score,
        used_alternative = trigger.used_alternative,
        "scored pattern"
    );

    PatternResult {
        pattern_key: pattern.key.clone(),
        pattern_name: pattern.name.clone(),
        base_score: pattern.base_score,
        trigger_score,
        supportive_score,
        distribution_score,
        penalty_score,
        finding_score,
        clinical_modifier_score,
        final_score,
        used_alternative: trigger.used_alternative,
        matched_required: trigger.matched,
        matched_supportive,
        matched_against,
        associated_diagnoses: pattern.associated_diagnoses.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{finding_set, ClinicalCondition, ClinicalModifier};

    fn pattern() -> PatternDefinition {
        let mut p = PatternDefinition::new("test", "Test pattern", "TEST", 60.0);
        p.required_findings = vec!["a".into(), "b".into()];
        p.alternative_required_sets = vec![
            vec!["x".into(), "y".into()],
            vec!["x".into(), "z".into()],
            vec!["x".into(), "y".into(), "z".into()],
        ];
        p.supportive_findings = ["s1", "s2", "s3", "s4", "s5", "s6", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        p.against_findings = vec!["no1".into(), "no2".into()];
        p.distribution = vec!["d1".into(), "d2".into()];
        p.clinical_modifiers = vec![ClinicalModifier {
            condition: ClinicalCondition::AgeOver60,
            delta: 10.0,
        }];
        p
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_partial_required_ratio() {
        let r = score_pattern(&pattern(), &finding_set(["a"]), &ClinicalContext::default());
        // 60 * (0.6 + 0.4 * 0.5)
        assert!(approx(r.trigger_score, 48.0));
        assert!(approx(r.final_score, 48.0));
        assert!(!r.used_alternative);
        assert_eq!(r.matched_required, vec!["a".to_string()]);
    }

    #[test]
    fn test_full_required() {
        let r = score_pattern(&pattern(), &finding_set(["a", "b"]), &ClinicalContext::default());
        assert!(approx(r.final_score, 60.0));
    }

    #[test]
    fn test_untriggered_is_zero() {
        let r = score_pattern(
            &pattern(),
            &finding_set(["x", "s1", "s2", "d1"]),
            &ClinicalContext { age: 70, ..Default::default() },
        );
        assert_eq!(r.final_score, 0.0);
        assert!(r.matched_required.is_empty());
        assert!(r.matched_supportive.is_empty());
        assert!(r.matched_against.is_empty());
    }

    #[test]
    fn test_longest_alternative_wins() {
        let r = score_pattern(&pattern(), &finding_set(["x", "y", "z"]), &ClinicalContext::default());
        assert!(r.used_alternative);
        assert_eq!(r.matched_required, vec!["x", "y", "z"]);
        // 60 * 1.0 * 0.9
        assert!(approx(r.trigger_score, 54.0));
    }

    #[test]
    fn test_alternative_tie_takes_first_declared() {
        let mut p = pattern();
        p.alternative_required_sets.pop();
        let r = score_pattern(&p, &finding_set(["x", "y", "z"]), &ClinicalContext::default());
        assert_eq!(r.matched_required, vec!["x", "y"]);
    }

    #[test]
    fn test_alternative_members_not_counted_as_supportive() {
        let r = score_pattern(&pattern(), &finding_set(["x", "y", "s1"]), &ClinicalContext::default());
        assert_eq!(r.matched_supportive, vec!["s1".to_string()]);
        assert!(approx(r.supportive_score, 3.0));
    }

    #[test]
    fn test_supportive_cap() {
        let r = score_pattern(
            &pattern(),
            &finding_set(["a", "b", "s1", "s2", "s3", "s4", "s5", "s6"]),
            &ClinicalContext::default(),
        );
        assert_eq!(r.matched_supportive.len(), 6);
        assert!(approx(r.supportive_score, 15.0));
        assert!(approx(r.final_score, 75.0));
    }

    #[test]
    fn test_distribution_is_flat() {
        let one = score_pattern(&pattern(), &finding_set(["a", "b", "d1"]), &ClinicalContext::default());
        let two = score_pattern(&pattern(), &finding_set(["a", "b", "d1", "d2"]), &ClinicalContext::default());
        assert!(approx(one.distribution_score, 5.0));
        assert!(approx(two.distribution_score, 5.0));
    }

    #[test]
    fn test_against_penalty_and_floor() {
        let r = score_pattern(&pattern(), &finding_set(["a", "no1", "no2"]), &ClinicalContext::default());
        assert!(approx(r.penalty_score, 16.0));
        assert!(approx(r.finding_score, 32.0));

        let mut p = pattern();
        p.base_score = 5.0;
        let r = score_pattern(&p, &finding_set(["a", "no1", "no2"]), &ClinicalContext::default());
        assert!(r.finding_score < 0.0);
        assert_eq!(r.final_score, 0.0);
    }

    #[test]
    fn test_clinical_modifier_and_ceiling() {
        let mut p = pattern();
        p.base_score = 95.0;
        let r = score_pattern(
            &p,
            &finding_set(["a", "b", "d1"]),
            &ClinicalContext { age: 61, ..Default::default() },
        );
        assert!(approx(r.clinical_modifier_score, 10.0));
        assert_eq!(r.final_score, 100.0);
    }
}
