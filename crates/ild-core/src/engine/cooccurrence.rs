//! Cross-pattern adjustment for findings that mean more together.

use tracing::debug;

use super::scorer::clamp_score;
use crate::models::{CooccurrenceRule, FindingSet, PatternResult};

/// Apply every rule whose trigger findings are all present, in declaration order.
///
/// Each delta is added to the final score (re-clamped) and recorded in
/// `clinical_modifier_score`. Untriggered patterns stay at zero.
pub fn apply_cooccurrence(
    results: &mut [PatternResult],
    findings: &FindingSet,
    rules: &[CooccurrenceRule],
) {
    for rule in rules {
        if !rule.trigger_findings.iter().all(|f| findings.contains(f)) {
            continue;
        }
        debug!(rule = %rule.name, "co-occurrence rule applies");

        for modifier in &rule.pattern_modifiers {
            let Some(result) = results
                .iter_mut()
                .find(|r| r.pattern_key == modifier.pattern && r.is_triggered())
            else {
                continue;
            };
            result.final_score = clamp_score(result.final_score + modifier.delta);
            result.clinical_modifier_score += modifier.delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{finding_set, PatternModifier};

    fn triggered(key: &str, score: f64) -> PatternResult {
        let mut r = PatternResult::untriggered(key, key, score, &[]);
        r.final_score = score;
        r.matched_required = vec!["trigger".into()];
        r
    }

    fn rule(trigger: &[&str], mods: &[(&str, f64)]) -> CooccurrenceRule {
        CooccurrenceRule {
            name: "rule".into(),
            description: String::new(),
            trigger_findings: trigger.iter().map(|s| s.to_string()).collect(),
            pattern_modifiers: mods
                .iter()
                .map(|&(p, d)| PatternModifier { pattern: p.into(), delta: d })
                .collect(),
        }
    }

    #[test]
    fn test_rule_applies_when_all_present() {
        let mut results = vec![triggered("a", 70.0), triggered("b", 50.0)];
        let rules = vec![rule(&["x", "y"], &[("a", -20.0)])];

        apply_cooccurrence(&mut results, &finding_set(["x"]), &rules);
        assert_eq!(results[0].final_score, 70.0);

        apply_cooccurrence(&mut results, &finding_set(["x", "y"]), &rules);
        assert_eq!(results[0].final_score, 50.0);
        assert_eq!(results[0].clinical_modifier_score, -20.0);
        assert_eq!(results[1].final_score, 50.0);
    }

    #[test]
    fn test_rules_stack_and_reclamp() {
        let mut results = vec![triggered("a", 95.0)];
        let rules = vec![
            rule(&["x"], &[("a", 10.0)]),
            rule(&["x"], &[("a", -10.0)]),
        ];
        apply_cooccurrence(&mut results, &finding_set(["x"]), &rules);
        // 95 + 10 clamps to 100, then -10
        assert_eq!(results[0].final_score, 90.0);
        assert_eq!(results[0].clinical_modifier_score, 0.0);
    }

    #[test]
    fn test_untriggered_pattern_not_lifted() {
        let mut results = vec![PatternResult::untriggered("a", "a", 60.0, &[])];
        let rules = vec![rule(&["x"], &[("a", 10.0)])];
        apply_cooccurrence(&mut results, &finding_set(["x"]), &rules);
        assert_eq!(results[0].final_score, 0.0);
    }

    #[test]
    fn test_unknown_pattern_ignored() {
        let mut results = vec![triggered("a", 60.0)];
        let rules = vec![rule(&["x"], &[("missing", 10.0)])];
        apply_cooccurrence(&mut results, &finding_set(["x"]), &rules);
        assert_eq!(results[0].final_score, 60.0);
    }
}
