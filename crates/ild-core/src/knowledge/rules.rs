//! Built-in finding implications, co-occurrence rules and legacy pattern keys.

use std::collections::BTreeMap;

use crate::models::{CooccurrenceRule, FindingImplication, PatternModifier};

fn implication(composite: &str, components: &[&str]) -> FindingImplication {
    FindingImplication {
        composite: composite.into(),
        components: components.iter().map(|s| s.to_string()).collect(),
    }
}

fn rule(
    name: &str,
    description: &str,
    trigger: &[&str],
    mods: &[(&str, f64)],
) -> CooccurrenceRule {
    CooccurrenceRule {
        name: name.into(),
        description: description.into(),
        trigger_findings: trigger.iter().map(|s| s.to_string()).collect(),
        pattern_modifiers: mods
            .iter()
            .map(|&(pattern, delta)| PatternModifier {
                pattern: pattern.into(),
                delta,
            })
            .collect(),
    }
}

/// Composite findings and the components they entail.
pub(crate) fn default_implications() -> Vec<FindingImplication> {
    vec![
        // GGO + normal lung + lobular air trapping
        implication(
            "head_cheese_sign",
            &["centrilobular_nodules", "mosaic_attenuation", "air_trapping"],
        ),
        implication("crazy_paving", &["ground_glass", "septal_thickening"]),
    ]
}

/// Co-occurrence rules, applied in declaration order.
pub(crate) fn default_cooccurrence_rules() -> Vec<CooccurrenceRule> {
    vec![
        rule(
            "infective_centrilobular_pattern",
            "Centrilobular nodules with tree-in-bud point to infection or aspiration rather than BIP.",
            &["centrilobular_nodules", "tree_in_bud"],
            &[("bip_nonfibrotic", -20.0), ("bip_fibrotic", -20.0)],
        ),
        rule(
            "three_density_fibrosis",
            "Mosaic attenuation and air trapping with fibrosis favour fibrotic BIP over UIP.",
            &["mosaic_attenuation", "air_trapping", "traction_bronchiectasis"],
            &[
                ("bip_fibrotic", 10.0),
                ("uip_probable", -10.0),
                ("uip_indeterminate", -5.0),
            ],
        ),
        rule(
            "smoking_related_cystic_nodules",
            "Upper-lobe cysts with centrilobular nodules favour PLCH over LIP.",
            &["cysts", "centrilobular_nodules", "upper_predominant"],
            &[("plch", 10.0), ("lip", -10.0)],
        ),
        rule(
            "systemic_sclerosis_signature",
            "Oesophageal dilatation with ground glass suggests SSc-associated NSIP.",
            &["esophageal_dilatation", "ground_glass"],
            &[("nsip_fibrotic", 5.0), ("nsip_nonfibrotic", 5.0)],
        ),
        rule(
            "perilymphatic_sarcoid",
            "Lymphadenopathy with peribronchovascular disease favours sarcoidosis.",
            &["lymphadenopathy", "peribronchovascular"],
            &[("sarcoidosis", 10.0)],
        ),
        rule(
            "diffuse_crazy_paving",
            "Diffuse crazy paving favours acute alveolar damage.",
            &["crazy_paving", "diffuse"],
            &[("dad", 10.0), ("nsip_nonfibrotic", -5.0)],
        ),
        rule(
            "organizing_consolidation",
            "Consolidation with a reversed halo favours organizing pneumonia.",
            &["consolidation", "reversed_halo"],
            &[("op", 5.0)],
        ),
    ]
}

/// Pre-2025 pattern keys and their current equivalents.
pub(crate) fn default_legacy_keys() -> BTreeMap<String, String> {
    [
        ("dip", "amp"),
        ("hp_nonfibrotic", "bip_nonfibrotic"),
        ("hp_fibrotic", "bip_fibrotic"),
        ("aip", "dad"),
        ("nsip", "nsip_fibrotic"),
    ]
    .iter()
    .map(|&(old, new)| (old.to_string(), new.to_string()))
    .collect()
}
