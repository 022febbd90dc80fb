//! Composite finding expansion.

use crate::models::{FindingImplication, FindingSet};

/// Union in the components of every composite finding present.
///
/// Single pass. Idempotent as long as no component is itself composite,
/// which knowledge-base validation enforces.
pub fn expand(selected: &FindingSet, implications: &[FindingImplication]) -> FindingSet {
    let mut expanded = selected.clone();
    for imp in implications {
        if selected.contains(&imp.composite) {
            expanded.extend(imp.components.iter().cloned());
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finding_set;

    fn implications() -> Vec<FindingImplication> {
        vec![FindingImplication {
            composite: "head_cheese_sign".into(),
            components: vec![
                "centrilobular_nodules".into(),
                "mosaic_attenuation".into(),
                "air_trapping".into(),
            ],
        }]
    }

    #[test]
    fn test_expand_adds_components() {
        let out = expand(&finding_set(["head_cheese_sign"]), &implications());
        assert_eq!(out.len(), 4);
        assert!(out.contains("head_cheese_sign"));
        assert!(out.contains("air_trapping"));
    }

    #[test]
    fn test_expand_without_composites_is_identity() {
        let input = finding_set(["reticulation", "unknown_key"]);
        assert_eq!(expand(&input, &implications()), input);
    }

    #[test]
    fn test_expand_empty() {
        assert!(expand(&FindingSet::new(), &implications()).is_empty());
    }

    #[test]
    fn test_expand_is_idempotent() {
        let once = expand(&finding_set(["head_cheese_sign", "cysts"]), &implications());
        assert_eq!(expand(&once, &implications()), once);
    }
}
