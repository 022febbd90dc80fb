//! Built-in HRCT pattern definitions (2022 ATS/ERS/JRS/ALAT with the 2025
//! ERS/ATS nomenclature update: DIP→AMP, HP→BIP, AIP→DAD, NSIP split).

use crate::models::{
    ClinicalCondition, ClinicalModifier, GuidelineTier, PatternDefinition,
};

use ClinicalCondition::*;

fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn modifiers(items: &[(ClinicalCondition, f64)]) -> Vec<ClinicalModifier> {
    items
        .iter()
        .map(|&(condition, delta)| ClinicalModifier { condition, delta })
        .collect()
}

/// All patterns in declaration order. Ranking ties keep this order.
pub(crate) fn default_patterns() -> Vec<PatternDefinition> {
    vec![
        uip_definite(),
        uip_probable(),
        uip_indeterminate(),
        nsip_fibrotic(),
        nsip_nonfibrotic(),
        organizing_pneumonia(),
        bip_nonfibrotic(),
        bip_fibrotic(),
        sarcoidosis(),
        lip(),
        amp(),
        plch(),
        ppfe(),
        dad(),
    ]
}

fn uip_definite() -> PatternDefinition {
    let mut p = PatternDefinition::new("uip_definite", "Definite UIP", "UIP", 95.0);
    p.guideline_tier = Some(GuidelineTier::Definite);
    p.required_findings = keys(&["honeycombing"]);
    p.supportive_findings = keys(&[
        "traction_bronchiectasis",
        "traction_bronchiolectasis",
        "reticulation",
        "basal_predominant",
        "peripheral_predominant",
        "architectural_distortion",
        "volume_loss",
        "irregular_interfaces",
    ]);
    p.against_findings = keys(&[
        "upper_predominant",
        "peribronchovascular",
        "consolidation",
        "ground_glass",
        "centrilobular_nodules",
        "cysts",
        "mosaic_attenuation",
        "subpleural_sparing",
    ]);
    p.distribution = keys(&["basal_predominant", "peripheral_predominant"]);
    p.clinical_modifiers = modifiers(&[
        (AgeOver60, 3.0),
        (SmokingHistory, 2.0),
        // CTD lowers the likelihood of IPF
        (CtdPresent, -10.0),
        // exposure points towards fibrotic BIP
        (ExposurePresent, -5.0),
    ]);
    p.associated_diagnoses = keys(&[
        "Idiopathic pulmonary fibrosis (IPF)",
        "CTD-UIP (RA-UIP, SSc-UIP, etc.)",
        "Fibrotic BIP (chronic hypersensitivity pneumonitis)",
        "Familial pulmonary fibrosis",
        "Asbestos-related pulmonary fibrosis",
    ]);
    p
}

fn uip_probable() -> PatternDefinition {
    let mut p = PatternDefinition::new("uip_probable", "Probable UIP", "UIP", 75.0);
    p.guideline_tier = Some(GuidelineTier::Probable);
    p.required_findings = keys(&["traction_bronchiectasis", "reticulation"]);
    p.alternative_required_sets = vec![keys(&[
        "traction_bronchiolectasis",
        "basal_predominant",
        "peripheral_predominant",
    ])];
    p.supportive_findings = keys(&[
        "traction_bronchiolectasis",
        "basal_predominant",
        "peripheral_predominant",
        "architectural_distortion",
        "volume_loss",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "upper_predominant",
        "peribronchovascular",
        "consolidation",
        "centrilobular_nodules",
        "subpleural_sparing",
    ]);
    p.distribution = keys(&["basal_predominant", "peripheral_predominant"]);
    p.clinical_modifiers = modifiers(&[(AgeOver60, 3.0), (SmokingHistory, 2.0)]);
    p.associated_diagnoses = keys(&[
        "Idiopathic pulmonary fibrosis (IPF)",
        "CTD-UIP",
        "Fibrotic BIP",
    ]);
    p
}

fn uip_indeterminate() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "uip_indeterminate",
        "Indeterminate for UIP",
        "UIP",
        45.0,
    );
    p.required_findings = keys(&["reticulation"]);
    p.supportive_findings = keys(&["ground_glass", "traction_bronchiectasis", "basal_predominant"]);
    p.against_findings = keys(&["honeycombing", "centrilobular_nodules", "consolidation"]);
    p.distribution = keys(&["basal_predominant", "peripheral_predominant"]);
    p.clinical_modifiers = modifiers(&[(AgeOver60, 3.0)]);
    p.associated_diagnoses = keys(&[
        "Idiopathic pulmonary fibrosis (IPF)",
        "Fibrotic NSIP",
        "Early UIP",
    ]);
    p
}

fn nsip_fibrotic() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "nsip_fibrotic",
        "Fibrotic NSIP",
        "NSIP",
        65.0,
    );
    p.required_findings = keys(&["reticulation", "traction_bronchiectasis"]);
    p.alternative_required_sets = vec![
        keys(&["ground_glass", "subpleural_sparing"]),
        keys(&["ground_glass", "peribronchovascular", "volume_loss"]),
    ];
    p.supportive_findings = keys(&[
        "ground_glass",
        "subpleural_sparing",
        "basal_predominant",
        "peribronchovascular",
        "volume_loss",
        "traction_bronchiolectasis",
        "esophageal_dilatation",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "centrilobular_nodules",
        "air_trapping",
        "upper_predominant",
        "cysts",
    ]);
    p.distribution = keys(&["basal_predominant", "peribronchovascular"]);
    p.clinical_modifiers = modifiers(&[(CtdPresent, 15.0), (Female, 5.0), (AgeUnder50, 5.0)]);
    p.associated_diagnoses = keys(&[
        "Idiopathic fibrotic NSIP",
        "CTD-NSIP (SSc, PM/DM, Sjogren)",
        "Drug-related NSIP",
        "Fibrotic BIP",
    ]);
    p
}

fn nsip_nonfibrotic() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "nsip_nonfibrotic",
        "Non-fibrotic (cellular) NSIP",
        "NSIP",
        65.0,
    );
    p.required_findings = keys(&["ground_glass"]);
    p.supportive_findings = keys(&[
        "subpleural_sparing",
        "basal_predominant",
        "peribronchovascular",
        "consolidation",
        "esophageal_dilatation",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "traction_bronchiectasis",
        "reticulation",
        "centrilobular_nodules",
        "air_trapping",
        "upper_predominant",
    ]);
    p.distribution = keys(&["basal_predominant", "peribronchovascular"]);
    p.clinical_modifiers = modifiers(&[(CtdPresent, 15.0), (Female, 5.0), (AgeUnder50, 5.0)]);
    p.associated_diagnoses = keys(&[
        "Idiopathic cellular NSIP",
        "CTD-NSIP (SSc, PM/DM, Sjogren)",
        "Drug-related NSIP",
        "Non-fibrotic BIP",
    ]);
    p
}

fn organizing_pneumonia() -> PatternDefinition {
    let mut p = PatternDefinition::new("op", "Organizing pneumonia (OP)", "OP", 70.0);
    p.required_findings = keys(&["consolidation"]);
    p.alternative_required_sets = vec![
        keys(&["reversed_halo"]),
        keys(&["perilobular_pattern", "ground_glass"]),
    ];
    p.supportive_findings = keys(&[
        "ground_glass",
        "peribronchovascular",
        "perilobular_pattern",
        "reversed_halo",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "traction_bronchiectasis",
        "reticulation",
        "centrilobular_nodules",
    ]);
    p.distribution = keys(&["peribronchovascular", "peripheral_predominant"]);
    p.clinical_modifiers = modifiers(&[(SubacutePresentation, 10.0), (CtdPresent, 5.0)]);
    p.associated_diagnoses = keys(&[
        "Cryptogenic organizing pneumonia (COP)",
        "CTD-associated OP",
        "Drug-related OP",
        "Post-infectious OP",
        "Radiation pneumonitis",
    ]);
    p
}

fn bip_nonfibrotic() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "bip_nonfibrotic",
        "Non-fibrotic BIP (bronchiolocentric interstitial pneumonia)",
        "BIP",
        70.0,
    );
    p.required_findings = keys(&["centrilobular_nodules"]);
    p.alternative_required_sets = vec![
        keys(&["ground_glass", "mosaic_attenuation", "air_trapping"]),
        keys(&["ground_glass", "air_trapping", "upper_predominant"]),
        keys(&["mosaic_attenuation", "air_trapping"]),
    ];
    p.supportive_findings = keys(&[
        "ground_glass",
        "mosaic_attenuation",
        "air_trapping",
        "head_cheese_sign",
        "upper_predominant",
        "diffuse",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "traction_bronchiectasis",
        "peripheral_predominant",
    ]);
    p.distribution = keys(&["upper_predominant", "diffuse"]);
    p.clinical_modifiers = modifiers(&[(ExposurePresent, 20.0), (SubacutePresentation, 5.0)]);
    p.associated_diagnoses = keys(&[
        "Bird fancier's lung",
        "Farmer's lung",
        "Chemical hypersensitivity pneumonitis",
        "Indoor mould exposure",
    ]);
    p
}

fn bip_fibrotic() -> PatternDefinition {
    let mut p = PatternDefinition::new("bip_fibrotic", "Fibrotic BIP", "BIP", 65.0);
    p.required_findings = keys(&["traction_bronchiectasis", "centrilobular_nodules"]);
    p.alternative_required_sets = vec![
        keys(&["reticulation", "mosaic_attenuation", "air_trapping"]),
        keys(&["reticulation", "air_trapping", "upper_predominant"]),
    ];
    p.supportive_findings = keys(&[
        "ground_glass",
        "mosaic_attenuation",
        "air_trapping",
        "reticulation",
        "head_cheese_sign",
        "upper_predominant",
    ]);
    p.against_findings = keys(&["peripheral_predominant"]);
    p.distribution = keys(&["upper_predominant", "diffuse", "random"]);
    p.clinical_modifiers = modifiers(&[(ExposurePresent, 20.0)]);
    p.associated_diagnoses = keys(&[
        "Chronic hypersensitivity pneumonitis (fibrotic phase)",
        "Fibrotic BIP with UIP-like pattern",
    ]);
    p
}

fn sarcoidosis() -> PatternDefinition {
    let mut p = PatternDefinition::new("sarcoidosis", "Sarcoidosis", "Sarcoidosis", 65.0);
    p.required_findings = keys(&["lymphadenopathy"]);
    p.supportive_findings = keys(&[
        "centrilobular_nodules",
        "upper_predominant",
        "peribronchovascular",
        "ground_glass",
        "consolidation",
        "reticulation",
    ]);
    p.against_findings = keys(&["honeycombing", "basal_predominant", "tree_in_bud"]);
    p.distribution = keys(&["upper_predominant", "peribronchovascular"]);
    p.clinical_modifiers = modifiers(&[(AgeUnder50, 5.0)]);
    p.associated_diagnoses = keys(&[
        "Pulmonary sarcoidosis",
        "Fibrotic sarcoidosis (stage IV)",
    ]);
    p
}

fn lip() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "lip",
        "LIP (lymphocytic interstitial pneumonia)",
        "LIP",
        55.0,
    );
    p.required_findings = keys(&["cysts"]);
    p.supportive_findings = keys(&[
        "ground_glass",
        "centrilobular_nodules",
        "septal_thickening",
        "diffuse",
    ]);
    p.against_findings = keys(&["honeycombing", "traction_bronchiectasis"]);
    p.distribution = keys(&["diffuse"]);
    p.clinical_modifiers = modifiers(&[(CtdPresent, 15.0)]);
    p.associated_diagnoses = keys(&[
        "LIP (Sjogren-associated)",
        "LIP (HIV-associated)",
        "Idiopathic LIP",
    ]);
    p
}

fn amp() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "amp",
        "AMP (alveolar macrophage pneumonia, formerly DIP)",
        "AMP",
        50.0,
    );
    p.required_findings = keys(&["ground_glass"]);
    p.supportive_findings = keys(&[
        "basal_predominant",
        "peripheral_predominant",
        "diffuse",
        "cysts",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "consolidation",
        "centrilobular_nodules",
        "upper_predominant",
    ]);
    p.distribution = keys(&["basal_predominant", "diffuse"]);
    p.clinical_modifiers = modifiers(&[(SmokingHistory, 20.0)]);
    p.associated_diagnoses = keys(&[
        "AMP (smoking-related)",
        "RB-ILD (respiratory bronchiolitis-ILD)",
    ]);
    p
}

fn plch() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "plch",
        "PLCH (pulmonary Langerhans cell histiocytosis)",
        "PLCH",
        60.0,
    );
    p.required_findings = keys(&["cysts"]);
    // nodular stage before cavitation
    p.alternative_required_sets = vec![keys(&["centrilobular_nodules", "upper_predominant"])];
    p.supportive_findings = keys(&["centrilobular_nodules", "upper_predominant"]);
    p.against_findings = keys(&[
        "honeycombing",
        "basal_predominant",
        "ground_glass",
        "consolidation",
    ]);
    p.distribution = keys(&["upper_predominant"]);
    p.clinical_modifiers = modifiers(&[(SmokingHistory, 20.0), (AgeUnder50, 5.0)]);
    p.associated_diagnoses = keys(&["Pulmonary Langerhans cell histiocytosis"]);
    p
}

fn ppfe() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "ppfe",
        "PPFE (pleuroparenchymal fibroelastosis)",
        "PPFE",
        70.0,
    );
    p.required_findings = keys(&["pleuroparenchymal_fibroelastosis"]);
    p.alternative_required_sets = vec![keys(&[
        "pleural_thickening",
        "upper_predominant",
        "volume_loss",
    ])];
    p.supportive_findings = keys(&[
        "upper_predominant",
        "pleural_thickening",
        "volume_loss",
        "architectural_distortion",
    ]);
    p.against_findings = keys(&["ground_glass", "consolidation", "centrilobular_nodules"]);
    p.distribution = keys(&["upper_predominant"]);
    p.associated_diagnoses = keys(&[
        "Idiopathic PPFE",
        "Post-transplant PPFE",
        "CTD-associated PPFE",
    ]);
    p
}

fn dad() -> PatternDefinition {
    let mut p = PatternDefinition::new(
        "dad",
        "DAD (diffuse alveolar damage, formerly AIP)",
        "DAD",
        55.0,
    );
    p.required_findings = keys(&["ground_glass", "consolidation"]);
    p.supportive_findings = keys(&[
        "crazy_paving",
        "traction_bronchiectasis",
        "diffuse",
        "septal_thickening",
        "pleural_effusion",
    ]);
    p.against_findings = keys(&[
        "honeycombing",
        "centrilobular_nodules",
        "tree_in_bud",
        "upper_predominant",
    ]);
    p.distribution = keys(&["diffuse"]);
    p.clinical_modifiers = modifiers(&[(AcutePresentation, 25.0), (SubacutePresentation, 5.0)]);
    p.associated_diagnoses = keys(&[
        "Acute interstitial pneumonia (AIP)",
        "Acute exacerbation of fibrotic ILD",
        "ARDS",
        "Drug toxicity",
    ]);
    p
}
