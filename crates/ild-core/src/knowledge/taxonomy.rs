//! Built-in CT finding taxonomy (2025 ERS/ATS checklist).

use crate::models::{Finding, FindingCategory};

use FindingCategory::{Distribution, Fibrotic, NonFibrotic, Specific};

/// ILD checklist findings in display order.
pub(crate) fn default_findings() -> Vec<Finding> {
    vec![
        // Distribution
        Finding::new(
            "basal_predominant",
            "Basal predominant distribution",
            "Lower-lobe predominant involvement. Typical of the UIP pattern.",
            Distribution,
        ),
        Finding::new(
            "peripheral_predominant",
            "Peripheral (subpleural) predominant",
            "Involvement concentrated in the subpleural lung. Seen in UIP and NSIP.",
            Distribution,
        ),
        Finding::new(
            "upper_predominant",
            "Upper-lobe predominant distribution",
            "Upper-lobe predominant involvement. Typical of BIP, sarcoidosis and PLCH.",
            Distribution,
        ),
        Finding::new(
            "peribronchovascular",
            "Peribronchovascular distribution",
            "Involvement along the bronchovascular bundles. Seen in NSIP and OP.",
            Distribution,
        ),
        Finding::new(
            "diffuse",
            "Diffuse distribution",
            "Homogeneous, widespread involvement. Suggests AMP, PAP or diffuse haemorrhage.",
            Distribution,
        ),
        Finding::new(
            "random",
            "Random distribution",
            "No particular anatomical predilection.",
            Distribution,
        ),
        Finding::new(
            "unilateral",
            "Unilateral or asymmetric",
            "One-sided or markedly asymmetric involvement. An atypical distribution.",
            Distribution,
        ),
        // Fibrotic
        Finding::new(
            "honeycombing",
            "Honeycombing",
            "Clustered subpleural cystic airspaces (3-10 mm). The most specific finding for UIP.",
            Fibrotic,
        ),
        Finding::new(
            "traction_bronchiectasis",
            "Traction bronchiectasis",
            "Bronchial dilatation caused by surrounding fibrosis. Marker of advanced fibrosis.",
            Fibrotic,
        ),
        Finding::new(
            "traction_bronchiolectasis",
            "Traction bronchiolectasis",
            "Fibrosis-related dilatation of the peripheral airways.",
            Fibrotic,
        ),
        Finding::new(
            "reticulation",
            "Reticulation",
            "Net-like pattern of interlobular and intralobular septal thickening.",
            Fibrotic,
        ),
        Finding::new(
            "architectural_distortion",
            "Architectural distortion",
            "Disruption of normal lung architecture. Indicates fibrosis.",
            Fibrotic,
        ),
        Finding::new(
            "volume_loss",
            "Volume loss",
            "Lobar or segmental volume reduction due to fibrosis.",
            Fibrotic,
        ),
        Finding::new(
            "irregular_interfaces",
            "Irregular pleural/mediastinal interfaces",
            "Irregular contour caused by subpleural fibrosis.",
            Fibrotic,
        ),
        // Non-fibrotic
        Finding::new(
            "ground_glass",
            "Ground-glass opacity (GGO)",
            "Increased attenuation that does not obscure underlying vessels. Suggests active inflammation or early fibrosis.",
            NonFibrotic,
        ),
        Finding::new(
            "consolidation",
            "Consolidation",
            "Homogeneous opacification that may contain air bronchograms. Suggests OP or infection.",
            NonFibrotic,
        ),
        Finding::new(
            "centrilobular_nodules",
            "Centrilobular nodules",
            "Small nodules centred in the secondary lobule. Suggests BIP and RB-ILD.",
            NonFibrotic,
        ),
        Finding::new(
            "mosaic_attenuation",
            "Mosaic attenuation",
            "Coexisting regions of differing attenuation. Suggests air trapping or vascular disease.",
            NonFibrotic,
        ),
        Finding::new(
            "air_trapping",
            "Air trapping",
            "Lobular air trapping on expiratory images. Suggests BIP and obliterative bronchiolitis.",
            NonFibrotic,
        ),
        Finding::new(
            "crazy_paving",
            "Crazy paving",
            "Reticulation superimposed on ground glass. Suggests PAP, haemorrhage and infection.",
            NonFibrotic,
        ),
        Finding::new(
            "tree_in_bud",
            "Tree-in-bud",
            "Branching centrilobular linear and nodular opacities. Suggests infection and aspiration.",
            NonFibrotic,
        ),
        Finding::new(
            "septal_thickening",
            "Interlobular septal thickening",
            "Thickened septa between lobules. Suggests lymphangitic spread, oedema and PAP.",
            NonFibrotic,
        ),
        // Specific
        Finding::new(
            "cysts",
            "Cysts",
            "Thin-walled airspaces. Suggests LIP, PLCH and LAM.",
            Specific,
        ),
        Finding::new(
            "lymphadenopathy",
            "Mediastinal/hilar lymphadenopathy",
            "Enlarged lymph nodes. Suggests sarcoidosis, infection and malignancy.",
            Specific,
        ),
        Finding::new(
            "pleural_thickening",
            "Pleural thickening",
            "Visceral or parietal pleural thickening. Suggests asbestos exposure and CTD-ILD.",
            Specific,
        ),
        Finding::new(
            "pleural_effusion",
            "Pleural effusion",
            "Pleural fluid. Suggests CTD-ILD and cardiac disease.",
            Specific,
        ),
        Finding::new(
            "perilobular_pattern",
            "Perilobular pattern",
            "Arcade-like opacities at the periphery of the secondary lobule. Typical of OP.",
            Specific,
        ),
        Finding::new(
            "reversed_halo",
            "Reversed halo (atoll) sign",
            "Ring of consolidation around ground glass. Suggests OP and sarcoidosis.",
            Specific,
        ),
        Finding::new(
            "subpleural_sparing",
            "Subpleural sparing",
            "Relative sparing of the immediate subpleural lung. Characteristic of NSIP.",
            Specific,
        ),
        Finding::new(
            "head_cheese_sign",
            "Head-cheese sign",
            "Ground glass, normal lung and lobular air trapping side by side. Typical of BIP.",
            Specific,
        ),
        Finding::new(
            "pleuroparenchymal_fibroelastosis",
            "Pleuroparenchymal fibroelastosis (PPFE)",
            "Apical pleural and subpleural upper-lobe thickening with volume loss.",
            Specific,
        ),
        Finding::new(
            "esophageal_dilatation",
            "Oesophageal dilatation",
            "Dilated oesophageal lumen. Suggests systemic sclerosis (SSc).",
            Specific,
        ),
    ]
}

/// ILA screening findings.
pub(crate) fn default_ila_findings() -> Vec<Finding> {
    vec![
        Finding::ila(
            "ila_ground_glass",
            "Ground-glass opacity",
            "Non-dependent areas of ground glass.",
        ),
        Finding::ila(
            "ila_reticulation",
            "Reticulation",
            "Fine reticular opacities.",
        ),
        Finding::ila(
            "ila_traction_bronchiectasis",
            "Traction bronchiectasis",
            "Traction bronchiectasis on a background of ILA. Suggests advanced ILA.",
        ),
        Finding::ila(
            "ila_honeycombing",
            "Honeycombing",
            "Honeycombing on a background of ILA. High risk of progression to ILD.",
        ),
        Finding::ila(
            "ila_nonadipose_atelectasis",
            "Non-adipose atelectasis",
            "Subpleural atelectasis unrelated to fat.",
        ),
        Finding::ila(
            "ila_centrilobular_nodules",
            "Centrilobular nodules",
            "Centrilobular nodules within the ILA.",
        ),
    ]
}
