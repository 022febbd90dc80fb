//! Clinical context collected alongside the CT findings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An option value that is not part of the intake vocabulary.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown {field} option: {value}")]
pub struct UnknownOption {
    pub field: &'static str,
    pub value: String,
}

/// Declares a closed option enum with snake_case keys and display labels.
macro_rules! intake_options {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $key:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Stable vocabulary key.
            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Every option in form order.
            pub fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                $name::all()
                    .iter()
                    .copied()
                    .find(|o| o.key() == lower)
                    .ok_or_else(|| UnknownOption {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

intake_options! {
    /// Patient sex.
    Sex, "sex" {
        Male => "male", "Male";
        Female => "female", "Female";
    }
}

intake_options! {
    /// Smoking history.
    SmokingStatus, "smoking" {
        Never => "never", "Never smoked";
        Current => "current", "Current smoker";
        Former => "former", "Former smoker";
    }
}

intake_options! {
    /// Connective tissue disease.
    ConnectiveTissueDisease, "ctd" {
        None => "none", "None";
        RheumatoidArthritis => "rheumatoid_arthritis", "Rheumatoid arthritis (RA)";
        SystemicSclerosis => "systemic_sclerosis", "Systemic sclerosis (SSc)";
        Sjogren => "sjogren", "Sjogren syndrome";
        Myositis => "myositis", "Polymyositis / dermatomyositis";
        Lupus => "lupus", "Systemic lupus erythematosus (SLE)";
        MixedCtd => "mixed_ctd", "Mixed connective tissue disease (MCTD)";
        AncaVasculitis => "anca_vasculitis", "ANCA-associated vasculitis";
        AnkylosingSpondylitis => "ankylosing_spondylitis", "Ankylosing spondylitis";
        Undifferentiated => "undifferentiated", "Undifferentiated CTD (UCTD / IPAF)";
        Other => "other", "Other";
    }
}

intake_options! {
    /// Environmental or occupational exposure.
    Exposure, "exposure" {
        None => "none", "None";
        Asbestos => "asbestos", "Asbestos";
        Silica => "silica", "Silica";
        AvianAntigen => "avian_antigen", "Avian antigen (pigeons, budgerigars, etc.)";
        Mould => "mould", "Mould / damp";
        MetalDust => "metal_dust", "Metal dust";
        GrainDust => "grain_dust", "Grain / hay dust";
        Drug => "drug", "Drug-related (amiodarone, methotrexate, nitrofurantoin, etc.)";
        Radiotherapy => "radiotherapy", "Radiotherapy";
        Other => "other", "Other";
    }
}

impl SmokingStatus {
    pub fn has_history(&self) -> bool {
        !matches!(self, SmokingStatus::Never)
    }
}

impl ConnectiveTissueDisease {
    pub fn is_present(&self) -> bool {
        !matches!(self, ConnectiveTissueDisease::None)
    }
}

impl Exposure {
    pub fn is_present(&self) -> bool {
        !matches!(self, Exposure::None)
    }
}

/// Clinical context for one case.
///
/// `pack_years` and `indication` are informational and never feed scoring.
/// Fields are not range-checked; intake validation belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalContext {
    pub age: i32,
    pub sex: Sex,
    pub smoking: SmokingStatus,
    #[serde(default)]
    pub pack_years: u32,
    pub ctd: ConnectiveTissueDisease,
    pub exposure: Exposure,
    /// Free text, e.g. "Subacute (1-3 months)"
    pub presentation: String,
    #[serde(default)]
    pub indication: String,
}

impl Default for ClinicalContext {
    fn default() -> Self {
        Self {
            age: 55,
            sex: Sex::Male,
            smoking: SmokingStatus::Never,
            pack_years: 0,
            ctd: ConnectiveTissueDisease::None,
            exposure: Exposure::None,
            presentation: "Chronic (>3 months)".into(),
            indication: String::new(),
        }
    }
}

impl ClinicalContext {
    pub fn is_subacute(&self) -> bool {
        self.presentation.to_lowercase().contains("subacute")
    }

    /// True when "acute" appears outside the word "subacute".
    pub fn is_acute(&self) -> bool {
        self.presentation
            .to_lowercase()
            .replace("subacute", "")
            .contains("acute")
    }
}

/// A named clinical condition a pattern can be modified by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalCondition {
    AgeOver60,
    AgeUnder50,
    Male,
    Female,
    SmokingHistory,
    CtdPresent,
    ExposurePresent,
    SubacutePresentation,
    AcutePresentation,
}

impl ClinicalCondition {
    /// Evaluate this condition against a case.
    pub fn applies(&self, ctx: &ClinicalContext) -> bool {
        match self {
            ClinicalCondition::AgeOver60 => ctx.age > 60,
            ClinicalCondition::AgeUnder50 => ctx.age < 50,
            ClinicalCondition::Male => ctx.sex == Sex::Male,
            ClinicalCondition::Female => ctx.sex == Sex::Female,
            ClinicalCondition::SmokingHistory => ctx.smoking.has_history(),
            ClinicalCondition::CtdPresent => ctx.ctd.is_present(),
            ClinicalCondition::ExposurePresent => ctx.exposure.is_present(),
            ClinicalCondition::SubacutePresentation => ctx.is_subacute(),
            ClinicalCondition::AcutePresentation => ctx.is_acute(),
        }
    }
}
