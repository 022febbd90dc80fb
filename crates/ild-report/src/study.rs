//! Patient and study details that appear on the report but never feed scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient identification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientInfo {
    /// Patient name (optional, omitted from the report when empty)
    pub name: Option<String>,
    /// Medical record number
    pub record_number: Option<String>,
}

/// Total lung involvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseExtent {
    UnderFive,
    FiveToFifteen,
    FifteenToTwentyFive,
    TwentyFiveToFifty,
    OverFifty,
}

impl DiseaseExtent {
    pub fn label(&self) -> &'static str {
        match self {
            DiseaseExtent::UnderFive => "<5%",
            DiseaseExtent::FiveToFifteen => "5-15%",
            DiseaseExtent::FifteenToTwentyFive => "15-25%",
            DiseaseExtent::TwentyFiveToFifty => "25-50%",
            DiseaseExtent::OverFifty => ">50%",
        }
    }

    /// Band containing a percentage. Boundaries belong to the lower band.
    pub fn from_percent(percent: f64) -> Self {
        if percent < 5.0 {
            DiseaseExtent::UnderFive
        } else if percent <= 15.0 {
            DiseaseExtent::FiveToFifteen
        } else if percent <= 25.0 {
            DiseaseExtent::FifteenToTwentyFive
        } else if percent <= 50.0 {
            DiseaseExtent::TwentyFiveToFifty
        } else {
            DiseaseExtent::OverFifty
        }
    }
}

impl fmt::Display for DiseaseExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Change relative to a prior study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progression {
    Baseline,
    Stable,
    Progressive,
    Regressive,
}

impl Progression {
    pub fn label(&self) -> &'static str {
        match self {
            Progression::Baseline => "Baseline study",
            Progression::Stable => "Stable (compared with prior study)",
            Progression::Progressive => "Progressive (increased extent or new findings)",
            Progression::Regressive => "Regressive (decreased extent)",
        }
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity details for the CT findings section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudyDetails {
    pub extent: Option<DiseaseExtent>,
    pub progression: Option<Progression>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_bands() {
        assert_eq!(DiseaseExtent::from_percent(0.0), DiseaseExtent::UnderFive);
        assert_eq!(DiseaseExtent::from_percent(5.0), DiseaseExtent::FiveToFifteen);
        assert_eq!(DiseaseExtent::from_percent(15.0), DiseaseExtent::FiveToFifteen);
        assert_eq!(DiseaseExtent::from_percent(30.0), DiseaseExtent::TwentyFiveToFifty);
        assert_eq!(DiseaseExtent::from_percent(75.0), DiseaseExtent::OverFifty);
        assert_eq!(DiseaseExtent::OverFifty.to_string(), ">50%");
    }

    #[test]
    fn test_progression_serializes_snake_case() {
        let json = serde_json::to_string(&Progression::Progressive).unwrap();
        assert_eq!(json, "\"progressive\"");
    }
}
