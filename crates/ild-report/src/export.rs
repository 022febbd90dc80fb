//! JSON export of a report and the results it was rendered from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ild_core::models::{ClinicalContext, DiagnosticResult, IlaResult};

use crate::report::{ReportGenerator, ReportInput, ReportMeta};
use crate::study::{PatientInfo, StudyDetails};

/// Report export errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportMetadata {
    /// Report ID, matching the text footer
    pub report_id: String,
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// Knowledge base version
    pub knowledge_base_version: String,
    /// Knowledge base SHA-256 fingerprint
    pub knowledge_base_fingerprint: String,
}

/// A rendered report bundled with its inputs and results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportExport {
    pub metadata: ExportMetadata,
    pub patient: PatientInfo,
    pub context: ClinicalContext,
    pub study: StudyDetails,
    pub selected_findings: Vec<String>,
    pub diagnostic: Option<DiagnosticResult>,
    pub ila: Option<IlaResult>,
    /// The plain-text report
    pub report_text: String,
}

impl ReportExport {
    /// Render the report and capture everything it was built from.
    pub fn build(generator: &ReportGenerator<'_>, input: &ReportInput<'_>, meta: &ReportMeta) -> Self {
        let (version, fingerprint) = generator.provenance(input);
        Self {
            metadata: ExportMetadata {
                report_id: meta.report_id.to_string(),
                generated_at: meta.generated_at.to_rfc3339(),
                knowledge_base_version: version.to_string(),
                knowledge_base_fingerprint: fingerprint.to_string(),
            },
            patient: input.patient.clone(),
            context: input.context.clone(),
            study: input.study.clone(),
            selected_findings: input.selected_findings.iter().cloned().collect(),
            diagnostic: input.diagnostic.cloned(),
            ila: input.ila.cloned(),
            report_text: generator.generate_with(input, meta),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an exported report.
    pub fn from_json(json: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
