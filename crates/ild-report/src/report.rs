//! Plain-text structured report, laid out for pasting into PACS/RIS.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use ild_core::models::{ClinicalContext, DiagnosticResult, FindingCategory, FindingSet, IlaResult};
use ild_core::KnowledgeBase;

use crate::study::{PatientInfo, StudyDetails};

const RULE_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 40;
/// Number of ranked patterns considered for the differential.
pub const DIFFERENTIAL_LIMIT: usize = 3;
/// Patterns at or below this score are left out of the differential.
pub const DIFFERENTIAL_MIN_SCORE: f64 = 10.0;

/// Everything one report is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub patient: &'a PatientInfo,
    pub context: &'a ClinicalContext,
    pub study: &'a StudyDetails,
    pub selected_findings: &'a FindingSet,
    pub diagnostic: Option<&'a DiagnosticResult>,
    pub ila: Option<&'a IlaResult>,
}

/// Identity and timestamp stamped on a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMeta {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

impl ReportMeta {
    /// New report id, stamped now.
    pub fn new() -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
        }
    }
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders structured reports using finding labels from a knowledge base.
pub struct ReportGenerator<'a> {
    kb: &'a KnowledgeBase,
}

impl ReportGenerator<'static> {
    pub fn builtin() -> Self {
        Self::new(KnowledgeBase::builtin())
    }
}

impl<'a> ReportGenerator<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &'a KnowledgeBase {
        self.kb
    }

    /// Version and fingerprint of the knowledge base behind a report.
    ///
    /// The diagnostic carries the rule set that produced it; the generator's
    /// own knowledge base only stands in when there is no diagnostic.
    pub fn provenance<'s>(&'s self, input: &ReportInput<'s>) -> (&'s str, &'s str) {
        match input.diagnostic {
            Some(diag) => (
                diag.knowledge_base_version.as_str(),
                diag.knowledge_base_fingerprint.as_str(),
            ),
            None => (self.kb.version(), self.kb.fingerprint()),
        }
    }

    /// Render a report with a fresh id and timestamp.
    pub fn generate(&self, input: &ReportInput<'_>) -> String {
        self.generate_with(input, &ReportMeta::new())
    }

    /// Render a report with the given id and timestamp.
    pub fn generate_with(&self, input: &ReportInput<'_>, meta: &ReportMeta) -> String {
        let mut out = Vec::new();

        self.header(&mut out);
        self.clinical_info(&mut out, input);
        self.ct_findings(&mut out, input);
        self.assessment(&mut out, input.diagnostic);
        if let Some(ila) = input.ila.filter(|i| i.present) {
            self.ila_assessment(&mut out, ila);
        }
        if let Some(diag) = input.diagnostic {
            self.mdd(&mut out, diag);
        }
        self.conclusion(&mut out, input);
        self.footer(&mut out, input, meta);

        out.join("\n")
    }

    fn header(&self, out: &mut Vec<String>) {
        out.push("=".repeat(RULE_WIDTH));
        out.push("HIGH-RESOLUTION CT - INTERSTITIAL LUNG DISEASE".into());
        out.push("STRUCTURED REPORT".into());
        out.push("=".repeat(RULE_WIDTH));
        out.push(String::new());
    }

    fn clinical_info(&self, out: &mut Vec<String>, input: &ReportInput<'_>) {
        let ctx = input.context;
        section(out, "CLINICAL INFORMATION:");

        if let Some(name) = input.patient.name.as_deref().filter(|n| !n.is_empty()) {
            out.push(format!("  Patient: {}", name));
        }
        if let Some(mrn) = input.patient.record_number.as_deref().filter(|n| !n.is_empty()) {
            out.push(format!("  Record number: {}", mrn));
        }
        out.push(format!("  Age/Sex: {}/{}", ctx.age, ctx.sex));
        out.push(format!("  Indication: {}", ctx.indication));
        out.push(format!("  Presentation: {}", ctx.presentation));

        if ctx.smoking.has_history() && ctx.pack_years > 0 {
            out.push(format!("  Smoking: {} ({} pack-years)", ctx.smoking, ctx.pack_years));
        } else {
            out.push(format!("  Smoking: {}", ctx.smoking));
        }
        if ctx.exposure.is_present() {
            out.push(format!("  Exposure: {}", ctx.exposure));
        }
        if ctx.ctd.is_present() {
            out.push(format!("  CTD: {}", ctx.ctd));
        }
        out.push(String::new());
    }

    fn ct_findings(&self, out: &mut Vec<String>, input: &ReportInput<'_>) {
        section(out, "CT FINDINGS:");

        let mut any = false;
        for category in FindingCategory::all() {
            let labels: Vec<&str> = self
                .kb
                .findings_in(category)
                .filter(|f| input.selected_findings.contains(&f.key))
                .map(|f| f.label.as_str())
                .collect();
            if !labels.is_empty() {
                any = true;
                out.push(format!("  {}: {}", category.heading(), labels.join(", ")));
            }
        }
        if !any {
            out.push("  No findings consistent with interstitial lung disease.".into());
        }

        if let Some(extent) = input.study.extent {
            out.push(format!("  Disease extent (total lung): {}", extent));
        }
        if let Some(progression) = input.study.progression {
            out.push(format!("  Change: {}", progression));
        }
        out.push(String::new());
    }

    fn assessment(&self, out: &mut Vec<String>, diagnostic: Option<&DiagnosticResult>) {
        section(out, "DIAGNOSTIC ASSESSMENT:");

        let Some((diag, primary)) =
            diagnostic.and_then(|d| d.primary_pattern.as_ref().map(|p| (d, p)))
        else {
            out.push("  No specific HRCT pattern identified.".into());
            out.push("  Clinical correlation and further evaluation are recommended.".into());
            out.push(String::new());
            return;
        };

        out.push(format!("  Primary HRCT pattern: {}", primary.pattern_name));
        out.push(format!(
            "  Diagnostic confidence: {:.0}% - {}",
            primary.final_score,
            primary.confidence_level().label()
        ));
        out.push(String::new());

        let differential = diag.differential(DIFFERENTIAL_LIMIT, DIFFERENTIAL_MIN_SCORE);
        if !differential.is_empty() {
            out.push("  Differential diagnosis:".into());
            for (i, p) in differential.iter().enumerate() {
                out.push(format!("    {}. {} ({:.0}%)", i + 1, p.pattern_name, p.final_score));
            }
            out.push(String::new());
        }

        if !primary.associated_diagnoses.is_empty() {
            out.push("  Associated clinical diagnoses:".into());
            for d in &primary.associated_diagnoses {
                out.push(format!("    - {}", d));
            }
            out.push(String::new());
        }
    }

    fn ila_assessment(&self, out: &mut Vec<String>, ila: &IlaResult) {
        section(out, "ILA ASSESSMENT:");
        out.push(format!("  Category: {}", ila.category_label));
        out.push(format!("  Risk level: {}", ila.risk_level));
        out.push(format!("  Extent: {:.0}%", ila.extent_percent));
        out.push(format!(
            "  Fibrotic features: {}",
            if ila.has_fibrotic_features { "Present" } else { "Absent" }
        ));
        out.push(format!("  Follow-up: {}", ila.follow_up));
        out.push(String::new());
    }

    fn mdd(&self, out: &mut Vec<String>, diag: &DiagnosticResult) {
        section(out, "MULTIDISCIPLINARY DISCUSSION (MDD):");
        if diag.mdd_recommended {
            out.push("  >> MDD RECOMMENDED".into());
        } else {
            out.push("  MDD is not routinely required.".into());
        }
        out.push(format!("  Rationale: {}", diag.mdd_reason));
        out.push(String::new());
    }

    fn conclusion(&self, out: &mut Vec<String>, input: &ReportInput<'_>) {
        section(out, "CONCLUSION:");
        match input.diagnostic.and_then(|d| d.primary_pattern.as_ref().map(|p| (d, p))) {
            Some((diag, primary)) => {
                out.push(format!(
                    "  HRCT findings are consistent with {} (confidence: {:.0}%).",
                    primary.pattern_name, primary.final_score
                ));
                if diag.mdd_recommended {
                    out.push("  Multidisciplinary discussion (MDD) is recommended.".into());
                }
            }
            None => {
                out.push(
                    "  No specific ILD pattern identified. Clinical correlation is recommended."
                        .into(),
                );
            }
        }

        if let Some(ila) = input.ila.filter(|i| i.present) {
            out.push(format!("  ILA: {} - Risk: {}", ila.category_label, ila.risk_level));
        }
        out.push(String::new());
    }

    fn footer(&self, out: &mut Vec<String>, input: &ReportInput<'_>, meta: &ReportMeta) {
        let (version, fingerprint) = self.provenance(input);
        out.push("=".repeat(RULE_WIDTH));
        out.push(format!(
            "Report date: {}",
            meta.generated_at.format("%d.%m.%Y %H:%M")
        ));
        out.push(format!("Report ID: {}", meta.report_id));
        out.push(format!(
            "Knowledge base: {} ({})",
            version,
            short_fingerprint(fingerprint)
        ));
        out.push("Structured reporting aligned with the 2025 ERS/ATS guideline".into());
        out.push("For clinical decision support only; not a substitute for diagnosis.".into());
        out.push("=".repeat(RULE_WIDTH));
    }
}

fn section(out: &mut Vec<String>, title: &str) {
    out.push(title.to_string());
    out.push("-".repeat(SECTION_WIDTH));
}

/// First 12 hex characters of a fingerprint.
pub fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
