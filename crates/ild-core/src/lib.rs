//! ILD Core Library
//!
//! Rule-based decision support for interstitial lung disease (ILD) on HRCT,
//! following the 2022 ATS/ERS/JRS/ALAT guideline with the 2025 ERS/ATS
//! nomenclature, and Fleischner Society ILA classification.
//!
//! # Architecture
//!
//! ```text
//! Selected findings + clinical context
//!              │
//!              ▼
//!      Finding expansion (composite → components)
//!              │
//!              ▼
//!      Pattern scoring (every pattern in the knowledge base)
//!              │
//!              ▼
//!      Co-occurrence adjustment
//!              │
//!              ▼
//!      Ranking → primary pattern → MDD decision
//! ```
//!
//! ILA classification is independent of pattern scoring.
//!
//! # Core Principle
//!
//! **Every computation is a pure function of its inputs and an immutable
//! knowledge base.** Results are decision support for a radiologist, never a
//! diagnosis.
//!
//! # Modules
//!
//! - [`knowledge`]: Finding taxonomy, pattern definitions and rules
//! - [`models`]: Domain types (ClinicalContext, PatternResult, IlaResult, etc.)
//! - [`engine`]: Decision engine (expansion, scoring, co-occurrence, MDD)
//! - [`ila`]: ILA classifier

pub mod engine;
pub mod ila;
pub mod knowledge;
pub mod models;

// Re-export commonly used types
pub use engine::DecisionEngine;
pub use ila::IlaClassifier;
pub use knowledge::{KnowledgeBase, KnowledgeBaseData, KnowledgeError};
pub use models::{
    finding_set, ClinicalContext, ConfidenceLevel, DiagnosticResult, FindingSet, IlaCategory,
    IlaResult, MddBasis, PatternResult, RiskLevel,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum IldError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<KnowledgeError> for IldError {
    fn from(e: KnowledgeError) -> Self {
        IldError::KnowledgeBase(e.to_string())
    }
}

impl From<serde_json::Error> for IldError {
    fn from(e: serde_json::Error) -> Self {
        IldError::SerializationError(e.to_string())
    }
}

impl From<models::UnknownOption> for IldError {
    fn from(e: models::UnknownOption) -> Self {
        IldError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Core over the built-in knowledge base.
#[uniffi::export]
pub fn builtin_core() -> Arc<IldCore> {
    Arc::new(IldCore::new(Arc::clone(KnowledgeBase::builtin_shared())))
}

/// Core over a knowledge base loaded from JSON. The document is validated first.
#[uniffi::export]
pub fn load_core(json: String) -> Result<Arc<IldCore>, IldError> {
    let kb = KnowledgeBase::from_json(&json)?;
    Ok(Arc::new(IldCore::new(Arc::new(kb))))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Immutable, thread-safe analysis core for FFI.
#[derive(uniffi::Object)]
pub struct IldCore {
    kb: Arc<KnowledgeBase>,
    ila: IlaClassifier,
}

impl IldCore {
    fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            ila: IlaClassifier::new(),
        }
    }
}

#[uniffi::export]
impl IldCore {
    /// Analyze selected CT findings in their clinical context.
    pub fn analyze(
        &self,
        findings: Vec<String>,
        context: FfiClinicalContext,
    ) -> Result<FfiDiagnosticResult, IldError> {
        let ctx = ClinicalContext::try_from(context)?;
        let selected: FindingSet = findings.into_iter().collect();
        let result = DecisionEngine::new(&self.kb).analyze(&selected, &ctx);
        Ok(result.into())
    }

    /// Classify an interstitial lung abnormality.
    pub fn classify_ila(
        &self,
        present: bool,
        subpleural: bool,
        extent_percent: f64,
        findings: Vec<String>,
    ) -> FfiIlaResult {
        let selected: FindingSet = findings.into_iter().collect();
        self.ila
            .classify(present, subpleural, extent_percent, &selected)
            .into()
    }

    pub fn knowledge_base_fingerprint(&self) -> String {
        self.kb.fingerprint().to_string()
    }

    pub fn knowledge_base_version(&self) -> String {
        self.kb.version().to_string()
    }

    /// Display label for an ILD or ILA finding key.
    pub fn finding_label(&self, key: String) -> Option<String> {
        self.kb.finding(&key).map(|f| f.label.clone())
    }

    /// Export the knowledge base as pretty JSON.
    pub fn export_knowledge_base_json(&self) -> Result<String, IldError> {
        Ok(self.kb.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe clinical context. Option fields use vocabulary keys ("male", "former", ...).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalContext {
    pub age: i32,
    pub sex: String,
    pub smoking: String,
    pub pack_years: u32,
    pub ctd: String,
    pub exposure: String,
    pub presentation: String,
    pub indication: String,
}

impl TryFrom<FfiClinicalContext> for ClinicalContext {
    type Error = models::UnknownOption;

    fn try_from(ctx: FfiClinicalContext) -> Result<Self, Self::Error> {
        Ok(ClinicalContext {
            age: ctx.age,
            sex: ctx.sex.parse()?,
            smoking: ctx.smoking.parse()?,
            pack_years: ctx.pack_years,
            ctd: ctx.ctd.parse()?,
            exposure: ctx.exposure.parse()?,
            presentation: ctx.presentation,
            indication: ctx.indication,
        })
    }
}

impl From<ClinicalContext> for FfiClinicalContext {
    fn from(ctx: ClinicalContext) -> Self {
        Self {
            age: ctx.age,
            sex: ctx.sex.key().to_string(),
            smoking: ctx.smoking.key().to_string(),
            pack_years: ctx.pack_years,
            ctd: ctx.ctd.key().to_string(),
            exposure: ctx.exposure.key().to_string(),
            presentation: ctx.presentation,
            indication: ctx.indication,
        }
    }
}

/// FFI-safe pattern result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatternResult {
    pub pattern_key: String,
    pub pattern_name: String,
    pub final_score: f64,
    pub finding_score: f64,
    pub clinical_modifier_score: f64,
    pub penalty_score: f64,
    pub confidence_label: String,
    pub confidence_color: String,
    pub used_alternative: bool,
    pub matched_required: Vec<String>,
    pub matched_supportive: Vec<String>,
    pub matched_against: Vec<String>,
    pub associated_diagnoses: Vec<String>,
}

impl From<PatternResult> for FfiPatternResult {
    fn from(r: PatternResult) -> Self {
        let level = r.confidence_level();
        Self {
            confidence_label: level.label().to_string(),
            confidence_color: format!("{:?}", level.color()).to_lowercase(),
            pattern_key: r.pattern_key,
            pattern_name: r.pattern_name,
            final_score: r.final_score,
            finding_score: r.finding_score,
            clinical_modifier_score: r.clinical_modifier_score,
            penalty_score: r.penalty_score,
            used_alternative: r.used_alternative,
            matched_required: r.matched_required,
            matched_supportive: r.matched_supportive,
            matched_against: r.matched_against,
            associated_diagnoses: r.associated_diagnoses,
        }
    }
}

/// FFI-safe diagnostic result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDiagnosticResult {
    pub primary_pattern: Option<FfiPatternResult>,
    pub ranked_patterns: Vec<FfiPatternResult>,
    pub mdd_recommended: bool,
    pub mdd_rule: String,
    pub mdd_reason: String,
    pub selected_findings: Vec<String>,
    pub knowledge_base_version: String,
    pub knowledge_base_fingerprint: String,
}

impl From<DiagnosticResult> for FfiDiagnosticResult {
    fn from(r: DiagnosticResult) -> Self {
        Self {
            primary_pattern: r.primary_pattern.map(|p| p.into()),
            ranked_patterns: r.ranked_patterns.into_iter().map(|p| p.into()).collect(),
            mdd_recommended: r.mdd_recommended,
            mdd_rule: r.mdd_basis.rule_key().to_string(),
            mdd_reason: r.mdd_reason,
            selected_findings: r.selected_findings,
            knowledge_base_version: r.knowledge_base_version,
            knowledge_base_fingerprint: r.knowledge_base_fingerprint,
        }
    }
}

/// FFI-safe ILA result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIlaResult {
    pub present: bool,
    pub category: String,
    pub category_label: String,
    pub risk_level: String,
    pub extent_percent: f64,
    pub has_fibrotic_features: bool,
    pub is_subpleural: bool,
    pub follow_up: String,
    pub selected_findings: Vec<String>,
}

impl From<IlaResult> for FfiIlaResult {
    fn from(r: IlaResult) -> Self {
        Self {
            present: r.present,
            category: r.category.key().to_string(),
            category_label: r.category_label,
            risk_level: r.risk_level.to_string(),
            extent_percent: r.extent_percent,
            has_fibrotic_features: r.has_fibrotic_features,
            is_subpleural: r.is_subpleural,
            follow_up: r.follow_up,
            selected_findings: r.selected_findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FfiClinicalContext {
        ClinicalContext {
            age: 65,
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_ffi_analyze() {
        let core = builtin_core();
        let result = core
            .analyze(vec!["honeycombing".into()], context())
            .unwrap();
        let primary = result.primary_pattern.unwrap();
        assert_eq!(primary.pattern_key, "uip_definite");
        assert_eq!(primary.confidence_color, "green");
        assert!(!result.mdd_recommended);
        assert_eq!(result.mdd_rule, "definite_pattern");
        assert_eq!(result.knowledge_base_fingerprint, core.knowledge_base_fingerprint());
    }

    #[test]
    fn test_ffi_rejects_unknown_option() {
        let mut ctx = context();
        ctx.sex = "unknown".into();
        let err = builtin_core().analyze(vec![], ctx).unwrap_err();
        assert!(matches!(err, IldError::InvalidInput(_)));
    }

    #[test]
    fn test_ffi_classify_ila() {
        let result = builtin_core().classify_ila(true, true, 20.0, vec!["ila_honeycombing".into()]);
        assert_eq!(result.category, "subpleural_fibrotic");
        assert_eq!(result.risk_level, "High");
    }

    #[test]
    fn test_builtin_cores_share_knowledge_base() {
        let a = builtin_core();
        let b = builtin_core();
        assert!(Arc::ptr_eq(&a.kb, &b.kb));
        assert!(std::ptr::eq(a.kb.as_ref(), KnowledgeBase::builtin()));
    }

    #[test]
    fn test_load_core_roundtrip() {
        let core = builtin_core();
        let json = core.export_knowledge_base_json().unwrap();
        let loaded = load_core(json).unwrap();
        assert_eq!(loaded.knowledge_base_fingerprint(), core.knowledge_base_fingerprint());
        assert_eq!(loaded.knowledge_base_version(), "2025.1");
    }

    #[test]
    fn test_load_core_invalid() {
        assert!(matches!(
            load_core("{}".into()),
            Err(IldError::KnowledgeBase(_))
        ));
    }

    #[test]
    fn test_finding_label() {
        let core = builtin_core();
        assert_eq!(core.finding_label("honeycombing".into()).as_deref(), Some("Honeycombing"));
        assert!(core.finding_label("nope".into()).is_none());
    }
}
