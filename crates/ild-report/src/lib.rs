//! Structured radiology report for ILD pattern analysis.
//!
//! Renders `ild-core` results as a fixed-layout plain-text report and
//! exports the same content as JSON.

pub mod export;
pub mod report;
pub mod study;

pub use export::*;
pub use report::*;
pub use study::*;
