//! Domain models for the ILD decision-support system.

mod context;
mod finding;
mod ila;
mod pattern;
mod result;

pub use context::*;
pub use finding::*;
pub use ila::*;
pub use pattern::*;
pub use result::*;
