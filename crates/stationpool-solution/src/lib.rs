//! Solution extraction (spec §4.7): reads solver values out of a solved
//! model and recovers first-stage/second-stage/assignment decisions as
//! serde-serializable row artifacts, plus a run metadata document (spec
//! §6 "Output artifacts").

pub mod artifacts;
pub mod error;
pub mod extract;
#[cfg(test)]
mod extraction_tests;
pub mod metadata;

pub use error::{Error, Result};
pub use metadata::{RunMetadata, TerminationStatusRecord};
