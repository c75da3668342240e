//! Model assembler for the station-selection MIP family (spec §4.6).
//!
//! Builds the shared first-stage/activation skeleton (`y`, `z`) and one
//! of five variant superstructures on top of it, then hands the
//! accumulated model to the bundled HiGHS solver via
//! `stationpool_core::solver`.

pub mod assembler;
#[cfg(test)]
mod boundary_tests;
pub mod build_result;
pub mod config;
pub mod error;
pub mod variant;

pub use build_result::{FirstStageVars, ModelBuild, SolvedModel};
pub use config::{BuildConfig, ObjectiveWeights, PoolingConfig};
pub use error::{Error, Result};
