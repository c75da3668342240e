//! Immutable problem data for the shared-mobility station-selection core.
//!
//! This crate owns the data model (spec §3): stations, requests,
//! scenarios and the walking/routing cost-matrix lookups (spec §4.1).
//! It has no knowledge of index mappings, model variants or solvers —
//! those live in `stationpool-index`, `stationpool-model` and
//! `stationpool-solution` respectively.

pub mod cost;
pub mod error;
pub mod request;
pub mod scenario;
pub mod solver;
pub mod station;

mod problem;

pub use cost::CostMatrix;
pub use error::{Error, Result};
pub use problem::{ProblemData, RawRequest, RawScenarioWindow};
pub use request::Request;
pub use scenario::Scenario;
pub use station::{Station, StationTable};
