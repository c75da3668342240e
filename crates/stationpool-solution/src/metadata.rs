use serde::{Deserialize, Serialize};
use stationpool_core::solver::TerminationStatus;
use std::collections::BTreeMap;

/// Serializable mirror of [`TerminationStatus`] (spec §6 "A metadata
/// document records ... termination status").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationStatusRecord {
    Optimal,
    TimeLimit,
    Infeasible,
    Unbounded,
    NotCalled,
    Error,
}

impl From<TerminationStatus> for TerminationStatusRecord {
    fn from(status: TerminationStatus) -> Self {
        match status {
            TerminationStatus::Optimal => Self::Optimal,
            TerminationStatus::TimeLimit => Self::TimeLimit,
            TerminationStatus::Infeasible => Self::Infeasible,
            TerminationStatus::Unbounded => Self::Unbounded,
            TerminationStatus::NotCalled => Self::NotCalled,
            TerminationStatus::Error => Self::Error,
        }
    }
}

/// The run metadata document of spec §6: model type, scenario/cluster/
/// anchor counts, variable/constraint counts per family, termination
/// status, objective value, and runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub model_type: String,
    pub scenario_count: usize,
    pub cluster_count: Option<usize>,
    pub anchor_count: Option<usize>,
    pub variable_counts: BTreeMap<String, usize>,
    pub constraint_counts: BTreeMap<String, usize>,
    pub termination_status: TerminationStatusRecord,
    pub objective_value: Option<f64>,
    pub runtime_seconds: f64,
}

impl RunMetadata {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model_type: impl Into<String>,
        scenario_count: usize,
        cluster_count: Option<usize>,
        anchor_count: Option<usize>,
        variable_counts: &std::collections::HashMap<String, usize>,
        constraint_counts: &std::collections::HashMap<String, usize>,
        termination_status: TerminationStatus,
        objective_value: Option<f64>,
        runtime_seconds: f64,
    ) -> Self {
        Self {
            model_type: model_type.into(),
            scenario_count,
            cluster_count,
            anchor_count,
            variable_counts: variable_counts.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            constraint_counts: constraint_counts.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            termination_status: termination_status.into(),
            objective_value,
            runtime_seconds,
        }
    }
}
