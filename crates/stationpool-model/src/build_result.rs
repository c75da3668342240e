use stationpool_core::solver::{ModelBuilder, Sense, SolveOutcome, SolverEnv, Var};
use std::collections::BTreeMap;

/// The shared first-stage/activation variables every variant builds on
/// top of (spec §4.6): `y_j` build decisions and `z_{j,s}` per-scenario
/// activation decisions.
#[derive(Debug, Clone, Default)]
pub struct FirstStageVars {
    pub build: BTreeMap<usize, Var>,
    pub active: BTreeMap<(usize, usize), Var>,
}

impl FirstStageVars {
    pub fn build_var(&self, station_index: usize) -> Option<Var> {
        self.build.get(&station_index).copied()
    }

    pub fn active_var(&self, station_index: usize, scenario_index: usize) -> Option<Var> {
        self.active.get(&(station_index, scenario_index)).copied()
    }
}

/// An assembled-but-unsolved model: the accumulated [`ModelBuilder`], the
/// shared first-stage variables, and whatever variant-specific variable
/// families the caller built (spec §4.6 "Build result").
pub struct ModelBuild<V> {
    pub builder: ModelBuilder,
    pub first_stage: FirstStageVars,
    pub variant: V,
}

impl<V> ModelBuild<V> {
    pub fn new(builder: ModelBuilder, first_stage: FirstStageVars, variant: V) -> Self {
        Self { builder, first_stage, variant }
    }

    /// Hands the assembled model to the solver and pairs the outcome with
    /// the variable families needed to extract a solution (spec §4.7).
    pub fn solve(self, sense: Sense, env: &SolverEnv) -> SolvedModel<V> {
        let outcome = self.builder.solve(sense, env);
        SolvedModel {
            outcome,
            first_stage: self.first_stage,
            variant: self.variant,
        }
    }
}

/// A solved model: termination status, objective, and the variable
/// families needed to walk the solution (spec §4.7).
pub struct SolvedModel<V> {
    pub outcome: SolveOutcome,
    pub first_stage: FirstStageVars,
    pub variant: V,
}
