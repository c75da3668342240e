//! A thin, named-family-aware wrapper over the `highs` crate.
//!
//! This is the one place in the workspace that talks to HiGHS directly.
//! `stationpool-index`'s k-medoid clustering (spec §4.4) and
//! `stationpool-model`'s model assembler (spec §4.6) both build on top
//! of [`ModelBuilder`] so that "the same external solver used for the
//! main models" (spec §4.4) is not just a philosophical claim but a
//! single code path. [`SolverEnv`] is the "scoped resource acquired
//! before model construction and released on all exit paths" of spec
//! §5: one `SolverEnv` is created per batch run and its [`SolverConfig`]
//! is reused by every [`ModelBuilder::solve`] call in that batch.
use highs::{Col, HighsModelStatus, RowProblem, Sense as HighsSense};
use std::collections::HashMap;
use std::ops::{Bound, RangeBounds};
use tracing::{debug, warn};

/// HiGHS's sentinel for ±infinity in a bound. Matches the convention the
/// solver itself uses, so "unbounded" rows/columns round-trip cleanly.
pub const INFINITY: f64 = 1e30;

/// Optimization sense. Mirrors `highs::Sense` so callers never import
/// `highs` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimise,
    Maximise,
}

/// Solver termination status (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationStatus {
    Optimal,
    TimeLimit,
    Infeasible,
    Unbounded,
    NotCalled,
    Error,
}

impl From<HighsModelStatus> for TerminationStatus {
    fn from(status: HighsModelStatus) -> Self {
        match status {
            HighsModelStatus::Optimal => TerminationStatus::Optimal,
            HighsModelStatus::ReachedTimeLimit => TerminationStatus::TimeLimit,
            HighsModelStatus::Infeasible => TerminationStatus::Infeasible,
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                TerminationStatus::Unbounded
            }
            HighsModelStatus::NotSet => TerminationStatus::NotCalled,
            _ => TerminationStatus::Error,
        }
    }
}

/// Configuration applied to every solve in a batch: time limit and log
/// verbosity. Deliberately has no blanket `Default` for the time limit —
/// an unbounded exact MIP solve is a real possibility a caller should
/// opt into explicitly, not inherit silently.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub time_limit_seconds: Option<f64>,
    pub log_output: bool,
}

impl SolverConfig {
    pub fn new(time_limit_seconds: Option<f64>) -> Self {
        Self {
            time_limit_seconds,
            log_output: false,
        }
    }
}

/// The scoped solver resource shared across a batch run (spec §5). Holds
/// only configuration today; the type exists so call sites have a single
/// injectable handle to pass around, matching "the solver environment is
/// injectable" (spec §6).
#[derive(Debug, Clone)]
pub struct SolverEnv {
    config: SolverConfig,
}

impl SolverEnv {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn builder(&self) -> ModelBuilder {
        ModelBuilder::new()
    }
}

/// An opaque handle to a decision variable. Stable for the lifetime of
/// one [`ModelBuilder`]; indexes in parallel into both the underlying
/// `highs` columns and the solved model's value vector, so call sites
/// never need to know how `highs` itself addresses columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Var(usize);

impl Var {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Accumulates columns and rows for one model build. Tracks per-family
/// variable and constraint counts as it goes, for the assembler's
/// `BuildResult` diagnostics (spec §4.6 "Build result").
pub struct ModelBuilder {
    problem: RowProblem,
    cols: Vec<Col>,
    objective_coeffs: Vec<f64>,
    variable_counts: HashMap<String, usize>,
    constraint_counts: HashMap<String, usize>,
    warm_start: HashMap<usize, f64>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            problem: RowProblem::default(),
            cols: Vec::new(),
            objective_coeffs: Vec::new(),
            variable_counts: HashMap::new(),
            constraint_counts: HashMap::new(),
            warm_start: HashMap::new(),
        }
    }

    fn record_var(&mut self, family: &str, col: Col, objective_cost: f64) -> Var {
        *self.variable_counts.entry(family.to_string()).or_insert(0) += 1;
        self.cols.push(col);
        self.objective_coeffs.push(objective_cost);
        Var(self.cols.len() - 1)
    }

    /// Adds a binary `{0,1}` column to the named variable family.
    pub fn add_binary(&mut self, family: &str, objective_cost: f64) -> Var {
        let col = self.problem.add_integer_column(objective_cost, 0.0..=1.0);
        self.record_var(family, col, objective_cost)
    }

    /// Adds a non-negative integer column bounded above by `upper_bound`.
    pub fn add_integer(&mut self, family: &str, objective_cost: f64, upper_bound: f64) -> Var {
        let col = self
            .problem
            .add_integer_column(objective_cost, 0.0..=upper_bound);
        self.record_var(family, col, objective_cost)
    }

    /// Adds a continuous column (used only by relaxation/diagnostic
    /// paths; every production family in this workspace is binary or
    /// integer).
    pub fn add_continuous(
        &mut self,
        family: &str,
        objective_cost: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Var {
        let col = self
            .problem
            .add_column(objective_cost, lower_bound..=upper_bound);
        self.record_var(family, col, objective_cost)
    }

    fn bound_endpoints(bounds: impl RangeBounds<f64>) -> (f64, f64) {
        let lo = match bounds.start_bound() {
            Bound::Included(v) | Bound::Excluded(v) => *v,
            Bound::Unbounded => -INFINITY,
        };
        let hi = match bounds.end_bound() {
            Bound::Included(v) | Bound::Excluded(v) => *v,
            Bound::Unbounded => INFINITY,
        };
        (lo, hi)
    }

    /// Adds a linear row `lo <= Σ coeff*var <= hi` to the named
    /// constraint family.
    pub fn add_row(
        &mut self,
        family: &str,
        bounds: impl RangeBounds<f64>,
        terms: &[(Var, f64)],
    ) {
        let (lo, hi) = Self::bound_endpoints(bounds);
        let highs_terms: Vec<(Col, f64)> = terms
            .iter()
            .map(|(var, coeff)| (self.cols[var.0], *coeff))
            .collect();
        self.problem.add_row(lo..=hi, &highs_terms);
        *self
            .constraint_counts
            .entry(family.to_string())
            .or_insert(0) += 1;
    }

    pub fn add_eq(&mut self, family: &str, terms: &[(Var, f64)], rhs: f64) {
        self.add_row(family, rhs..=rhs, terms);
    }

    pub fn add_le(&mut self, family: &str, terms: &[(Var, f64)], rhs: f64) {
        self.add_row(family, ..=rhs, terms);
    }

    pub fn add_ge(&mut self, family: &str, terms: &[(Var, f64)], rhs: f64) {
        self.add_row(family, rhs.., terms);
    }

    /// Records a warm-start value for `var`, applied just before
    /// `solve` (spec §9 "Warm starts").
    pub fn set_warm_start(&mut self, var: Var, value: f64) {
        self.warm_start.insert(var.index(), value);
    }

    pub fn variable_counts(&self) -> &HashMap<String, usize> {
        &self.variable_counts
    }

    pub fn constraint_counts(&self) -> &HashMap<String, usize> {
        &self.constraint_counts
    }

    pub fn column_count(&self) -> usize {
        self.cols.len()
    }

    /// Hands the accumulated problem to HiGHS and returns its outcome.
    pub fn solve(self, sense: Sense, env: &SolverEnv) -> SolveOutcome {
        let ModelBuilder {
            problem,
            cols,
            objective_coeffs,
            variable_counts,
            constraint_counts,
            warm_start,
        } = self;

        let highs_sense = match sense {
            Sense::Minimise => HighsSense::Minimise,
            Sense::Maximise => HighsSense::Maximise,
        };
        let mut model = problem.optimise(highs_sense);
        if let Some(limit) = env.config().time_limit_seconds {
            model.set_option("time_limit", limit);
        }
        model.set_option("output_flag", env.config().log_output);

        if !warm_start.is_empty() {
            let mut values = vec![0.0; cols.len()];
            for (index, value) in &warm_start {
                values[*index] = *value;
            }
            debug!(count = warm_start.len(), "applying warm start");
            model.set_solution(Some(&values), None, None, None);
        }

        let solved = model.solve();
        let status = TerminationStatus::from(solved.status());
        let columns = match status {
            TerminationStatus::Optimal | TerminationStatus::TimeLimit => {
                solved.get_solution().columns().to_vec()
            }
            _ => {
                warn!(?status, "solve did not produce a usable solution");
                Vec::new()
            }
        };
        let objective_value = if columns.is_empty() {
            None
        } else {
            Some(
                columns
                    .iter()
                    .zip(objective_coeffs.iter())
                    .map(|(value, coeff)| value * coeff)
                    .sum::<f64>(),
            )
        };

        SolveOutcome {
            status,
            objective_value,
            columns,
            variable_counts,
            constraint_counts,
        }
    }
}

/// The result of one `ModelBuilder::solve` call: status, objective (when
/// available) and the raw column values indexed by [`Var::index`].
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: TerminationStatus,
    pub objective_value: Option<f64>,
    columns: Vec<f64>,
    pub variable_counts: HashMap<String, usize>,
    pub constraint_counts: HashMap<String, usize>,
}

impl SolveOutcome {
    /// The raw value for `var`, or `0.0` if the solve produced no
    /// solution (status other than `Optimal`/`TimeLimit`).
    pub fn value(&self, var: Var) -> f64 {
        self.columns.get(var.index()).copied().unwrap_or(0.0)
    }

    pub fn is_binary_true(&self, var: Var) -> bool {
        self.value(var) > 0.5
    }

    pub fn is_continuous_nonzero(&self, var: Var) -> bool {
        self.value(var) > 1e-6
    }
}
