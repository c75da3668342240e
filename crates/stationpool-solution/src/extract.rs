use crate::artifacts::{
    AnchorRow, AssignmentRow, CorridorUsageRow, FlowRow, SameDestPoolingRow, SameSourcePoolingRow,
    ScenarioActivationRow, StationSelectionRow,
};
use stationpool_core::solver::SolveOutcome;
use stationpool_core::ProblemData;
use stationpool_index::DetourIndex;
use stationpool_model::FirstStageVars;
use stationpool_model::variant::aggregated::AggregatedVars;
use stationpool_model::variant::corridor::CorridorVars;
use stationpool_model::variant::time_bucketed::TimeBucketedVars;
use stationpool_model::variant::transportation::TransportationVars;
use std::collections::BTreeMap;

/// Walks the `y_j` family, thresholding at 0.5 (spec §4.7).
pub fn station_selection(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    first_stage: &FirstStageVars,
) -> Vec<StationSelectionRow> {
    (1..=problem.station_count())
        .filter_map(|j| {
            let var = first_stage.build_var(j)?;
            let value = outcome.value(var);
            Some(StationSelectionRow {
                station_index: j,
                station_id: problem.station_id(j).expect("in range"),
                selected: outcome.is_binary_true(var),
                value,
            })
        })
        .filter(|row| row.selected)
        .collect()
}

/// Walks the `z_{j,s}` family, thresholding at 0.5 (spec §4.7).
pub fn scenario_activation(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    first_stage: &FirstStageVars,
) -> Vec<ScenarioActivationRow> {
    let mut rows = Vec::new();
    for scenario_index in 1..=problem.scenario_count() {
        let scenario = problem.scenario(scenario_index).expect("in range");
        for j in 1..=problem.station_count() {
            let Some(var) = first_stage.active_var(j, scenario_index) else {
                continue;
            };
            if !outcome.is_binary_true(var) {
                continue;
            }
            rows.push(ScenarioActivationRow {
                station_index: j,
                station_id: problem.station_id(j).expect("in range"),
                scenario_index,
                scenario_label: scenario.label.clone(),
                value: outcome.value(var),
            });
        }
    }
    rows
}

/// Assignment rows for the aggregated/clustering/corridor variants,
/// which all share the same `x_{s,(o,d),j,k}` shape.
pub fn aggregated_assignments(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    vars: &AggregatedVars,
) -> Vec<AssignmentRow> {
    vars.assignment
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, (origin_id, dest_id), j, k), &var)| AssignmentRow {
            scenario_index,
            time_id: None,
            origin_id,
            dest_id,
            pickup_index: j,
            dropoff_index: k,
            pickup_id: problem.station_id(j).expect("in range"),
            dropoff_id: problem.station_id(k).expect("in range"),
            value: outcome.value(var),
        })
        .collect()
}

pub fn corridor_assignments(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    vars: &CorridorVars,
) -> Vec<AssignmentRow> {
    vars.assignment
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, (origin_id, dest_id), j, k), &var)| AssignmentRow {
            scenario_index,
            time_id: None,
            origin_id,
            dest_id,
            pickup_index: j,
            dropoff_index: k,
            pickup_id: problem.station_id(j).expect("in range"),
            dropoff_id: problem.station_id(k).expect("in range"),
            value: outcome.value(var),
        })
        .collect()
}

pub fn corridor_usage(
    outcome: &SolveOutcome,
    vars: &CorridorVars,
) -> Vec<CorridorUsageRow> {
    vars.corridor_used
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, corridor), &var)| CorridorUsageRow {
            cluster_a: corridor.from_label,
            cluster_b: corridor.to_label,
            scenario_index,
            value: outcome.value(var),
        })
        .collect()
}

pub fn time_bucketed_assignments(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    vars: &TimeBucketedVars,
) -> Vec<AssignmentRow> {
    vars.assignment
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, time_id, (origin_id, dest_id), j, k), &var)| AssignmentRow {
            scenario_index,
            time_id: Some(time_id),
            origin_id,
            dest_id,
            pickup_index: j,
            dropoff_index: k,
            pickup_id: problem.station_id(j).expect("in range"),
            dropoff_id: problem.station_id(k).expect("in range"),
            value: outcome.value(var),
        })
        .collect()
}

pub fn time_bucketed_flow(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    vars: &TimeBucketedVars,
) -> Vec<FlowRow> {
    vars.flow
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, time_id, j, k), &var)| FlowRow {
            scenario_index,
            time_id,
            j_index: j,
            k_index: k,
            j_id: problem.station_id(j).expect("in range"),
            k_id: problem.station_id(k).expect("in range"),
            value: outcome.value(var),
        })
        .collect()
}

/// Walks the `u_{s,t,i}` family (spec §6 "Same-source pooling").
/// `triple_index` numbers the detour index's own enumeration order so rows
/// from different runs over the same instance agree on an index.
pub fn time_bucketed_same_source_pooling(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    vars: &TimeBucketedVars,
    detours: &DetourIndex,
) -> Vec<SameSourcePoolingRow> {
    let index: BTreeMap<_, _> = detours
        .same_source_triples()
        .iter()
        .enumerate()
        .map(|(i, &triple)| (triple, i))
        .collect();
    vars.same_source_pooling
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, time_id, triple), &var)| SameSourcePoolingRow {
            scenario_index,
            time_id,
            triple_index: index[&triple],
            j_id: problem.station_id(triple.j).expect("in range"),
            k_id: problem.station_id(triple.k).expect("in range"),
            l_id: problem.station_id(triple.l).expect("in range"),
            value: outcome.value(var),
        })
        .collect()
}

/// Walks the `v_{s,t,i}` family (spec §6 "Same-dest pooling").
pub fn time_bucketed_same_dest_pooling(
    problem: &ProblemData,
    outcome: &SolveOutcome,
    vars: &TimeBucketedVars,
    detours: &DetourIndex,
) -> Vec<SameDestPoolingRow> {
    let index: BTreeMap<_, _> = detours
        .same_dest_quadruples()
        .iter()
        .enumerate()
        .map(|(i, &quad)| (quad, i))
        .collect();
    vars.same_dest_pooling
        .iter()
        .filter(|(_, &var)| outcome.is_binary_true(var))
        .map(|(&(scenario_index, time_id, quad), &var)| SameDestPoolingRow {
            scenario_index,
            time_id,
            quadruple_index: index[&quad],
            j_id: problem.station_id(quad.j).expect("in range"),
            k_id: problem.station_id(quad.k).expect("in range"),
            l_id: problem.station_id(quad.l).expect("in range"),
            time_delta: quad.time_delta,
            value: outcome.value(var),
        })
        .collect()
}

pub fn transportation_anchor_rows(
    outcome: &SolveOutcome,
    vars: &TransportationVars,
) -> Vec<AnchorRow> {
    let mut rows = Vec::new();
    for (&(scenario_index, anchor), &var) in &vars.anchor_active {
        if !outcome.is_binary_true(var) {
            continue;
        }
        rows.push(AnchorRow {
            scenario_index,
            cluster_a: anchor.from_label,
            cluster_b: anchor.to_label,
            family: "anchor_active".into(),
            j_index: None,
            k_index: None,
            value: outcome.value(var),
        });
    }
    for (&(scenario_index, anchor, j), &var) in &vars.pickup_load {
        if !outcome.is_continuous_nonzero(var) {
            continue;
        }
        rows.push(AnchorRow {
            scenario_index,
            cluster_a: anchor.from_label,
            cluster_b: anchor.to_label,
            family: "pickup_load".into(),
            j_index: Some(j),
            k_index: None,
            value: outcome.value(var),
        });
    }
    for (&(scenario_index, anchor, k), &var) in &vars.dropoff_load {
        if !outcome.is_continuous_nonzero(var) {
            continue;
        }
        rows.push(AnchorRow {
            scenario_index,
            cluster_a: anchor.from_label,
            cluster_b: anchor.to_label,
            family: "dropoff_load".into(),
            j_index: None,
            k_index: Some(k),
            value: outcome.value(var),
        });
    }
    for (&(scenario_index, anchor, j, k), &var) in &vars.flow {
        if !outcome.is_continuous_nonzero(var) {
            continue;
        }
        rows.push(AnchorRow {
            scenario_index,
            cluster_a: anchor.from_label,
            cluster_b: anchor.to_label,
            family: "flow".into(),
            j_index: Some(j),
            k_index: Some(k),
            value: outcome.value(var),
        });
    }
    rows
}
