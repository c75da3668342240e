use crate::build_result::ModelBuild;
use crate::config::{BuildConfig, ObjectiveWeights};
use crate::error::Result;
use stationpool_core::solver::{SolverEnv, Var};
use stationpool_core::ProblemData;
use stationpool_index::{Anchor, AnchorIndex};
use std::collections::BTreeMap;

/// Per-anchor, per-scenario variable families for the transportation
/// model (spec §4.6.4).
#[derive(Debug, Clone, Default)]
pub struct TransportationVars {
    pub pickup_assignment: BTreeMap<(usize, Anchor, i64, usize), Var>,
    pub dropoff_assignment: BTreeMap<(usize, Anchor, i64, usize), Var>,
    pub pickup_load: BTreeMap<(usize, Anchor, usize), Var>,
    pub dropoff_load: BTreeMap<(usize, Anchor, usize), Var>,
    pub flow: BTreeMap<(usize, Anchor, usize, usize), Var>,
    pub anchor_active: BTreeMap<(usize, Anchor), Var>,
}

pub fn build(
    env: &SolverEnv,
    problem: &ProblemData,
    anchors: &AnchorIndex,
    build_config: &BuildConfig,
    weights: &ObjectiveWeights,
) -> Result<ModelBuild<TransportationVars>> {
    let mut builder = env.builder();
    let first_stage = crate::assembler::add_first_stage(&mut builder, problem, build_config);

    let mut vars = TransportationVars::default();

    for scenario_index in 1..=problem.scenario_count() {
        for anchor in anchors.active_in(scenario_index) {
            let candidates = anchors.candidate_pairs(anchor);
            if candidates.is_empty() {
                continue;
            }
            let trip_count = anchors.trip_count(scenario_index, anchor);
            let anchor_var = builder.add_binary("anchor_active", weights.anchor_activation_cost);
            vars.anchor_active.insert((scenario_index, anchor), anchor_var);

            let pickup_stations: Vec<usize> = candidates.iter().map(|&(j, _)| j).collect();
            let dropoff_stations: Vec<usize> = candidates.iter().map(|&(_, k)| k).collect();

            let mut pickup_load_terms: BTreeMap<usize, Vec<Var>> = BTreeMap::new();
            for (origin_id, count) in anchors.pickup_counts(scenario_index, anchor) {
                let mut one_hot = Vec::new();
                for &j in pickup_stations.iter().collect::<std::collections::BTreeSet<_>>() {
                    let cost = count as f64 * problem.walking_cost(origin_id, problem.station_id(j).expect("in range"))?;
                    let var = builder.add_binary("pickup_assignment", cost);
                    vars.pickup_assignment.insert((scenario_index, anchor, origin_id, j), var);
                    one_hot.push(var);
                    pickup_load_terms.entry(j).or_default().push(var);
                    let z_j = first_stage.active_var(j, scenario_index).expect("in range");
                    builder.add_le("pickup_viability", &[(var, 1.0), (z_j, -1.0)], 0.0);
                }
                let terms: Vec<_> = one_hot.iter().map(|&v| (v, 1.0)).collect();
                builder.add_eq("pickup_one_hot", &terms, 1.0);
            }

            let mut dropoff_load_terms: BTreeMap<usize, Vec<Var>> = BTreeMap::new();
            for (destination_id, count) in anchors.dropoff_counts(scenario_index, anchor) {
                let mut one_hot = Vec::new();
                for &k in dropoff_stations.iter().collect::<std::collections::BTreeSet<_>>() {
                    let cost = count as f64 * problem.walking_cost(problem.station_id(k).expect("in range"), destination_id)?;
                    let var = builder.add_binary("dropoff_assignment", cost);
                    vars.dropoff_assignment.insert((scenario_index, anchor, destination_id, k), var);
                    one_hot.push(var);
                    dropoff_load_terms.entry(k).or_default().push(var);
                    let z_k = first_stage.active_var(k, scenario_index).expect("in range");
                    builder.add_le("dropoff_viability", &[(var, 1.0), (z_k, -1.0)], 0.0);
                }
                let terms: Vec<_> = one_hot.iter().map(|&v| (v, 1.0)).collect();
                builder.add_eq("dropoff_one_hot", &terms, 1.0);
            }

            let mut pickup_load: BTreeMap<usize, Var> = BTreeMap::new();
            for (&j, xs) in &pickup_load_terms {
                let var = builder.add_integer("pickup_load", 0.0, trip_count as f64);
                vars.pickup_load.insert((scenario_index, anchor, j), var);
                pickup_load.insert(j, var);
                let mut terms: Vec<_> = xs.iter().map(|&v| (v, -1.0)).collect();
                terms.push((var, 1.0));
                builder.add_eq("pickup_load_aggregation", &terms, 0.0);
            }

            let mut dropoff_load: BTreeMap<usize, Var> = BTreeMap::new();
            for (&k, xs) in &dropoff_load_terms {
                let var = builder.add_integer("dropoff_load", 0.0, trip_count as f64);
                vars.dropoff_load.insert((scenario_index, anchor, k), var);
                dropoff_load.insert(k, var);
                let mut terms: Vec<_> = xs.iter().map(|&v| (v, -1.0)).collect();
                terms.push((var, 1.0));
                builder.add_eq("dropoff_load_aggregation", &terms, 0.0);
            }

            let mut flow: BTreeMap<(usize, usize), Var> = BTreeMap::new();
            for &(j, k) in candidates {
                let id_j = problem.station_id(j).expect("in range");
                let id_k = problem.station_id(k).expect("in range");
                let routing = weights.in_vehicle_time_weight * problem.routing_cost(id_j, id_k)?;
                let var = builder.add_integer("flow", routing, trip_count as f64);
                vars.flow.insert((scenario_index, anchor, j, k), var);
                flow.insert((j, k), var);
                builder.add_le(
                    "flow_activation",
                    &[(var, 1.0), (anchor_var, -(trip_count as f64))],
                    0.0,
                );
            }

            for &j in pickup_load.keys() {
                let out_terms: Vec<_> = candidates
                    .iter()
                    .filter(|&&(jj, _)| jj == j)
                    .map(|&(_, k)| (flow[&(j, k)], 1.0))
                    .chain(std::iter::once((pickup_load[&j], -1.0)))
                    .collect();
                builder.add_eq("flow_conservation_pickup", &out_terms, 0.0);
            }
            for &k in dropoff_load.keys() {
                let in_terms: Vec<_> = candidates
                    .iter()
                    .filter(|&&(_, kk)| kk == k)
                    .map(|&(j, _)| (flow[&(j, k)], 1.0))
                    .chain(std::iter::once((dropoff_load[&k], -1.0)))
                    .collect();
                builder.add_eq("flow_conservation_dropoff", &in_terms, 0.0);
            }
        }
    }

    Ok(ModelBuild::new(builder, first_stage, vars))
}
