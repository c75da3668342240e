use crate::build_result::ModelBuild;
use crate::config::{BuildConfig, ObjectiveWeights};
use crate::error::Result;
use stationpool_core::solver::{SolverEnv, Var};
use stationpool_core::ProblemData;
use stationpool_index::{
    DetourIndex, FeasiblePairTable, OdPair, SameDestQuadruple, SameSourceTriple,
    TimeBucketedDemand,
};
use std::collections::BTreeMap;

/// Assignment/flow/pooling variables for the time-bucketed single-detour
/// model (spec §4.6.1).
#[derive(Debug, Clone, Default)]
pub struct TimeBucketedVars {
    pub assignment: BTreeMap<(usize, i64, OdPair, usize, usize), Var>,
    pub flow: BTreeMap<(usize, i64, usize, usize), Var>,
    pub same_source_pooling: BTreeMap<(usize, i64, SameSourceTriple), Var>,
    pub same_dest_pooling: BTreeMap<(usize, i64, SameDestQuadruple), Var>,
}

impl TimeBucketedVars {
    pub fn assignment_var(
        &self,
        scenario_index: usize,
        time_id: i64,
        od: OdPair,
        j: usize,
        k: usize,
    ) -> Option<Var> {
        self.assignment
            .get(&(scenario_index, time_id, od, j, k))
            .copied()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build(
    env: &SolverEnv,
    problem: &ProblemData,
    demand: &TimeBucketedDemand,
    feasible: Option<&FeasiblePairTable>,
    detours: Option<&DetourIndex>,
    build_config: &BuildConfig,
    weights: &ObjectiveWeights,
) -> Result<ModelBuild<TimeBucketedVars>> {
    let mut builder = env.builder();
    let first_stage = crate::assembler::add_first_stage(&mut builder, problem, build_config);
    let n = problem.station_count();

    let mut assignment: BTreeMap<(usize, i64, OdPair, usize, usize), Var> = BTreeMap::new();
    let mut flow: BTreeMap<(usize, i64, usize, usize), Var> = BTreeMap::new();
    let mut bucket_assignment: BTreeMap<(usize, i64), BTreeMap<(usize, usize), Vec<Var>>> =
        BTreeMap::new();

    for scenario_index in 1..=problem.scenario_count() {
        for time_id in demand.time_buckets(scenario_index) {
            let mut this_bucket: BTreeMap<(usize, usize), Vec<Var>> = BTreeMap::new();

            for od in demand.od_pairs(scenario_index, time_id) {
                let count = demand.count(scenario_index, time_id, od);
                let candidates: Vec<(usize, usize)> = match feasible {
                    Some(table) => table.candidates(od).to_vec(),
                    None => (1..=n).flat_map(|j| (1..=n).map(move |k| (j, k))).collect(),
                };

                let mut vars_for_od = Vec::with_capacity(candidates.len());
                for (j, k) in candidates {
                    let id_j = problem.station_id(j).expect("in range");
                    let id_k = problem.station_id(k).expect("in range");
                    let routing = if weights.in_vehicle_time_weight > 0.0 {
                        problem.routing_cost(id_j, id_k)?
                    } else {
                        0.0
                    };
                    let cost = (count as f64)
                        * (problem.walking_cost(od.0, id_j)?
                            + problem.walking_cost(id_k, od.1)?
                            + weights.in_vehicle_time_weight * routing);
                    let var = builder.add_binary("assignment", cost);
                    assignment.insert((scenario_index, time_id, od, j, k), var);
                    vars_for_od.push((var, j, k));
                    this_bucket.entry((j, k)).or_default().push(var);
                }

                let terms: Vec<_> = vars_for_od.iter().map(|(v, _, _)| (*v, 1.0)).collect();
                builder.add_eq("unique_assignment", &terms, 1.0);

                for (var, j, k) in vars_for_od {
                    let z_j = first_stage
                        .active_var(j, scenario_index)
                        .expect("in range");
                    let z_k = first_stage
                        .active_var(k, scenario_index)
                        .expect("in range");
                    if build_config.tight_activation_linking {
                        builder.add_le("activation_linking_x", &[(var, 1.0), (z_j, -1.0)], 0.0);
                        builder.add_le("activation_linking_x", &[(var, 1.0), (z_k, -1.0)], 0.0);
                    } else {
                        builder.add_le(
                            "activation_linking_x",
                            &[(var, 2.0), (z_j, -1.0), (z_k, -1.0)],
                            0.0,
                        );
                    }
                }
            }

            for (&(j, k), vars) in &this_bucket {
                let id_j = problem.station_id(j).expect("in range");
                let id_k = problem.station_id(k).expect("in range");
                let routing_cost = problem.routing_cost(id_j, id_k).unwrap_or(0.0);
                let f_var = builder.add_binary("flow", weights.vehicle_routing_weight * routing_cost);
                flow.insert((scenario_index, time_id, j, k), f_var);

                for &x_var in vars {
                    builder.add_le("flow_lower", &[(x_var, 1.0), (f_var, -1.0)], 0.0);
                }
                let sum_terms: Vec<_> = vars.iter().map(|&v| (v, -1.0)).collect();
                let mut terms_with_f = vec![(f_var, 1.0)];
                terms_with_f.extend(sum_terms);
                builder.add_le("flow_upper", &terms_with_f, 0.0);
            }

            bucket_assignment.insert((scenario_index, time_id), this_bucket);
        }
    }

    let mut same_source_pooling: BTreeMap<(usize, i64, SameSourceTriple), Var> = BTreeMap::new();
    let mut same_dest_pooling: BTreeMap<(usize, i64, SameDestQuadruple), Var> = BTreeMap::new();

    if let Some(detours) = detours {
        for scenario_index in 1..=problem.scenario_count() {
            for time_id in demand.time_buckets(scenario_index) {
                for triple in
                    detours.feasible_same_source(demand, feasible, scenario_index, time_id)
                {
                    let savings = same_source_savings(problem, triple, weights)?;
                    let u_var = builder.add_binary("same_source_pooling", -savings);
                    same_source_pooling.insert((scenario_index, time_id, triple), u_var);

                    let jk_vars =
                        edge_vars(&bucket_assignment, scenario_index, time_id, (triple.j, triple.k));
                    let jl_vars =
                        edge_vars(&bucket_assignment, scenario_index, time_id, (triple.j, triple.l));
                    builder.add_ge("same_source_detour_jk", &sum_minus(jk_vars, u_var), 0.0);
                    builder.add_ge("same_source_detour_jl", &sum_minus(jl_vars, u_var), 0.0);
                }

                for quad in detours.feasible_same_dest(demand, feasible, scenario_index, time_id) {
                    let savings = same_dest_savings(problem, quad, weights)?;
                    let v_var = builder.add_binary("same_dest_pooling", -savings);
                    same_dest_pooling.insert((scenario_index, time_id, quad), v_var);

                    let jl_vars =
                        edge_vars(&bucket_assignment, scenario_index, time_id, (quad.j, quad.l));
                    let later = time_id + quad.time_delta;
                    let kl_vars = edge_vars(&bucket_assignment, scenario_index, later, (quad.k, quad.l));
                    builder.add_ge("same_dest_detour_jl", &sum_minus(jl_vars, v_var), 0.0);
                    builder.add_ge("same_dest_detour_kl", &sum_minus(kl_vars, v_var), 0.0);
                }
            }
        }
    }

    Ok(ModelBuild::new(
        builder,
        first_stage,
        TimeBucketedVars { assignment, flow, same_source_pooling, same_dest_pooling },
    ))
}

/// `Σ x_{edge} − detour_var ≥ 0`, the shared shape of both detour-linking
/// constraint families (spec §4.6.1).
fn sum_minus(edge_vars: Vec<Var>, detour_var: Var) -> Vec<(Var, f64)> {
    let mut terms: Vec<_> = edge_vars.into_iter().map(|v| (v, 1.0)).collect();
    terms.push((detour_var, -1.0));
    terms
}

fn edge_vars(
    bucket_assignment: &BTreeMap<(usize, i64), BTreeMap<(usize, usize), Vec<Var>>>,
    scenario_index: usize,
    time_id: i64,
    edge: (usize, usize),
) -> Vec<Var> {
    bucket_assignment
        .get(&(scenario_index, time_id))
        .and_then(|bucket| bucket.get(&edge))
        .cloned()
        .unwrap_or_default()
}

/// Same-source pooling savings: `γ · max(0, R(j,l) − R(k,l))` (spec §4.6.1).
fn same_source_savings(
    problem: &ProblemData,
    triple: SameSourceTriple,
    weights: &ObjectiveWeights,
) -> Result<f64> {
    let id_j = problem.station_id(triple.j).expect("in range");
    let id_k = problem.station_id(triple.k).expect("in range");
    let id_l = problem.station_id(triple.l).expect("in range");
    let r_jl = problem.routing_cost(id_j, id_l)?;
    let r_kl = problem.routing_cost(id_k, id_l)?;
    Ok(weights.vehicle_routing_weight * (r_jl - r_kl).max(0.0))
}

/// Same-destination pooling savings: `γ · max(0, R(j,l) − R(j,k))` (spec §4.6.1).
fn same_dest_savings(
    problem: &ProblemData,
    quad: SameDestQuadruple,
    weights: &ObjectiveWeights,
) -> Result<f64> {
    let id_j = problem.station_id(quad.j).expect("in range");
    let id_k = problem.station_id(quad.k).expect("in range");
    let id_l = problem.station_id(quad.l).expect("in range");
    let r_jl = problem.routing_cost(id_j, id_l)?;
    let r_jk = problem.routing_cost(id_j, id_k)?;
    Ok(weights.vehicle_routing_weight * (r_jl - r_jk).max(0.0))
}
