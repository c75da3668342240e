use crate::build_result::ModelBuild;
use crate::config::{BuildConfig, ObjectiveWeights};
use crate::error::Result;
use stationpool_core::solver::{SolverEnv, Var};
use stationpool_core::ProblemData;
use stationpool_index::{AggregatedDemand, FeasiblePairTable, OdPair};
use std::collections::BTreeMap;

/// Assignment variables for the aggregated OD clustering model (spec
/// §4.6.2): `x_{s,(o,d),j,k}`, time collapsed, unique-assignment and
/// tight activation constraints only.
#[derive(Debug, Clone, Default)]
pub struct AggregatedVars {
    pub assignment: BTreeMap<(usize, OdPair, usize, usize), Var>,
}

impl AggregatedVars {
    pub fn assignment_var(
        &self,
        scenario_index: usize,
        od: OdPair,
        j: usize,
        k: usize,
    ) -> Option<Var> {
        self.assignment.get(&(scenario_index, od, j, k)).copied()
    }
}

pub fn build(
    env: &SolverEnv,
    problem: &ProblemData,
    demand: &AggregatedDemand,
    feasible: Option<&FeasiblePairTable>,
    build_config: &BuildConfig,
    weights: &ObjectiveWeights,
) -> Result<ModelBuild<AggregatedVars>> {
    let mut builder = env.builder();
    let first_stage = crate::assembler::add_first_stage(&mut builder, problem, build_config);
    let n = problem.station_count();

    let mut assignment = BTreeMap::new();
    for scenario_index in 1..=problem.scenario_count() {
        for od in demand.od_pairs(scenario_index) {
            let count = demand.count(scenario_index, od);
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
                assignment.insert((scenario_index, od, j, k), var);
                vars_for_od.push((var, j, k));
            }

            let terms: Vec<_> = vars_for_od.iter().map(|(v, _, _)| (*v, 1.0)).collect();
            builder.add_eq("unique_assignment", &terms, 1.0);

            for (var, j, k) in vars_for_od {
                let z_j = first_stage
                    .active_var(j, scenario_index)
                    .expect("station/scenario in range");
                let z_k = first_stage
                    .active_var(k, scenario_index)
                    .expect("station/scenario in range");
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
    }

    Ok(ModelBuild::new(
        builder,
        first_stage,
        AggregatedVars { assignment },
    ))
}
