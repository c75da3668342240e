use crate::build_result::ModelBuild;
use crate::config::{BuildConfig, ObjectiveWeights};
use crate::error::Result;
use stationpool_core::solver::{SolverEnv, Var};
use stationpool_core::ProblemData;
use stationpool_index::{AggregatedDemand, Clustering, Corridor, CorridorIndex, FeasiblePairTable, LabelMembers, OdPair};
use std::collections::BTreeMap;

/// How corridor usage is coupled to the underlying assignment/activation
/// variables (spec §4.6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorCoupling {
    /// `f^c_{g,s} ≥ α_{a,s} + α_{b,s} − 1` (self-corridor: `≥ α_{a,s}`).
    ZoneActivation,
    /// `f^c_{g,s} ≥ x_{s,(o,d),j,k}` for every assignment mapping into `g`.
    Assignment,
}

#[derive(Debug, Clone, Default)]
pub struct CorridorVars {
    pub assignment: BTreeMap<(usize, OdPair, usize, usize), Var>,
    pub zone_active: BTreeMap<(usize, usize), Var>,
    pub corridor_used: BTreeMap<(usize, Corridor), Var>,
}

#[allow(clippy::too_many_arguments)]
pub fn build(
    env: &SolverEnv,
    problem: &ProblemData,
    demand: &AggregatedDemand,
    clustering: &Clustering,
    corridors: &CorridorIndex,
    feasible: Option<&FeasiblePairTable>,
    coupling: CorridorCoupling,
    build_config: &BuildConfig,
    weights: &ObjectiveWeights,
) -> Result<ModelBuild<CorridorVars>> {
    let mut builder = env.builder();
    let first_stage = crate::assembler::add_first_stage(&mut builder, problem, build_config);
    let n = problem.station_count();
    let members = LabelMembers::from_clustering(clustering, n);

    let mut assignment: BTreeMap<(usize, OdPair, usize, usize), Var> = BTreeMap::new();
    let mut assignment_by_corridor: BTreeMap<(usize, Corridor), Vec<Var>> = BTreeMap::new();

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
                let cost = (count as f64) * (problem.walking_cost(od.0, id_j)? + problem.walking_cost(id_k, od.1)?);
                let var = builder.add_binary("assignment", cost);
                assignment.insert((scenario_index, od, j, k), var);
                vars_for_od.push((var, j, k));

                if coupling == CorridorCoupling::Assignment {
                    let from_label = clustering.label_of(j).expect("clustered");
                    let to_label = clustering.label_of(k).expect("clustered");
                    let corridor = Corridor { from_label, to_label };
                    assignment_by_corridor
                        .entry((scenario_index, corridor))
                        .or_default()
                        .push(var);
                }
            }

            let terms: Vec<_> = vars_for_od.iter().map(|(v, _, _)| (*v, 1.0)).collect();
            builder.add_eq("unique_assignment", &terms, 1.0);

            for (var, j, k) in vars_for_od {
                let z_j = first_stage.active_var(j, scenario_index).expect("in range");
                let z_k = first_stage.active_var(k, scenario_index).expect("in range");
                builder.add_le("activation_linking_x", &[(var, 1.0), (z_j, -1.0)], 0.0);
                builder.add_le("activation_linking_x", &[(var, 1.0), (z_k, -1.0)], 0.0);
            }
        }
    }

    let mut zone_active: BTreeMap<(usize, usize), Var> = BTreeMap::new();
    for scenario_index in 1..=problem.scenario_count() {
        for &label in &members.labels() {
            let var = builder.add_binary("zone_active", 0.0);
            zone_active.insert((scenario_index, label), var);
            let members_in_zone = members.stations_in(label);
            let terms: Vec<_> = members_in_zone
                .iter()
                .map(|&station_index| {
                    (
                        first_stage
                            .active_var(station_index, scenario_index)
                            .expect("in range"),
                        1.0,
                    )
                })
                .chain(std::iter::once((var, -(members_in_zone.len() as f64))))
                .collect();
            builder.add_le("zone_activation_coverage", &terms, 0.0);
        }
    }

    let mut corridor_used: BTreeMap<(usize, Corridor), Var> = BTreeMap::new();
    for scenario_index in 1..=problem.scenario_count() {
        for corridor in corridors.corridors() {
            let cost = weights.corridor_weight * corridors.cost(corridor);
            let var = builder.add_binary("corridor_used", cost);
            corridor_used.insert((scenario_index, corridor), var);

            match coupling {
                CorridorCoupling::ZoneActivation => {
                    let alpha_a = zone_active[&(scenario_index, corridor.from_label)];
                    if corridor.from_label == corridor.to_label {
                        builder.add_ge("corridor_self_activation", &[(var, 1.0), (alpha_a, -1.0)], 0.0);
                    } else {
                        let alpha_b = zone_active[&(scenario_index, corridor.to_label)];
                        builder.add_ge(
                            "corridor_cross_activation",
                            &[(var, 1.0), (alpha_a, -1.0), (alpha_b, -1.0)],
                            -1.0,
                        );
                    }
                }
                CorridorCoupling::Assignment => {
                    if let Some(xs) = assignment_by_corridor.get(&(scenario_index, corridor)) {
                        for &x_var in xs {
                            builder.add_ge("corridor_assignment_activation", &[(var, 1.0), (x_var, -1.0)], 0.0);
                        }
                    }
                }
            }
        }
    }

    Ok(ModelBuild::new(
        builder,
        first_stage,
        CorridorVars { assignment, zone_active, corridor_used },
    ))
}
