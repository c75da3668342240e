use crate::error::{Error, Result};
use std::collections::BTreeMap;
use stationpool_core::solver::{Sense, SolverEnv, TerminationStatus};
use stationpool_core::ProblemData;

/// How many clusters to produce (spec §4.4): either a fixed medoid count,
/// minimizing total assignment distance, or a diameter bound, minimizing
/// the medoid count itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterMode {
    FixedCount(usize),
    DiameterBound(f64),
}

/// Exact k-medoid clustering of station indices, expressed as the small
/// MILP of spec §4.4 and solved by the same external solver the model
/// variants use (spec §1 non-goal: no heuristic meta-solver).
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Station index (1-based) -> cluster label (ascending rank among
    /// selected medoids' station indices, spec §4.4 "enumerating selected
    /// medoids in ascending station-index order").
    assignment: BTreeMap<usize, usize>,
    /// Cluster label (1-based) -> medoid station index.
    medoids: BTreeMap<usize, usize>,
}

impl Clustering {
    pub fn solve(problem: &ProblemData, mode: ClusterMode, env: &SolverEnv) -> Result<Self> {
        let n = problem.station_count();
        match mode {
            ClusterMode::FixedCount(k) if k == 0 || k > n => {
                return Err(Error::InvalidParameter(format!(
                    "cluster count must be in 1..={n}, got {k}"
                )));
            }
            ClusterMode::DiameterBound(d) if d < 0.0 => {
                return Err(Error::InvalidParameter(
                    "diameter bound must be non-negative".into(),
                ));
            }
            _ => {}
        }

        let mut routing = vec![vec![0.0; n + 1]; n + 1];
        for i in 1..=n {
            let id_i = problem.station_id(i).expect("in range");
            for j in 1..=n {
                let id_j = problem.station_id(j).expect("in range");
                routing[i][j] = problem.routing_cost(id_i, id_j)?;
            }
        }

        let mut builder = env.builder();
        let mut medoid_var = BTreeMap::new();
        for j in 1..=n {
            let medoid_cost = match mode {
                ClusterMode::FixedCount(_) => 0.0,
                ClusterMode::DiameterBound(_) => 1.0,
            };
            medoid_var.insert(j, builder.add_binary("medoid_open", medoid_cost));
        }
        let mut assign_var = BTreeMap::new();
        for i in 1..=n {
            for j in 1..=n {
                let cost = match mode {
                    ClusterMode::FixedCount(_) => routing[i][j],
                    ClusterMode::DiameterBound(_) => 0.0,
                };
                assign_var.insert((i, j), builder.add_binary("assignment", cost));
            }
        }

        for i in 1..=n {
            let terms: Vec<_> = (1..=n).map(|j| (assign_var[&(i, j)], 1.0)).collect();
            builder.add_eq("assignment_coverage", &terms, 1.0);
        }
        for i in 1..=n {
            for j in 1..=n {
                builder.add_le(
                    "assignment_requires_open_medoid",
                    &[(assign_var[&(i, j)], 1.0), (medoid_var[&j], -1.0)],
                    0.0,
                );
            }
        }
        for j in 1..=n {
            builder.add_ge(
                "medoid_self_assigned",
                &[(assign_var[&(j, j)], 1.0), (medoid_var[&j], -1.0)],
                0.0,
            );
        }

        match mode {
            ClusterMode::FixedCount(k) => {
                let terms: Vec<_> = (1..=n).map(|j| (medoid_var[&j], 1.0)).collect();
                builder.add_eq("medoid_count", &terms, k as f64);
            }
            ClusterMode::DiameterBound(d) => {
                for i1 in 1..=n {
                    for i2 in (i1 + 1)..=n {
                        if routing[i1][i2] > d {
                            for j in 1..=n {
                                builder.add_le(
                                    "diameter_bound",
                                    &[(assign_var[&(i1, j)], 1.0), (assign_var[&(i2, j)], 1.0)],
                                    1.0,
                                );
                            }
                        }
                    }
                }
            }
        }

        let outcome = builder.solve(Sense::Minimise, env);
        match outcome.status {
            TerminationStatus::Optimal | TerminationStatus::TimeLimit => {}
            other => {
                return Err(Error::InvalidParameter(format!(
                    "clustering MILP did not reach a usable solution: {other:?}"
                )))
            }
        }

        let mut selected_medoids: Vec<usize> = (1..=n)
            .filter(|j| outcome.is_binary_true(medoid_var[j]))
            .collect();
        selected_medoids.sort_unstable();

        let mut labels: BTreeMap<usize, usize> = BTreeMap::new();
        let mut medoids: BTreeMap<usize, usize> = BTreeMap::new();
        for (rank, &station_index) in selected_medoids.iter().enumerate() {
            let label = rank + 1;
            labels.insert(station_index, label);
            medoids.insert(label, station_index);
        }

        let mut assignment = BTreeMap::new();
        for i in 1..=n {
            for j in 1..=n {
                if outcome.is_binary_true(assign_var[&(i, j)]) {
                    if let Some(&label) = labels.get(&j) {
                        assignment.insert(i, label);
                    }
                }
            }
        }

        Ok(Self { assignment, medoids })
    }

    pub fn label_of(&self, station_index: usize) -> Option<usize> {
        self.assignment.get(&station_index).copied()
    }

    pub fn medoid_of(&self, label: usize) -> Option<usize> {
        self.medoids.get(&label).copied()
    }

    pub fn labels(&self) -> Vec<usize> {
        self.medoids.keys().copied().collect()
    }

    pub fn cluster_count(&self) -> usize {
        self.medoids.len()
    }
}

/// Test-only escape hatch for building a [`Clustering`] without running
/// the MILP, used by other modules' tests that need a fixed clustering.
#[cfg(test)]
pub(crate) mod test_support {
    use super::Clustering;
    use std::collections::BTreeMap;

    pub fn from_parts(assignment: BTreeMap<usize, usize>, medoids: BTreeMap<usize, usize>) -> Clustering {
        Clustering { assignment, medoids }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stationpool_core::solver::{SolverConfig, SolverEnv};
    use stationpool_core::Station;

    fn two_pair_problem() -> ProblemData {
        let stations = vec![
            Station { id: 1, lon: 0.0, lat: 0.0 },
            Station { id: 2, lon: 0.1, lat: 0.0 },
            Station { id: 3, lon: 10.0, lat: 0.0 },
            Station { id: 4, lon: 10.1, lat: 0.0 },
        ];
        let mut routing = HashMap::new();
        let coords = [(1, 0.0), (2, 0.1), (3, 10.0), (4, 10.1)];
        for &(a, xa) in &coords {
            for &(b, xb) in &coords {
                routing.insert((a, b), (xa - xb).abs());
            }
        }
        let walking = routing.clone();
        ProblemData::build(stations, vec![], walking, Some(routing), vec![]).unwrap()
    }

    #[test]
    #[ignore]
    fn fixed_count_labels_are_ascending_by_station_index() {
        let problem = two_pair_problem();
        let env = SolverEnv::new(SolverConfig::new(Some(5.0)));
        let clustering = Clustering::solve(&problem, ClusterMode::FixedCount(2), &env).unwrap();
        assert_eq!(clustering.cluster_count(), 2);
        assert_eq!(clustering.label_of(1), clustering.label_of(2));
        assert_eq!(clustering.label_of(3), clustering.label_of(4));
        assert_ne!(clustering.label_of(1), clustering.label_of(3));
    }

    #[test]
    fn rejects_out_of_range_k() {
        let problem = two_pair_problem();
        let env = SolverEnv::new(SolverConfig::new(Some(5.0)));
        assert!(matches!(
            Clustering::solve(&problem, ClusterMode::FixedCount(0), &env),
            Err(Error::InvalidParameter(_))
        ));
    }
}
