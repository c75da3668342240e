//! Boundary scenarios from spec §8, encoded as solver-backed tests.
//! These call into HiGHS and are marked `#[ignore]` — run explicitly
//! with `cargo test -- --ignored` where a solver is available.

#[cfg(test)]
mod tests {
    use crate::config::{BuildConfig, ObjectiveWeights};
    use crate::variant::aggregated;
    use crate::variant::corridor::{self, CorridorCoupling};
    use crate::variant::{time_bucketed, transportation};
    use stationpool_core::solver::{Sense, SolverConfig, SolverEnv, TerminationStatus};
    use stationpool_core::{ProblemData, RawRequest, RawScenarioWindow};
    use stationpool_index::{AggregatedDemand, AnchorIndex, ClusterMode, Clustering, CorridorIndex, TimeBucketedDemand};
    use std::collections::HashMap;

    fn env() -> SolverEnv {
        SolverEnv::new(SolverConfig::new(Some(5.0)))
    }

    fn weights(alpha: f64, gamma: f64, corridor: f64, activation: f64) -> ObjectiveWeights {
        ObjectiveWeights::new(alpha, gamma, corridor, activation).unwrap()
    }

    #[test]
    #[ignore]
    fn n1_self_loop_objective_is_double_walking_plus_alpha_routing() {
        let stations = vec![stationpool_core::Station { id: 1, lon: 0.0, lat: 0.0 }];
        let mut walking = HashMap::new();
        walking.insert((1, 1), 5.0);
        let mut routing = HashMap::new();
        routing.insert((1, 1), 3.0);

        let requests = vec![RawRequest {
            origin_id: 1,
            destination_id: 1,
            request_time: "2025-06-01 08:00:00".into(),
        }];
        let problem =
            ProblemData::build(stations, requests, walking, Some(routing), vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);
        let env = env();
        let build_config = BuildConfig::new(1, true, 1).unwrap();
        let w = weights(1.0, 0.0, 0.0, 0.0);

        let build = aggregated::build(&env, &problem, &demand, None, &build_config, &w).unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);
        // walking(1,1) + walking(1,1) + alpha * routing(1,1) = 5 + 5 + 1*3
        assert!((solved.outcome.objective_value.unwrap() - 13.0).abs() < 1e-3);

        let active: Vec<_> = solved
            .variant
            .assignment
            .iter()
            .filter(|(_, &var)| solved.outcome.is_binary_true(var))
            .map(|(&(_, od, j, k), _)| (od, j, k))
            .collect();
        assert_eq!(active, vec![((1, 1), 1, 1)]);
    }

    #[test]
    #[ignore]
    fn n3_linear_selects_two_and_three() {
        let stations = vec![
            stationpool_core::Station { id: 1, lon: 0.0, lat: 0.0 },
            stationpool_core::Station { id: 2, lon: 1.0, lat: 0.0 },
            stationpool_core::Station { id: 3, lon: 2.0, lat: 0.0 },
        ];
        let mut walking = HashMap::new();
        for a in [1, 2, 3] {
            for b in [1, 2, 3] {
                walking.insert((a, b), if a == b { 0.0 } else { 100.0 });
            }
        }
        walking.insert((1, 2), 1.0);
        walking.insert((2, 3), 1.0);

        let mut routing = HashMap::new();
        for a in [1, 2, 3] {
            for b in [1, 2, 3] {
                routing.insert((a, b), if a == b { 0.0 } else { 1000.0 });
            }
        }
        routing.insert((2, 3), 0.1);
        routing.insert((3, 2), 0.1);

        let requests = vec![RawRequest {
            origin_id: 1,
            destination_id: 3,
            request_time: "2025-06-01 08:00:00".into(),
        }];
        let problem =
            ProblemData::build(stations, requests, walking, Some(routing), vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);
        let env = env();
        let build_config = BuildConfig::new(2, true, 2).unwrap();
        let w = weights(1.0, 100.0, 0.0, 0.0);

        let build = aggregated::build(&env, &problem, &demand, None, &build_config, &w).unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);
        assert!((solved.outcome.objective_value.unwrap() - 11.0).abs() < 1e-3);
    }

    #[test]
    #[ignore]
    fn n4_anchors_objective_matches_spec() {
        let stations = vec![
            stationpool_core::Station { id: 1, lon: 0.0, lat: 0.0 },
            stationpool_core::Station { id: 2, lon: 1.0, lat: 0.0 },
            stationpool_core::Station { id: 3, lon: 2.0, lat: 0.0 },
            stationpool_core::Station { id: 4, lon: 3.0, lat: 0.0 },
        ];
        let mut walking = HashMap::new();
        for a in 1..=4 {
            for b in 1..=4 {
                walking.insert((a, b), if a == b { 0.0 } else { 1000.0 });
            }
        }
        walking.insert((1, 2), 2.0);
        walking.insert((3, 1), 1000.0);
        walking.insert((3, 4), 10.0);

        let mut routing = HashMap::new();
        for a in 1..=4 {
            for b in 1..=4 {
                routing.insert((a, b), if a == b { 0.0 } else { 1000.0 });
            }
        }
        routing.insert((2, 3), 0.1);
        routing.insert((3, 2), 0.1);

        let requests = vec![
            RawRequest { origin_id: 1, destination_id: 3, request_time: "2025-06-01 08:00:00".into() },
            RawRequest { origin_id: 2, destination_id: 4, request_time: "2025-06-01 08:05:00".into() },
        ];
        let problem =
            ProblemData::build(stations, requests, walking, Some(routing), vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);

        let env = env();
        let clustering = Clustering::solve(&problem, ClusterMode::FixedCount(2), &env).unwrap();
        let anchors = AnchorIndex::build(&problem, &clustering, &demand).unwrap();

        let build_config = BuildConfig::new(2, true, 2).unwrap();
        let w = weights(1.0, 100.0, 0.0, 0.0);
        let build = transportation::build(&env, &problem, &anchors, &build_config, &w).unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);
        assert!((solved.outcome.objective_value.unwrap() - 32.0).abs() < 1e-2);
    }

    #[test]
    #[ignore]
    fn corridor_z_variant_activates_four_self_and_cross_corridors() {
        let stations: Vec<_> = (1..=4)
            .map(|id| stationpool_core::Station { id, lon: id as f64, lat: 0.0 })
            .collect();
        let mut walking = HashMap::new();
        for a in 1..=4 {
            for b in 1..=4 {
                walking.insert((a, b), if a == b { 0.0 } else { 1.0 });
            }
        }
        let mut routing = HashMap::new();
        for a in 1i64..=4 {
            for b in 1i64..=4 {
                routing.insert((a, b), ((a - b).abs() * 1000) as f64);
            }
        }
        let requests = vec![RawRequest {
            origin_id: 1,
            destination_id: 3,
            request_time: "2025-06-01 08:00:00".into(),
        }];
        let problem =
            ProblemData::build(stations, requests, walking, Some(routing), vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);

        let env = env();
        let clustering = Clustering::solve(&problem, ClusterMode::FixedCount(4), &env).unwrap();
        let corridors = CorridorIndex::build(&problem, &clustering, &demand).unwrap();

        let build_config = BuildConfig::new(2, true, 2).unwrap();
        let w = weights(0.0, 0.0, 0.001, 0.0);
        let build = corridor::build(
            &env,
            &problem,
            &demand,
            &clustering,
            &corridors,
            None,
            CorridorCoupling::ZoneActivation,
            &build_config,
            &w,
        )
        .unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);
        assert!((solved.outcome.objective_value.unwrap() - 4.002).abs() < 1e-3);

        let active_corridors: Vec<_> = solved
            .variant
            .corridor_used
            .iter()
            .filter(|(_, &var)| solved.outcome.is_binary_true(var))
            .map(|(&(_, corridor), _)| (corridor.from_label, corridor.to_label))
            .collect();
        assert_eq!(active_corridors.len(), 4);
        for pair in [(1, 1), (3, 3), (1, 3), (3, 1)] {
            assert!(active_corridors.contains(&pair), "missing corridor {pair:?}");
        }
    }

    #[test]
    #[ignore]
    fn corridor_x_variant_activates_one_cross_corridor() {
        let stations: Vec<_> = (1..=4)
            .map(|id| stationpool_core::Station { id, lon: id as f64, lat: 0.0 })
            .collect();
        let mut walking = HashMap::new();
        for a in 1..=4 {
            for b in 1..=4 {
                walking.insert((a, b), if a == b { 0.0 } else { 1.0 });
            }
        }
        let mut routing = HashMap::new();
        for a in 1i64..=4 {
            for b in 1i64..=4 {
                routing.insert((a, b), ((a - b).abs() * 1000) as f64);
            }
        }
        let requests = vec![RawRequest {
            origin_id: 1,
            destination_id: 3,
            request_time: "2025-06-01 08:00:00".into(),
        }];
        let problem =
            ProblemData::build(stations, requests, walking, Some(routing), vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);

        let env = env();
        let clustering = Clustering::solve(&problem, ClusterMode::FixedCount(4), &env).unwrap();
        let corridors = CorridorIndex::build(&problem, &clustering, &demand).unwrap();

        let build_config = BuildConfig::new(2, true, 2).unwrap();
        let w = weights(0.0, 0.0, 0.001, 0.0);
        let build = corridor::build(
            &env,
            &problem,
            &demand,
            &clustering,
            &corridors,
            None,
            CorridorCoupling::Assignment,
            &build_config,
            &w,
        )
        .unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);
        assert!((solved.outcome.objective_value.unwrap() - 2.0).abs() < 1e-3);

        let active_corridors: Vec<_> = solved
            .variant
            .corridor_used
            .iter()
            .filter(|(_, &var)| solved.outcome.is_binary_true(var))
            .map(|(&(_, corridor), _)| (corridor.from_label, corridor.to_label))
            .collect();
        assert_eq!(active_corridors, vec![(1, 3)]);
    }

    #[test]
    #[ignore]
    fn time_bucketed_single_bucket_matches_flow_plus_walking() {
        let stations = vec![
            stationpool_core::Station { id: 1, lon: 0.0, lat: 0.0 },
            stationpool_core::Station { id: 2, lon: 1.0, lat: 0.0 },
            stationpool_core::Station { id: 3, lon: 2.0, lat: 0.0 },
        ];
        let mut walking = HashMap::new();
        for a in [1, 2, 3] {
            for b in [1, 2, 3] {
                walking.insert((a, b), if a == b { 0.0 } else { 100.0 });
            }
        }
        walking.insert((1, 2), 1.0);
        walking.insert((2, 3), 1.0);

        let mut routing = HashMap::new();
        for a in [1, 2, 3] {
            for b in [1, 2, 3] {
                routing.insert((a, b), if a == b { 0.0 } else { 1000.0 });
            }
        }
        routing.insert((2, 3), 0.1);
        routing.insert((3, 2), 0.1);

        let requests = vec![RawRequest {
            origin_id: 1,
            destination_id: 3,
            request_time: "2025-06-01 08:00:00".into(),
        }];
        let scenario_windows = vec![RawScenarioWindow {
            label: "morning".into(),
            start: "2025-06-01 07:00:00".into(),
            end: "2025-06-01 10:00:00".into(),
        }];
        let problem = ProblemData::build(
            stations,
            requests,
            walking,
            Some(routing),
            scenario_windows,
        )
        .unwrap();
        let demand = TimeBucketedDemand::build(&problem, 3600).unwrap();

        let env = env();
        let build_config = BuildConfig::new(2, true, 2).unwrap();
        let w = weights(0.0, 100.0, 0.0, 0.0);

        let build =
            time_bucketed::build(&env, &problem, &demand, None, None, &build_config, &w).unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);
        assert!((solved.outcome.objective_value.unwrap() - 11.0).abs() < 1e-3);

        let active_flows: Vec<_> = solved
            .variant
            .flow
            .iter()
            .filter(|(_, &var)| solved.outcome.is_binary_true(var))
            .map(|(&(_, _, j, k), _)| (j, k))
            .collect();
        assert_eq!(active_flows, vec![(2, 3)]);
    }
}
