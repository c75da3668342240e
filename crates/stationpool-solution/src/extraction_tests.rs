#[cfg(test)]
mod tests {
    use crate::extract;
    use stationpool_core::solver::{Sense, SolverConfig, SolverEnv, TerminationStatus};
    use stationpool_core::{ProblemData, RawRequest, Station};
    use stationpool_index::AggregatedDemand;
    use stationpool_model::config::{BuildConfig, ObjectiveWeights};
    use stationpool_model::variant::aggregated;
    use std::collections::HashMap;

    #[test]
    #[ignore]
    fn n2_single_request_extracts_one_assignment() {
        let stations = vec![
            Station { id: 1, lon: 0.0, lat: 0.0 },
            Station { id: 2, lon: 1.0, lat: 0.0 },
        ];
        let mut walking = HashMap::new();
        walking.insert((1, 1), 0.0);
        walking.insert((1, 2), 5.0);
        walking.insert((2, 1), 10.0);
        walking.insert((2, 2), 0.0);
        let requests = vec![RawRequest {
            origin_id: 1,
            destination_id: 2,
            request_time: "2025-06-01 08:00:00".into(),
        }];
        let problem = ProblemData::build(stations, requests, walking, None, vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);

        let env = SolverEnv::new(SolverConfig::new(Some(5.0)));
        let build_config = BuildConfig::new(1, true, 1).unwrap();
        let weights = ObjectiveWeights::new(0.0, 0.0, 0.0, 0.0).unwrap();
        let build = aggregated::build(&env, &problem, &demand, None, &build_config, &weights).unwrap();
        let solved = build.solve(Sense::Minimise, &env);
        assert_eq!(solved.outcome.status, TerminationStatus::Optimal);

        let selection = extract::station_selection(&problem, &solved.outcome, &solved.first_stage);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].station_id, 2);

        let assignments = extract::aggregated_assignments(&problem, &solved.outcome, &solved.variant);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].pickup_id, 2);
        assert_eq!(assignments[0].dropoff_id, 2);
        assert!((solved.outcome.objective_value.unwrap() - 5.0).abs() < 1e-3);
    }
}
