use crate::error::{Error, Result};
use crate::od::OdPair;
use std::collections::BTreeMap;
use stationpool_core::ProblemData;

/// Time-bucketed OD demand, `Ω[s][t]`/`Q[s][t][(o,d)]` of spec §3.
///
/// Keyed by 1-based scenario index. Within a scenario, time buckets and
/// the OD pairs inside each bucket are held in `BTreeMap`s so iteration
/// order is deterministic without a separate sort step (spec §5
/// ordering requirement).
#[derive(Debug, Clone, Default)]
pub struct TimeBucketedDemand {
    table: BTreeMap<usize, BTreeMap<i64, BTreeMap<OdPair, u32>>>,
}

impl TimeBucketedDemand {
    /// Builds the table for every retained scenario. Every scenario must
    /// have a start time (spec §7 `ScenarioStartRequired`).
    pub fn build(problem: &ProblemData, time_window_sec: i64) -> Result<Self> {
        if time_window_sec <= 0 {
            return Err(Error::InvalidParameter(
                "time_window_sec must be positive".into(),
            ));
        }

        let mut table: BTreeMap<usize, BTreeMap<i64, BTreeMap<OdPair, u32>>> = BTreeMap::new();
        for scenario_index in 1..=problem.scenario_count() {
            let scenario = problem.scenario(scenario_index).expect("in range");
            let start = scenario.start().ok_or_else(|| {
                stationpool_core::Error::ScenarioStartRequired {
                    label: scenario.label.clone(),
                }
            })?;

            let mut buckets: BTreeMap<i64, BTreeMap<OdPair, u32>> = BTreeMap::new();
            for request in &scenario.requests {
                let elapsed = (request.request_time - start).num_seconds();
                let time_id = elapsed.div_euclid(time_window_sec);
                let od = (request.origin_id, request.destination_id);
                *buckets.entry(time_id).or_default().entry(od).or_insert(0) += 1;
            }
            table.insert(scenario_index, buckets);
        }
        Ok(Self { table })
    }

    pub fn time_buckets(&self, scenario_index: usize) -> Vec<i64> {
        self.table
            .get(&scenario_index)
            .map(|buckets| buckets.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn od_pairs(&self, scenario_index: usize, time_id: i64) -> Vec<OdPair> {
        self.table
            .get(&scenario_index)
            .and_then(|buckets| buckets.get(&time_id))
            .map(|ods| ods.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn count(&self, scenario_index: usize, time_id: i64, od: OdPair) -> u32 {
        self.table
            .get(&scenario_index)
            .and_then(|buckets| buckets.get(&time_id))
            .and_then(|ods| ods.get(&od))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_bucket(&self, scenario_index: usize, time_id: i64) -> bool {
        self.table
            .get(&scenario_index)
            .map(|buckets| buckets.contains_key(&time_id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stationpool_core::{RawRequest, RawScenarioWindow, Station};

    fn problem_with_requests(requests: Vec<RawRequest>, window_sec: i64) -> ProblemData {
        let stations = vec![
            Station { id: 1, lon: 0.0, lat: 0.0 },
            Station { id: 2, lon: 0.0, lat: 0.0 },
        ];
        let mut walking = HashMap::new();
        for a in [1, 2] {
            for b in [1, 2] {
                walking.insert((a, b), 1.0);
            }
        }
        let _ = window_sec;
        ProblemData::build(
            stations,
            requests,
            walking,
            None,
            vec![RawScenarioWindow {
                label: "s1".into(),
                start: "2025-06-01 00:00:00".into(),
                end: "2025-06-01 23:59:59".into(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn buckets_requests_by_elapsed_seconds() {
        let problem = problem_with_requests(
            vec![
                RawRequest {
                    origin_id: 1,
                    destination_id: 2,
                    request_time: "2025-06-01 00:00:00".into(),
                },
                RawRequest {
                    origin_id: 1,
                    destination_id: 2,
                    request_time: "2025-06-01 00:00:30".into(),
                },
                RawRequest {
                    origin_id: 1,
                    destination_id: 2,
                    request_time: "2025-06-01 00:01:05".into(),
                },
            ],
            60,
        );
        let demand = TimeBucketedDemand::build(&problem, 60).unwrap();
        assert_eq!(demand.time_buckets(1), vec![0, 1]);
        assert_eq!(demand.count(1, 0, (1, 2)), 2);
        assert_eq!(demand.count(1, 1, (1, 2)), 1);
    }

    #[test]
    fn rejects_non_positive_window() {
        let problem = problem_with_requests(vec![], 60);
        assert!(matches!(
            TimeBucketedDemand::build(&problem, 0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
