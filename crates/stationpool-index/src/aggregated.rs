use crate::od::OdPair;
use std::collections::BTreeMap;
use stationpool_core::ProblemData;

/// Aggregated (time-collapsed) OD demand, `Ω[s]`/`Q[s][(o,d)]` of spec
/// §3, used by the clustering, corridor and transportation variants.
#[derive(Debug, Clone, Default)]
pub struct AggregatedDemand {
    table: BTreeMap<usize, BTreeMap<OdPair, u32>>,
}

impl AggregatedDemand {
    pub fn build(problem: &ProblemData) -> Self {
        let mut table: BTreeMap<usize, BTreeMap<OdPair, u32>> = BTreeMap::new();
        for scenario_index in 1..=problem.scenario_count() {
            let scenario = problem.scenario(scenario_index).expect("in range");
            let mut ods: BTreeMap<OdPair, u32> = BTreeMap::new();
            for request in &scenario.requests {
                let od = (request.origin_id, request.destination_id);
                *ods.entry(od).or_insert(0) += 1;
            }
            table.insert(scenario_index, ods);
        }
        Self { table }
    }

    pub fn od_pairs(&self, scenario_index: usize) -> Vec<OdPair> {
        self.table
            .get(&scenario_index)
            .map(|ods| ods.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn count(&self, scenario_index: usize, od: OdPair) -> u32 {
        self.table
            .get(&scenario_index)
            .and_then(|ods| ods.get(&od))
            .copied()
            .unwrap_or(0)
    }

    /// All distinct OD pairs across every scenario, sorted — used to seed
    /// feasible-pair precomputation once per build.
    pub fn all_od_pairs(&self) -> Vec<OdPair> {
        let mut all: Vec<OdPair> = self
            .table
            .values()
            .flat_map(|ods| ods.keys().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stationpool_core::{RawRequest, Station};

    #[test]
    fn aggregates_across_time() {
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
        let requests = vec![
            RawRequest {
                origin_id: 1,
                destination_id: 2,
                request_time: "2025-06-01 00:00:00".into(),
            },
            RawRequest {
                origin_id: 1,
                destination_id: 2,
                request_time: "2025-06-01 09:00:00".into(),
            },
        ];
        let problem = ProblemData::build(stations, requests, walking, None, vec![]).unwrap();
        let demand = AggregatedDemand::build(&problem);
        assert_eq!(demand.count(1, (1, 2)), 2);
        assert_eq!(demand.od_pairs(1), vec![(1, 2)]);
        assert_eq!(demand.all_od_pairs(), vec![(1, 2)]);
    }
}
