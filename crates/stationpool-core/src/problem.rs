use crate::cost::CostMatrix;
use crate::error::{Error, Result};
use crate::request::Request;
use crate::scenario::{bucket_requests_into_scenarios, drop_empty_scenarios, Scenario};
use crate::station::{Station, StationTable};
use std::collections::HashMap;
use tracing::warn;

/// A raw request record as it arrives at the input-data boundary (spec
/// §6): ids plus an ISO-8601-ish request time string.
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub origin_id: i64,
    pub destination_id: i64,
    pub request_time: String,
}

/// A raw scenario window as it arrives at the input-data boundary.
#[derive(Debug, Clone)]
pub struct RawScenarioWindow {
    pub label: String,
    pub start: String,
    pub end: String,
}

/// Immutable problem data: the bundle every index-mapping builder and
/// model assembler is handed. Constructed once per batch and shared
/// (spec §5: "All problem-data and mapping structures are immutable
/// after construction and may be safely shared across a batch of
/// independently constructed models.").
#[derive(Debug, Clone)]
pub struct ProblemData {
    stations: StationTable,
    scenarios: Vec<Scenario>,
    original_scenario_index: Vec<usize>,
    walking_cost: CostMatrix,
    routing_cost: Option<CostMatrix>,
}

impl ProblemData {
    /// Builds problem data from the raw input-data-interface records
    /// (spec §6). `walking_cost`/`routing_cost` are pre-parsed maps keyed
    /// by `(from_id, to_id)`; `scenario_windows`, if empty, yields a
    /// single implicit scenario with no time window that absorbs every
    /// request.
    pub fn build(
        stations: Vec<Station>,
        raw_requests: Vec<RawRequest>,
        walking_cost: HashMap<(i64, i64), f64>,
        routing_cost: Option<HashMap<(i64, i64), f64>>,
        scenario_windows: Vec<RawScenarioWindow>,
    ) -> Result<Self> {
        let station_table = StationTable::new(stations);

        let mut requests = Vec::with_capacity(raw_requests.len());
        for raw in raw_requests {
            if station_table.index_of(raw.origin_id).is_none() {
                return Err(Error::MalformedRequest {
                    reason: format!("unknown origin station id {}", raw.origin_id),
                });
            }
            if station_table.index_of(raw.destination_id).is_none() {
                return Err(Error::MalformedRequest {
                    reason: format!("unknown destination station id {}", raw.destination_id),
                });
            }
            let request_time = Request::parse_time(&raw.request_time)?;
            requests.push(Request::new(raw.origin_id, raw.destination_id, request_time));
        }

        let scenario_shells: Vec<Scenario> = if scenario_windows.is_empty() {
            vec![Scenario::new("all", None)]
        } else {
            let mut shells = Vec::with_capacity(scenario_windows.len());
            for window in scenario_windows {
                let start = Request::parse_time(&window.start)?;
                let end = Request::parse_time(&window.end)?;
                shells.push(Scenario::new(window.label, Some((start, end))));
            }
            shells
        };

        let bucketed = bucket_requests_into_scenarios(scenario_shells, &requests);
        let (scenarios, original_scenario_index) = drop_empty_scenarios(bucketed);

        let walking_cost = CostMatrix::new("walking_cost", walking_cost);
        let routing_cost = routing_cost.map(|m| CostMatrix::new("routing_cost", m));

        if let Some(routing) = &routing_cost {
            let ids: Vec<i64> = station_table.stations().iter().map(|s| s.id).collect();
            for (a, b, c) in routing.triangle_violations(&ids) {
                warn!(
                    a, b, c,
                    "routing_cost triangle inequality violated: treating as data, not an error"
                );
            }
        }

        Ok(Self {
            stations: station_table,
            scenarios,
            original_scenario_index,
            walking_cost,
            routing_cost,
        })
    }

    pub fn station_count(&self) -> usize {
        self.stations.station_count()
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn scenario(&self, scenario_index: usize) -> Option<&Scenario> {
        if scenario_index == 0 {
            return None;
        }
        self.scenarios.get(scenario_index - 1)
    }

    /// The caller-facing index (before empty scenarios were dropped) of
    /// the scenario currently at 1-based `scenario_index`.
    pub fn original_scenario_index(&self, scenario_index: usize) -> Option<usize> {
        if scenario_index == 0 {
            return None;
        }
        self.original_scenario_index.get(scenario_index - 1).copied()
    }

    pub fn station_id(&self, index: usize) -> Option<i64> {
        self.stations.id_of(index)
    }

    pub fn station_index(&self, id: i64) -> Option<usize> {
        self.stations.index_of(id)
    }

    pub fn station_indices(&self) -> std::ops::RangeInclusive<usize> {
        self.stations.indices()
    }

    pub fn walking_cost(&self, from_id: i64, to_id: i64) -> Result<f64> {
        self.walking_cost.get(from_id, to_id)
    }

    pub fn has_routing_costs(&self) -> bool {
        self.routing_cost.is_some()
    }

    pub fn routing_cost(&self, from_id: i64, to_id: i64) -> Result<f64> {
        self.routing_cost
            .as_ref()
            .ok_or(Error::RoutingUnavailable {
                operation: "routing_cost",
            })?
            .get(from_id, to_id)
    }

    pub fn routing_matrix(&self) -> Result<&CostMatrix> {
        self.routing_cost
            .as_ref()
            .ok_or(Error::RoutingUnavailable {
                operation: "routing_matrix",
            })
    }

    pub fn walking_matrix(&self) -> &CostMatrix {
        &self.walking_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations() -> Vec<Station> {
        vec![
            Station { id: 1, lon: 0.0, lat: 0.0 },
            Station { id: 2, lon: 0.0, lat: 0.0 },
            Station { id: 3, lon: 0.0, lat: 0.0 },
        ]
    }

    fn full_walking_matrix(ids: &[i64]) -> HashMap<(i64, i64), f64> {
        let mut m = HashMap::new();
        for &a in ids {
            for &b in ids {
                m.insert((a, b), if a == b { 0.0 } else { 1.0 });
            }
        }
        m
    }

    #[test]
    fn rejects_request_with_unknown_station() {
        let result = ProblemData::build(
            stations(),
            vec![RawRequest {
                origin_id: 999,
                destination_id: 2,
                request_time: "2025-06-01 08:00:00".into(),
            }],
            full_walking_matrix(&[1, 2, 3]),
            None,
            vec![],
        );
        assert!(matches!(result, Err(Error::MalformedRequest { .. })));
    }

    #[test]
    fn routing_unavailable_when_absent() {
        let data = ProblemData::build(
            stations(),
            vec![],
            full_walking_matrix(&[1, 2, 3]),
            None,
            vec![],
        )
        .unwrap();
        assert!(!data.has_routing_costs());
        assert!(matches!(
            data.routing_cost(1, 2),
            Err(Error::RoutingUnavailable { .. })
        ));
    }

    #[test]
    fn implicit_scenario_absorbs_all_requests_when_no_windows_given() {
        let data = ProblemData::build(
            stations(),
            vec![RawRequest {
                origin_id: 1,
                destination_id: 2,
                request_time: "2025-06-01 08:00:00".into(),
            }],
            full_walking_matrix(&[1, 2, 3]),
            None,
            vec![],
        )
        .unwrap();
        assert_eq!(data.scenario_count(), 1);
        assert_eq!(data.scenario(1).unwrap().requests.len(), 1);
    }

    #[test]
    fn empty_scenario_is_dropped_and_original_index_is_visible() {
        let data = ProblemData::build(
            stations(),
            vec![RawRequest {
                origin_id: 1,
                destination_id: 2,
                request_time: "2025-06-01 08:00:00".into(),
            }],
            full_walking_matrix(&[1, 2, 3]),
            None,
            vec![
                RawScenarioWindow {
                    label: "morning".into(),
                    start: "2025-06-01 00:00:00".into(),
                    end: "2025-06-01 11:59:59".into(),
                },
                RawScenarioWindow {
                    label: "evening".into(),
                    start: "2025-06-01 18:00:00".into(),
                    end: "2025-06-01 23:59:59".into(),
                },
            ],
        )
        .unwrap();
        assert_eq!(data.scenario_count(), 1);
        assert_eq!(data.scenario(1).unwrap().label, "morning");
        assert_eq!(data.original_scenario_index(1), Some(0));
    }

    #[test]
    fn station_bijection_accessors() {
        let data = ProblemData::build(
            stations(),
            vec![],
            full_walking_matrix(&[1, 2, 3]),
            None,
            vec![],
        )
        .unwrap();
        assert_eq!(data.station_count(), 3);
        assert_eq!(data.station_index(2), Some(2));
        assert_eq!(data.station_id(2), Some(2));
    }
}
