use crate::aggregated::AggregatedDemand;
use crate::cluster::Clustering;
use std::collections::BTreeMap;
use stationpool_core::ProblemData;

/// An ordered pair of cluster labels `(a, b)`, including self-pairs
/// `a = a` (spec §3 "All C² ordered pairs ... exist").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Corridor {
    pub from_label: usize,
    pub to_label: usize,
}

/// All `C²` corridors with their inter-medoid routing cost, plus the
/// aggregated demand routed through each corridor per scenario.
#[derive(Debug, Clone, Default)]
pub struct CorridorIndex {
    cost: BTreeMap<Corridor, f64>,
    demand: BTreeMap<usize, BTreeMap<Corridor, u32>>,
}

impl CorridorIndex {
    pub fn build(
        problem: &ProblemData,
        clustering: &Clustering,
        aggregated: &AggregatedDemand,
    ) -> stationpool_core::Result<Self> {
        let labels = clustering.labels();
        let mut cost: BTreeMap<Corridor, f64> = BTreeMap::new();
        for &a in &labels {
            let medoid_a = clustering.medoid_of(a).expect("label exists");
            let id_a = problem.station_id(medoid_a).expect("in range");
            for &b in &labels {
                let medoid_b = clustering.medoid_of(b).expect("label exists");
                let id_b = problem.station_id(medoid_b).expect("in range");
                cost.insert(
                    Corridor { from_label: a, to_label: b },
                    problem.routing_cost(id_a, id_b)?,
                );
            }
        }

        let mut demand: BTreeMap<usize, BTreeMap<Corridor, u32>> = BTreeMap::new();
        for scenario_index in 1..=problem.scenario_count() {
            let mut corridors: BTreeMap<Corridor, u32> = BTreeMap::new();
            for (origin_id, destination_id) in aggregated.od_pairs(scenario_index) {
                let origin_index = problem.station_index(origin_id).ok_or(
                    stationpool_core::Error::MalformedRequest {
                        reason: format!("unknown origin station id {origin_id}"),
                    },
                )?;
                let destination_index = problem.station_index(destination_id).ok_or(
                    stationpool_core::Error::MalformedRequest {
                        reason: format!("unknown destination station id {destination_id}"),
                    },
                )?;
                let from_label = clustering.label_of(origin_index).ok_or(
                    stationpool_core::Error::MalformedRequest {
                        reason: format!("station index {origin_index} has no cluster label"),
                    },
                )?;
                let to_label = clustering.label_of(destination_index).ok_or(
                    stationpool_core::Error::MalformedRequest {
                        reason: format!("station index {destination_index} has no cluster label"),
                    },
                )?;
                let count = aggregated.count(scenario_index, (origin_id, destination_id));
                *corridors
                    .entry(Corridor { from_label, to_label })
                    .or_insert(0) += count;
            }
            demand.insert(scenario_index, corridors);
        }
        Ok(Self { cost, demand })
    }

    /// Every corridor, `C²` of them, in `(from_label, to_label)` order.
    pub fn corridors(&self) -> Vec<Corridor> {
        self.cost.keys().copied().collect()
    }

    pub fn cost(&self, corridor: Corridor) -> f64 {
        self.cost.get(&corridor).copied().unwrap_or(0.0)
    }

    pub fn demand(&self, scenario_index: usize, corridor: Corridor) -> u32 {
        self.demand
            .get(&scenario_index)
            .and_then(|corridors| corridors.get(&corridor))
            .copied()
            .unwrap_or(0)
    }
}
