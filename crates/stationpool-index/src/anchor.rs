use crate::aggregated::AggregatedDemand;
use crate::cluster::Clustering;
use crate::mapping::LabelMembers;
use std::collections::BTreeMap;
use stationpool_core::ProblemData;

/// An active ordered zone-pair carrying at least one trip in at least one
/// scenario (spec §3 "Anchor"). Unlike [`crate::corridor::Corridor`],
/// which enumerates every `C²` ordered pair including self-pairs whether
/// or not they carry demand, an anchor only exists when active — but,
/// like a corridor, a self-pair `(a,a)` is a perfectly valid anchor when
/// an OD pair's origin and destination cluster to the same medoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Anchor {
    pub from_label: usize,
    pub to_label: usize,
}

#[derive(Debug, Clone, Default)]
struct ScenarioAnchorDemand {
    pickup_counts: BTreeMap<i64, u32>,
    dropoff_counts: BTreeMap<i64, u32>,
    trip_count: u32,
}

/// Per-anchor, per-scenario pickup/drop-off id demand and the allowed
/// `(pickup-index, drop-off-index)` pairs, built from a [`Clustering`]
/// and the aggregated OD table (spec §4.2 "Transportation variant").
#[derive(Debug, Clone, Default)]
pub struct AnchorIndex {
    demand: BTreeMap<usize, BTreeMap<Anchor, ScenarioAnchorDemand>>,
    candidates: BTreeMap<Anchor, Vec<(usize, usize)>>,
}

impl AnchorIndex {
    pub fn build(
        problem: &ProblemData,
        clustering: &Clustering,
        aggregated: &AggregatedDemand,
    ) -> stationpool_core::Result<Self> {
        let members = LabelMembers::from_clustering(clustering, problem.station_count());
        let mut demand: BTreeMap<usize, BTreeMap<Anchor, ScenarioAnchorDemand>> = BTreeMap::new();
        let mut active: std::collections::BTreeSet<Anchor> = std::collections::BTreeSet::new();

        for scenario_index in 1..=problem.scenario_count() {
            let mut anchors: BTreeMap<Anchor, ScenarioAnchorDemand> = BTreeMap::new();
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
                let anchor = Anchor { from_label, to_label };
                let count = aggregated.count(scenario_index, (origin_id, destination_id));
                let entry = anchors.entry(anchor).or_default();
                *entry.pickup_counts.entry(origin_id).or_insert(0) += count;
                *entry.dropoff_counts.entry(destination_id).or_insert(0) += count;
                entry.trip_count += count;
                active.insert(anchor);
            }
            demand.insert(scenario_index, anchors);
        }

        let mut candidates: BTreeMap<Anchor, Vec<(usize, usize)>> = BTreeMap::new();
        for &anchor in &active {
            let mut pairs = Vec::new();
            for &j in members.stations_in(anchor.from_label) {
                for &k in members.stations_in(anchor.to_label) {
                    pairs.push((j, k));
                }
            }
            candidates.insert(anchor, pairs);
        }

        Ok(Self { demand, candidates })
    }

    /// Active anchors, sorted lexicographically (spec §4.2 invariant iii).
    pub fn anchors(&self) -> Vec<Anchor> {
        self.candidates.keys().copied().collect()
    }

    pub fn active_in(&self, scenario_index: usize) -> Vec<Anchor> {
        self.demand
            .get(&scenario_index)
            .map(|anchors| anchors.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn pickup_counts(&self, scenario_index: usize, anchor: Anchor) -> Vec<(i64, u32)> {
        self.demand
            .get(&scenario_index)
            .and_then(|anchors| anchors.get(&anchor))
            .map(|d| d.pickup_counts.iter().map(|(&id, &c)| (id, c)).collect())
            .unwrap_or_default()
    }

    pub fn dropoff_counts(&self, scenario_index: usize, anchor: Anchor) -> Vec<(i64, u32)> {
        self.demand
            .get(&scenario_index)
            .and_then(|anchors| anchors.get(&anchor))
            .map(|d| d.dropoff_counts.iter().map(|(&id, &c)| (id, c)).collect())
            .unwrap_or_default()
    }

    /// `M_{g,s}`, the anchor's total trip count in the scenario, used as
    /// the flow-activation big-M.
    pub fn trip_count(&self, scenario_index: usize, anchor: Anchor) -> u32 {
        self.demand
            .get(&scenario_index)
            .and_then(|anchors| anchors.get(&anchor))
            .map(|d| d.trip_count)
            .unwrap_or(0)
    }

    /// `P(g)`, the allowed `(pickup-index, drop-off-index)` pairs.
    pub fn candidate_pairs(&self, anchor: Anchor) -> &[(usize, usize)] {
        self.candidates
            .get(&anchor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
