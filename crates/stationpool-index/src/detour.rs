use crate::feasible_pairs::FeasiblePairTable;
use crate::od::OdPair;
use crate::pooling::TimeBucketedDemand;
use stationpool_core::ProblemData;
use tracing::warn;

/// A same-source detour triple `(j,k,l)`: a shared vehicle travels
/// `j → k → l`; the `j→l` passenger tolerates the detour through `k`,
/// where a `k→l` passenger is also picked up (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SameSourceTriple {
    pub j: usize,
    pub k: usize,
    pub l: usize,
}

/// A same-destination detour quadruple `(j,k,l,Δt)`: a `j→l` passenger is
/// picked up first; the vehicle detours through `k` to collect a `k→l`
/// passenger whose request arrives `Δt` buckets later (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SameDestQuadruple {
    pub j: usize,
    pub k: usize,
    pub l: usize,
    pub time_delta: i64,
}

/// Demand-independent detour admission (spec §4.3): for every ordered
/// station triple `(j,k,l)` with distinct stations, `(j,l)` must be the
/// longest edge (`R(j,l) ≥ max(R(j,k), R(k,l))`) and the detour through
/// `k` must not exceed the direct `j→l` routing cost by more than `Δ`
/// (`R(j,k)+R(k,l) ≤ R(j,l)+Δ`). Each unordered station triple produces
/// at most one admitted ordered triple, so `(j,k,l)` and `(l,k,j)` never
/// both appear. Admission into the same-source family also admits the
/// corresponding same-destination quadruple with
/// `Δt = ⌊R(j,k)/time_window_sec⌋`.
#[derive(Debug, Clone, Default)]
pub struct DetourIndex {
    same_source: Vec<SameSourceTriple>,
    same_dest: Vec<SameDestQuadruple>,
}

impl DetourIndex {
    pub fn build(
        problem: &ProblemData,
        routing_delay: f64,
        time_window_sec: i64,
    ) -> stationpool_core::Result<Self> {
        if !problem.has_routing_costs() {
            return Err(stationpool_core::Error::RoutingUnavailable {
                operation: "detour admission test",
            });
        }

        let n = problem.station_count();
        let mut same_source = Vec::new();
        let mut same_dest = Vec::new();

        for a in 1..n {
            for b in (a + 1)..n {
                for c in (b + 1)..=n {
                    let points = [a, b, c];
                    for mid_slot in 0..3 {
                        let m = points[mid_slot];
                        let outer: Vec<usize> =
                            points.iter().copied().filter(|&p| p != m).collect();
                        let (j, l) = (outer[0], outer[1]);
                        if let Some(r_jk) = admit(problem, j, m, l, routing_delay)? {
                            same_source.push(SameSourceTriple { j, k: m, l });
                            let time_delta = (r_jk / time_window_sec as f64).floor() as i64;
                            same_dest.push(SameDestQuadruple { j, k: m, l, time_delta });
                            break;
                        }
                    }
                }
            }
        }

        same_source.sort();
        same_dest.sort();
        Ok(Self { same_source, same_dest })
    }

    pub fn same_source_triples(&self) -> &[SameSourceTriple] {
        &self.same_source
    }

    pub fn same_dest_quadruples(&self) -> &[SameDestQuadruple] {
        &self.same_dest
    }

    /// Same-source triples feasible at `(scenario_index, time_id)` (spec
    /// §4.2 Pooling variant): the bucket must hold at least two OD pairs,
    /// and — when a walking-limited candidate table is supplied — some OD
    /// in the bucket must admit edge `(j,k)` and some OD in the bucket
    /// must admit edge `(j,l)`.
    pub fn feasible_same_source(
        &self,
        demand: &TimeBucketedDemand,
        feasible: Option<&FeasiblePairTable>,
        scenario_index: usize,
        time_id: i64,
    ) -> Vec<SameSourceTriple> {
        let bucket_ods = demand.od_pairs(scenario_index, time_id);
        if bucket_ods.len() < 2 {
            return Vec::new();
        }
        self.same_source
            .iter()
            .copied()
            .filter(|t| match feasible {
                None => true,
                Some(table) => {
                    has_edge(&bucket_ods, table, (t.j, t.k))
                        && has_edge(&bucket_ods, table, (t.j, t.l))
                }
            })
            .collect()
    }

    /// Same-destination quadruples feasible at `(scenario_index,
    /// time_id)` (spec §4.2 Pooling variant): bucket `time_id + Δt` must
    /// exist, and — with walking limits on — edge `(j,l)` must be
    /// achievable from the earlier bucket and edge `(k,l)` from the later
    /// one.
    pub fn feasible_same_dest(
        &self,
        demand: &TimeBucketedDemand,
        feasible: Option<&FeasiblePairTable>,
        scenario_index: usize,
        time_id: i64,
    ) -> Vec<SameDestQuadruple> {
        let bucket_ods = demand.od_pairs(scenario_index, time_id);
        self.same_dest
            .iter()
            .copied()
            .filter(|q| {
                let later = time_id + q.time_delta;
                if !demand.has_bucket(scenario_index, later) {
                    return false;
                }
                match feasible {
                    None => true,
                    Some(table) => {
                        let later_ods = demand.od_pairs(scenario_index, later);
                        has_edge(&bucket_ods, table, (q.j, q.l))
                            && has_edge(&later_ods, table, (q.k, q.l))
                    }
                }
            })
            .collect()
    }
}

fn has_edge(ods: &[OdPair], table: &FeasiblePairTable, station_pair: (usize, usize)) -> bool {
    ods.iter().any(|&od| table.is_feasible(od, station_pair))
}

/// Tests ordered triple `(j,k,l)` for admission, returning `R(j,k)` (used
/// by the caller to compute `Δt`) on success. Triangle-inequality
/// violations (`R(j,k)+R(k,l) < R(j,l)`) are logged and treated as
/// non-admission rather than an error, since they imply ill-formed
/// routing data rather than a bug in this index.
fn admit(
    problem: &ProblemData,
    j: usize,
    k: usize,
    l: usize,
    routing_delay: f64,
) -> stationpool_core::Result<Option<f64>> {
    let id_j = problem.station_id(j).expect("in range");
    let id_k = problem.station_id(k).expect("in range");
    let id_l = problem.station_id(l).expect("in range");
    let r_jk = problem.routing_cost(id_j, id_k)?;
    let r_kl = problem.routing_cost(id_k, id_l)?;
    let r_jl = problem.routing_cost(id_j, id_l)?;

    if r_jk + r_kl < r_jl {
        warn!(j = id_j, k = id_k, l = id_l, "routing triangle inequality violated in detour test");
        return Ok(None);
    }
    if r_jl >= r_jk && r_jl >= r_kl && r_jk + r_kl <= r_jl + routing_delay {
        return Ok(Some(r_jk));
    }
    Ok(None)
}
