use crate::error::Result;
use crate::od::OdPair;
use std::collections::BTreeMap;
use stationpool_core::ProblemData;

/// The walking-limited candidate-pair table of spec §3/§4.2(ii):
/// `valid_pairs[(o,d)] = { (j,k) : walking_cost(o, id(j)) ≤ W ∧ walking_cost(id(k), d) ≤ W }`,
/// where `j`/`k` are 1-based station indices.
#[derive(Debug, Clone, Default)]
pub struct FeasiblePairTable {
    walking_limit: f64,
    pairs: BTreeMap<OdPair, Vec<(usize, usize)>>,
}

impl FeasiblePairTable {
    /// Builds the table for a given set of OD pairs. `od_pairs` need not be
    /// sorted; the table is keyed by `BTreeMap` so lookups and iteration
    /// come out deterministic regardless.
    pub fn build(
        problem: &ProblemData,
        od_pairs: &[OdPair],
        walking_limit: f64,
    ) -> Result<Self> {
        let station_count = problem.station_count();
        let mut origin_ok: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        let mut destination_ok: BTreeMap<i64, Vec<usize>> = BTreeMap::new();

        let mut ensure_origin = |origin_id: i64, origin_ok: &mut BTreeMap<i64, Vec<usize>>| -> Result<()> {
            if origin_ok.contains_key(&origin_id) {
                return Ok(());
            }
            let mut feasible = Vec::new();
            for j in 1..=station_count {
                let station_id = problem.station_id(j).expect("in range");
                if problem.walking_cost(origin_id, station_id)? <= walking_limit {
                    feasible.push(j);
                }
            }
            origin_ok.insert(origin_id, feasible);
            Ok(())
        };
        let mut ensure_destination =
            |destination_id: i64, destination_ok: &mut BTreeMap<i64, Vec<usize>>| -> Result<()> {
                if destination_ok.contains_key(&destination_id) {
                    return Ok(());
                }
                let mut feasible = Vec::new();
                for k in 1..=station_count {
                    let station_id = problem.station_id(k).expect("in range");
                    if problem.walking_cost(station_id, destination_id)? <= walking_limit {
                        feasible.push(k);
                    }
                }
                destination_ok.insert(destination_id, feasible);
                Ok(())
            };

        let mut pairs: BTreeMap<OdPair, Vec<(usize, usize)>> = BTreeMap::new();
        for &(origin_id, destination_id) in od_pairs {
            ensure_origin(origin_id, &mut origin_ok)?;
            ensure_destination(destination_id, &mut destination_ok)?;
            let origins = &origin_ok[&origin_id];
            let destinations = &destination_ok[&destination_id];
            let mut candidates = Vec::with_capacity(origins.len() * destinations.len());
            for &j in origins {
                for &k in destinations {
                    candidates.push((j, k));
                }
            }
            pairs.insert((origin_id, destination_id), candidates);
        }

        Ok(Self { walking_limit, pairs })
    }

    pub fn walking_limit(&self) -> f64 {
        self.walking_limit
    }

    pub fn candidates(&self, od: OdPair) -> &[(usize, usize)] {
        self.pairs.get(&od).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_feasible(&self, od: OdPair, station_pair: (usize, usize)) -> bool {
        self.candidates(od).contains(&station_pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stationpool_core::Station;

    fn linear_problem() -> ProblemData {
        let stations = vec![
            Station { id: 1, lon: 0.0, lat: 0.0 },
            Station { id: 2, lon: 1.0, lat: 0.0 },
            Station { id: 3, lon: 2.0, lat: 0.0 },
        ];
        let mut walking = HashMap::new();
        for a in [1, 2, 3] {
            for b in [1, 2, 3] {
                walking.insert((a, b), ((a - b).abs()) as f64);
            }
        }
        walking.insert((10, 1), 0.0);
        walking.insert((10, 2), 1.0);
        walking.insert((10, 3), 2.0);
        walking.insert((1, 20), 2.0);
        walking.insert((2, 20), 1.0);
        walking.insert((3, 20), 0.0);
        ProblemData::build(stations, vec![], walking, None, vec![]).unwrap()
    }

    #[test]
    fn restricts_candidates_to_walking_radius() {
        let problem = linear_problem();
        let table = FeasiblePairTable::build(&problem, &[(10, 20)], 1.0).unwrap();
        let mut candidates = table.candidates((10, 20)).to_vec();
        candidates.sort_unstable();
        assert_eq!(candidates, vec![(1, 2), (1, 3), (2, 2), (2, 3)]);
    }

    #[test]
    fn unknown_od_has_no_candidates() {
        let problem = linear_problem();
        let table = FeasiblePairTable::build(&problem, &[(10, 20)], 1.0).unwrap();
        assert!(table.candidates((99, 99)).is_empty());
    }
}
