use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A candidate pickup/drop-off station.
///
/// `lon`/`lat` are opaque to the core: they are carried only for the
/// benefit of the external BD-09→WGS-84 / Haversine collaborators (spec
/// §6) and never interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
}

/// Mutually inverse id↔array-index bijection over the station pool.
///
/// Indices are 1-based per spec §3/§9 ("the core uses 1-based array
/// indices internally"); index `0` is never assigned.
#[derive(Debug, Clone)]
pub struct StationTable {
    stations: Vec<Station>,
    id_to_index: HashMap<i64, usize>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> Self {
        let mut id_to_index = HashMap::with_capacity(stations.len());
        for (zero_based, station) in stations.iter().enumerate() {
            id_to_index.insert(station.id, zero_based + 1);
        }
        Self {
            stations,
            id_to_index,
        }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// 1-based array index for a station id, or `None` if unknown.
    pub fn index_of(&self, id: i64) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// Station id for a 1-based array index, or `None` if out of range.
    pub fn id_of(&self, index: usize) -> Option<i64> {
        if index == 0 {
            return None;
        }
        self.stations.get(index - 1).map(|s| s.id)
    }

    pub fn station_at(&self, index: usize) -> Option<&Station> {
        if index == 0 {
            return None;
        }
        self.stations.get(index - 1)
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.stations.len()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StationTable {
        StationTable::new(vec![
            Station { id: 11, lon: 1.0, lat: 1.0 },
            Station { id: 22, lon: 2.0, lat: 2.0 },
            Station { id: 33, lon: 3.0, lat: 3.0 },
        ])
    }

    #[test]
    fn bijection_round_trips() {
        let t = table();
        for idx in t.indices() {
            let id = t.id_of(idx).unwrap();
            assert_eq!(t.index_of(id), Some(idx));
        }
    }

    #[test]
    fn indices_are_one_based() {
        let t = table();
        assert_eq!(t.index_of(11), Some(1));
        assert_eq!(t.index_of(33), Some(3));
        assert_eq!(t.station_at(0), None);
    }

    #[test]
    fn unknown_id_is_none() {
        let t = table();
        assert_eq!(t.index_of(999), None);
    }
}
