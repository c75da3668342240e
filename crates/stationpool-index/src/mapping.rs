use crate::cluster::Clustering;
use std::collections::BTreeMap;

/// Groups station indices by their cluster label, for variants that need
/// "every station in zone Z" rather than a single station's label.
#[derive(Debug, Clone, Default)]
pub struct LabelMembers {
    members: BTreeMap<usize, Vec<usize>>,
}

impl LabelMembers {
    pub fn from_clustering(clustering: &Clustering, station_count: usize) -> Self {
        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for station_index in 1..=station_count {
            if let Some(label) = clustering.label_of(station_index) {
                members.entry(label).or_default().push(station_index);
            }
        }
        Self { members }
    }

    pub fn labels(&self) -> Vec<usize> {
        self.members.keys().copied().collect()
    }

    pub fn stations_in(&self, label: usize) -> &[usize] {
        self.members.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn clustering_from(pairs: &[(usize, usize)]) -> Clustering {
        let assignment: Map<usize, usize> = pairs.iter().copied().collect();
        let mut labels: Vec<usize> = assignment.values().copied().collect();
        labels.sort_unstable();
        labels.dedup();
        let medoids: Map<usize, usize> = labels.into_iter().map(|label| (label, label)).collect();
        unsafe_clustering(assignment, medoids)
    }

    fn unsafe_clustering(assignment: Map<usize, usize>, medoids: Map<usize, usize>) -> Clustering {
        // Test-only constructor shim: Clustering has no public builder
        // besides `solve`, so tests exercise LabelMembers against a
        // hand-assembled clustering via this module-private path.
        crate::cluster::test_support::from_parts(assignment, medoids)
    }

    #[test]
    fn groups_stations_by_label() {
        let clustering = clustering_from(&[(1, 1), (2, 1), (3, 3)]);
        let members = LabelMembers::from_clustering(&clustering, 3);
        assert_eq!(members.labels(), vec![1, 3]);
        assert_eq!(members.stations_in(1), &[1, 2]);
        assert_eq!(members.stations_in(3), &[3]);
    }
}
