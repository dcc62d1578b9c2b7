use crate::data::model::{CrimeDataset, CrimeRecord};
use crate::data::normalize::canonical_state;

use super::classify::CrimeCluster;

// ---------------------------------------------------------------------------
// Row filter: which rows take part in a computation
// ---------------------------------------------------------------------------

/// Criteria selecting a subset of state rows.
///
/// Aggregate rows never pass. An unset criterion does not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    /// Keep only rows in this cluster.
    pub cluster: Option<CrimeCluster>,
    /// Keep only rows whose IPC crime rate lies within `(center, tolerance)`,
    /// bounds inclusive. Rows without a rate fail.
    pub crime_rate_near: Option<(f64, f64)>,
    /// Drop the row with this canonical name.
    pub exclude: Option<String>,
}

impl RowFilter {
    /// Every state row.
    pub fn all_states() -> Self {
        Self::default()
    }

    pub fn in_cluster(cluster: CrimeCluster) -> Self {
        Self {
            cluster: Some(cluster),
            ..Self::default()
        }
    }

    /// Rows whose crime rate is within `tolerance` of `center`, excluding `state`.
    pub fn peers_of(state: &str, center: f64, tolerance: f64) -> Self {
        Self {
            crime_rate_near: Some((center, tolerance)),
            exclude: Some(canonical_state(state)),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &CrimeRecord) -> bool {
        if record.is_aggregate() {
            return false;
        }
        if let Some(cluster) = self.cluster {
            if CrimeCluster::classify(record) != cluster {
                return false;
            }
        }
        if let Some((center, tolerance)) = self.crime_rate_near {
            match record.ipc_crime_rate {
                Some(v) if (v - center).abs() <= tolerance => {}
                _ => return false,
            }
        }
        if let Some(excluded) = &self.exclude {
            if record.canonical_name() == *excluded {
                return false;
            }
        }
        true
    }
}

/// Return indices of rows that pass `filter`, in dataset order.
pub fn filtered_indices(dataset: &CrimeDataset, filter: &RowFilter) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Rows that pass `filter`, in dataset order.
pub fn filtered_rows<'a>(dataset: &'a CrimeDataset, filter: &RowFilter) -> Vec<&'a CrimeRecord> {
    filtered_indices(dataset, filter)
        .into_iter()
        .map(|i| &dataset.records()[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> CrimeDataset {
        let row = |name: &str, ipc: Option<f64>| CrimeRecord {
            ipc_crime_rate: ipc,
            ..CrimeRecord::named(name)
        };
        CrimeDataset::from_records(vec![
            row("Kerala", Some(660.0)),
            row("Delhi", Some(1500.0)),
            row("Goa", Some(640.0)),
            row("Mizoram", None),
            row("Total (All India)", Some(650.0)),
        ])
    }

    #[test]
    fn test_all_states_drops_aggregates() {
        assert_eq!(filtered_indices(&dataset(), &RowFilter::all_states()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_peers_inclusive_and_excluding_self() {
        let ds = dataset();
        let filter = RowFilter::peers_of("kerala", 660.0, 20.0);
        let names: Vec<_> = filtered_rows(&ds, &filter)
            .iter()
            .map(|r| r.state_ut.clone())
            .collect();
        assert_eq!(names, vec!["Goa".to_string()]);
    }

    #[test]
    fn test_cluster_filter() {
        let ds = dataset();
        let idx = filtered_indices(&ds, &RowFilter::in_cluster(CrimeCluster::Low));
        assert_eq!(idx, vec![3]);
    }
}
