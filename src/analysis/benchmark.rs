use std::fmt;

use crate::data::model::{CrimeDataset, CrimeRecord, Indicators};

use super::classify::CrimeCluster;
use super::filter::{filtered_rows, RowFilter};

/// Peers are states whose IPC crime rate lies within this distance.
pub const PEER_TOLERANCE: f64 = 50.0;

// ---------------------------------------------------------------------------
// Benchmark mode
// ---------------------------------------------------------------------------

/// What a state is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchmarkMode {
    #[default]
    National,
    Cluster,
    Peers,
}

impl BenchmarkMode {
    pub const ALL: [BenchmarkMode; 3] = [
        BenchmarkMode::National,
        BenchmarkMode::Cluster,
        BenchmarkMode::Peers,
    ];

    /// Option text in the mode picker.
    pub fn label(self) -> &'static str {
        match self {
            BenchmarkMode::National => "National Average",
            BenchmarkMode::Cluster => "Cluster Average",
            BenchmarkMode::Peers => "Peer States (Similar IPC)",
        }
    }
}

impl fmt::Display for BenchmarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Benchmark computation
// ---------------------------------------------------------------------------

/// Reference values a state is compared against.
pub type Benchmark = Indicators;

/// Mean of the finite values, or `None` when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Column-wise mean over `rows`; `None` when `rows` is empty.
pub fn average(rows: &[&CrimeRecord]) -> Option<Benchmark> {
    if rows.is_empty() {
        return None;
    }
    Some(Benchmark {
        crime_rate: mean(rows.iter().map(|r| r.ipc_crime_rate)),
        murder_rate: mean(rows.iter().map(|r| r.murder_rate)),
        chargesheeting: mean(rows.iter().map(|r| r.chargesheeting_rate)),
    })
}

/// National figures: the "All India" aggregate row when the dataset carries
/// one, otherwise the mean over every state row.
pub fn national(dataset: &CrimeDataset) -> Option<Benchmark> {
    if let Some(row) = dataset.national_aggregate() {
        return Some(row.indicators());
    }
    average(&filtered_rows(dataset, &RowFilter::all_states()))
}

/// Mean over the states sharing `record`'s cluster, `record` included.
pub fn cluster(dataset: &CrimeDataset, record: &CrimeRecord) -> Option<Benchmark> {
    let filter = RowFilter::in_cluster(CrimeCluster::classify(record));
    average(&filtered_rows(dataset, &filter))
}

/// Mean over states within [`PEER_TOLERANCE`] of `record`'s crime rate,
/// `record` itself excluded.
pub fn peers(dataset: &CrimeDataset, record: &CrimeRecord) -> Option<Benchmark> {
    let center = record.ipc_crime_rate.filter(|v| v.is_finite())?;
    let filter = RowFilter::peers_of(&record.state_ut, center, PEER_TOLERANCE);
    average(&filtered_rows(dataset, &filter))
}

/// Benchmark for `state` under `mode`; `None` when the state is unknown or
/// the benchmark population is empty.
pub fn benchmark(dataset: &CrimeDataset, state: &str, mode: BenchmarkMode) -> Option<Benchmark> {
    let record = dataset.find(state)?;
    match mode {
        BenchmarkMode::National => national(dataset),
        BenchmarkMode::Cluster => cluster(dataset, record),
        BenchmarkMode::Peers => peers(dataset, record),
    }
}
