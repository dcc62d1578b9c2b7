/// Derived metrics over a loaded [`CrimeDataset`](crate::data::model::CrimeDataset).
///
/// Everything here is a pure function of the dataset and the current
/// selection; results are recomputed on every interaction.
///
/// ```text
///   CrimeDataset
///        │
///        ├── filter     row subsets (states, cluster members, peers)
///        ├── classify   crime cluster / policy priority per row
///        ├── benchmark  national / cluster / peer means
///        ├── composite  0–100 min-max blended index
///        ├── compare    deltas, insight text, multi-state rows
///        └── kpi        KPI card and tooltip text
/// ```

pub mod benchmark;
pub mod classify;
pub mod compare;
pub mod composite;
pub mod filter;
pub mod kpi;
