/// Data layer: core types, canonical names and loading.
///
/// Architecture:
/// ```text
///  master.csv          india_states.geojson      gallery.json
///        │                      │                      │
///        ▼                      ▼                      ▼
///   ┌──────────┐         ┌────────────┐          ┌──────────┐
///   │  loader   │         │ boundaries │          │ gallery  │
///   └──────────┘         └────────────┘          └──────────┘
///        │                      │
///        ▼                      │
///   ┌──────────────┐            │
///   │ CrimeDataset  │◄──────────┘  joined by canonical name
///   └──────────────┘               (normalize)
/// ```

pub mod boundaries;
pub mod gallery;
pub mod loader;
pub mod model;
pub mod normalize;
