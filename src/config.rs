use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::ColumnMapping;

/// Config file looked up in the working directory when
/// `CRIME_ATLAS_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "crime-atlas.json";

pub const ENV_CONFIG: &str = "CRIME_ATLAS_CONFIG";
pub const ENV_DATA: &str = "CRIME_ATLAS_DATA";
pub const ENV_BOUNDARIES: &str = "CRIME_ATLAS_BOUNDARIES";
pub const ENV_GALLERY: &str = "CRIME_ATLAS_GALLERY";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Where the dashboard finds its inputs and how it reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub boundaries_path: PathBuf,
    pub gallery_manifest: PathBuf,
    /// State selected after the first load.
    pub default_state: String,
    /// GeoJSON feature property carrying the state name.
    pub boundary_name_key: String,
    pub columns: ColumnMapping,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/master.csv"),
            boundaries_path: PathBuf::from("data/india_states.geojson"),
            gallery_manifest: PathBuf::from("data/gallery.json"),
            default_state: "Delhi".to_string(),
            boundary_name_key: "Name".to_string(),
            columns: ColumnMapping::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, then the config file, then environment overrides, then the
    /// first positional argument as the dataset path.
    pub fn resolve<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let explicit = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var_os(key).map(PathBuf::from), args);
        Ok(config)
    }

    /// Apply path overrides from `lookup` (environment) and `args`.
    pub fn apply_overrides<F, I>(&mut self, lookup: F, args: I)
    where
        F: Fn(&str) -> Option<PathBuf>,
        I: IntoIterator<Item = String>,
    {
        if let Some(p) = lookup(ENV_DATA) {
            self.data_path = p;
        }
        if let Some(p) = lookup(ENV_BOUNDARIES) {
            self.boundaries_path = p;
        }
        if let Some(p) = lookup(ENV_GALLERY) {
            self.gallery_manifest = p;
        }
        if let Some(arg) = args.into_iter().next() {
            self.data_path = PathBuf::from(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(
            r#"{ "default_state": "Kerala", "columns": { "state": "State/UT" } }"#,
        )
        .unwrap();
        assert_eq!(config.default_state, "Kerala");
        assert_eq!(config.columns.state, "State/UT");
        assert_eq!(config.columns.murder_rate, "murder_rate_2022");
        assert_eq!(config.data_path, PathBuf::from("data/master.csv"));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(DashboardConfig::from_json("{ \"data_path\": 3 }").is_err());
    }

    #[test]
    fn test_overrides_order() {
        let mut config = DashboardConfig::default();
        let env = |key: &str| match key {
            ENV_DATA => Some(PathBuf::from("/env/data.csv")),
            ENV_GALLERY => Some(PathBuf::from("/env/gallery.json")),
            _ => None,
        };
        config.apply_overrides(env, Vec::<String>::new());
        assert_eq!(config.data_path, PathBuf::from("/env/data.csv"));
        assert_eq!(config.gallery_manifest, PathBuf::from("/env/gallery.json"));
        assert_eq!(config.boundaries_path, PathBuf::from("data/india_states.geojson"));

        config.apply_overrides(env, vec!["cli.csv".to_string()]);
        assert_eq!(config.data_path, PathBuf::from("cli.csv"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("crime-atlas-config-test.json");
        std::fs::write(&path, r#"{ "boundary_name_key": "ST_NM" }"#).unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.boundary_name_key, "ST_NM");
    }
}
