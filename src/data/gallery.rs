use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// One pre-rendered policy map or chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GalleryItem {
    pub title: String,
    #[serde(default)]
    pub caption: String,
    /// Image path; relative paths are resolved against the manifest.
    pub image: PathBuf,
}

impl GalleryItem {
    /// URI understood by the egui image loaders.
    pub fn uri(&self) -> String {
        format!("file://{}", self.image.display())
    }
}

/// Static image galleries shown next to the interactive views.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Gallery {
    pub policy_maps: Vec<GalleryItem>,
    pub policy_charts: Vec<GalleryItem>,
}

impl Gallery {
    /// Parse a manifest; image paths are made absolute against `base_dir`.
    pub fn from_json(text: &str, base_dir: &Path) -> Result<Self> {
        let mut gallery: Gallery = serde_json::from_str(text).context("parsing gallery manifest")?;
        for item in gallery
            .policy_maps
            .iter_mut()
            .chain(gallery.policy_charts.iter_mut())
        {
            if item.image.is_relative() {
                item.image = base_dir.join(&item.image);
            }
        }
        Ok(gallery)
    }

    /// Load the manifest at `path`. A missing file is an empty gallery.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("gallery manifest {} not found, galleries will be empty", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading gallery manifest {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&text, base)
    }

    pub fn is_empty(&self) -> bool {
        self.policy_maps.is_empty() && self.policy_charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_resolves_relative_paths() {
        let text = r#"{
            "policy_maps": [
                { "title": "Women safety", "caption": "Crimes against women, 2022", "image": "maps/women.png" }
            ],
            "policy_charts": [
                { "title": "Trend", "image": "/srv/trend.png" }
            ]
        }"#;
        let g = Gallery::from_json(text, Path::new("/data")).unwrap();
        assert_eq!(g.policy_maps[0].image, PathBuf::from("/data/maps/women.png"));
        assert_eq!(g.policy_maps[0].uri(), "file:///data/maps/women.png");
        assert_eq!(g.policy_charts[0].image, PathBuf::from("/srv/trend.png"));
        assert_eq!(g.policy_charts[0].caption, "");
    }

    #[test]
    fn test_sections_default_to_empty() {
        let g = Gallery::from_json("{}", Path::new(".")).unwrap();
        assert!(g.is_empty());
        assert!(Gallery::from_json("[]", Path::new(".")).is_err());
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let path = std::env::temp_dir().join("crime-atlas-no-such-gallery.json");
        assert!(Gallery::load(&path).unwrap().is_empty());
    }
}
