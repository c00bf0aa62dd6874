use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Reference config read from the `tech_specs.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub boutique_labels: BoutiqueLabels,
    #[serde(default)]
    pub summary: Summary,
    /// Sort-key overrides, computed key -> replacement key.
    #[serde(default)]
    pub sort_keys: HashMap<String, String>,
    /// Barcode overrides, identifier -> UPC.
    #[serde(default)]
    pub barcodes: HashMap<String, u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoutiqueLabels {
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub subgenres: Vec<String>,
    #[serde(default)]
    pub descriptors: Vec<String>,
}

/// Lookup tables handed to the record builder.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub boutiques: HashSet<String>,
    /// Genres, then subgenres, then descriptors.
    pub valid_genres: Vec<String>,
    pub sort_overrides: HashMap<String, String>,
    pub barcode_overrides: HashMap<String, u64>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&content)?;
        debug!(
            path = %path.display(),
            boutiques = config.boutique_labels.labels.len(),
            sort_overrides = config.sort_keys.len(),
            barcodes = config.barcodes.len(),
            "Loaded reference config"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn reference_tables(&self) -> ReferenceTables {
        let valid_genres = self
            .summary
            .genres
            .iter()
            .chain(&self.summary.subgenres)
            .chain(&self.summary.descriptors)
            .cloned()
            .collect();

        ReferenceTables {
            boutiques: self.boutique_labels.labels.iter().cloned().collect(),
            valid_genres,
            sort_overrides: self.sort_keys.clone(),
            barcode_overrides: self.barcodes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[boutique_labels]
labels = ["Arrow Video", "The Criterion Collection"]

[summary]
genres = ["action", "drama"]
subgenres = ["cyberpunk"]
descriptors = ["cult"]

[sort_keys]
matrix_reloaded = "matrix_2"

[barcodes]
the_matrix = 85391163145
"#;

    #[test]
    fn test_reference_tables_from_toml() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let tables = config.reference_tables();

        assert!(tables.boutiques.contains("Arrow Video"));
        assert_eq!(tables.valid_genres, vec!["action", "drama", "cyberpunk", "cult"]);
        assert_eq!(tables.sort_overrides["matrix_reloaded"], "matrix_2");
        assert_eq!(tables.barcode_overrides["the_matrix"], 85391163145);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let config = Config::from_toml("[summary]\ngenres = [\"horror\"]\n").unwrap();
        let tables = config.reference_tables();

        assert!(tables.boutiques.is_empty());
        assert!(tables.sort_overrides.is_empty());
        assert_eq!(tables.valid_genres, vec!["horror"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.boutique_labels.labels.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Config::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }
}
