use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::Catalog;

/// Storage trait for persisting the catalog document
pub trait Storage {
    /// Load the whole catalog.
    fn load(&self) -> Result<Catalog>;
    /// Replace the stored catalog with `catalog`.
    fn save(&self, catalog: &Catalog) -> Result<()>;
    /// Human-readable location, used in run summaries.
    fn describe(&self) -> String;
}

/// Catalog kept in a YAML inventory file
pub struct YamlFileStorage {
    path: PathBuf,
}

impl YamlFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Storage for YamlFileStorage {
    fn load(&self) -> Result<Catalog> {
        let content = fs::read_to_string(&self.path)?;
        let catalog = parse_catalog(&content)?;
        debug!(path = %self.path.display(), records = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, render_catalog(catalog)?)?;
        info!(path = %self.path.display(), records = catalog.len(), "Wrote catalog");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory storage implementation for development/testing
#[derive(Default)]
pub struct InMemoryStorage {
    catalog: RefCell<Catalog>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Catalog {
        self.catalog.borrow().clone()
    }
}

impl Storage for InMemoryStorage {
    fn load(&self) -> Result<Catalog> {
        Ok(self.catalog.borrow().clone())
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        *self.catalog.borrow_mut() = catalog.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Render the catalog as an inventory document.
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    let mut document = String::from("---\n");
    if !catalog.is_empty() {
        document.push_str(&serde_yaml::to_string(catalog)?);
    }
    Ok(document)
}

/// Parse an inventory document. An empty document is an empty catalog.
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let body = content.trim();
    if body.is_empty() || body == "---" {
        return Ok(Catalog::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[derive(Serialize)]
struct BarcodeDocument {
    barcodes: BTreeMap<String, u64>,
}

/// Write the identifier -> UPC table as a `[barcodes]` TOML section.
///
/// Records without a UPC are left out. The output can be loaded back as the
/// barcode override section of the reference config.
pub fn write_barcodes(catalog: &Catalog, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let document = BarcodeDocument {
        barcodes: catalog
            .iter()
            .filter_map(|(id, record)| record.data.release.upc.map(|upc| (id.clone(), upc)))
            .collect(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string(&document)?)?;
    info!(path = %path.display(), barcodes = document.barcodes.len(), "Wrote barcode export");
    Ok(document.barcodes.len())
}
