// Catalog pipeline: spreadsheet ingestion, record processing, and persistence

pub mod ingestion;
pub mod processing;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::config::ReferenceTables;
use crate::error::Result;
use crate::storage::{write_barcodes, Storage};
use crate::types::Catalog;
use processing::catalog::{
    merge, refresh_sort_keys, sort_catalog, DuplicatePolicy, MergeEvent, RecordBuilder,
};

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub command: &'static str,
    pub rows_read: usize,
    pub records_written: usize,
    pub inserted: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub sort_keys_refreshed: usize,
    pub events: Vec<MergeEvent>,
    pub output: String,
    pub barcode_file: Option<String>,
    pub duration_ms: i64,
}

impl PipelineResult {
    fn new(command: &'static str, output: String) -> Self {
        Self {
            command,
            rows_read: 0,
            records_written: 0,
            inserted: 0,
            overwritten: 0,
            skipped: 0,
            sort_keys_refreshed: 0,
            events: Vec::new(),
            output,
            barcode_file: None,
            duration_ms: 0,
        }
    }

    fn finish(mut self, started: DateTime<Utc>) -> Self {
        let elapsed = Utc::now() - started;
        self.duration_ms = elapsed.num_milliseconds();
        crate::observability::metrics::pipeline::duration(
            self.duration_ms as f64 / 1000.0,
            self.command,
        );
        info!(
            command = self.command,
            records = self.records_written,
            duration_ms = self.duration_ms,
            "Pipeline finished"
        );
        self
    }
}

/// Runs the import, merge, and refresh flows against injected reference tables.
///
/// Every flow builds its full output in memory first; nothing is written
/// unless all rows were built successfully.
pub struct Pipeline {
    tables: ReferenceTables,
}

impl Pipeline {
    pub fn new(tables: ReferenceTables) -> Self {
        Self { tables }
    }

    /// Read a spreadsheet and build its records, in row order.
    pub fn build_batch(&self, csv_path: &Path) -> Result<(usize, Catalog)> {
        let rows = ingestion::read_csv_file(csv_path)?;
        let batch = RecordBuilder::new(&self.tables).build_catalog(&rows)?;
        info!(rows = rows.len(), records = batch.len(), "Built import batch");
        Ok((rows.len(), batch))
    }

    /// Build a fresh catalog from a spreadsheet and write it sorted.
    #[instrument(skip(self, output), fields(csv = %csv_path.display()))]
    pub fn import(
        &self,
        csv_path: &Path,
        output: &dyn Storage,
        barcodes: Option<&Path>,
    ) -> Result<PipelineResult> {
        let started = Utc::now();
        let mut result = PipelineResult::new("import", output.describe());

        let (rows_read, batch) = self.build_batch(csv_path)?;
        result.rows_read = rows_read;
        result.inserted = batch.len();

        let catalog = sort_catalog(batch);
        Self::persist(&catalog, output, barcodes, &mut result)?;
        Ok(result.finish(started))
    }

    /// Merge a spreadsheet batch into an existing catalog and write the sorted result.
    #[instrument(skip(self, existing, output), fields(csv = %csv_path.display()))]
    pub fn add(
        &self,
        csv_path: &Path,
        existing: &dyn Storage,
        output: &dyn Storage,
        policy: DuplicatePolicy,
        barcodes: Option<&Path>,
    ) -> Result<PipelineResult> {
        let started = Utc::now();
        let mut result = PipelineResult::new("add", output.describe());

        let mut catalog = existing.load()?;
        let (rows_read, batch) = self.build_batch(csv_path)?;
        result.rows_read = rows_read;

        let report = merge(&mut catalog, batch, policy)?;
        result.inserted = report.inserted();
        result.overwritten = report.overwritten();
        result.skipped = report.skipped();
        result.events = report.events;

        let catalog = sort_catalog(catalog);
        Self::persist(&catalog, output, barcodes, &mut result)?;
        Ok(result.finish(started))
    }

    /// Re-apply sort-key overrides to a stored catalog and write it re-sorted.
    #[instrument(skip_all)]
    pub fn refresh(&self, existing: &dyn Storage, output: &dyn Storage) -> Result<PipelineResult> {
        let started = Utc::now();
        let mut result = PipelineResult::new("refresh", output.describe());

        let mut catalog = existing.load()?;
        result.sort_keys_refreshed = refresh_sort_keys(&mut catalog, &self.tables.sort_overrides);
        info!(matched = result.sort_keys_refreshed, "Applied sort key overrides");

        let catalog = sort_catalog(catalog);
        Self::persist(&catalog, output, None, &mut result)?;
        Ok(result.finish(started))
    }

    /// Write the barcode export, then the catalog. A failed export leaves the
    /// catalog unwritten; a failed catalog save removes the export again.
    fn persist(
        catalog: &Catalog,
        output: &dyn Storage,
        barcodes: Option<&Path>,
        result: &mut PipelineResult,
    ) -> Result<()> {
        if let Some(path) = barcodes {
            write_barcodes(catalog, path)?;
        }

        if let Err(e) = output.save(catalog) {
            if let Some(path) = barcodes {
                warn!(path = %path.display(), "Catalog save failed, removing barcode export");
                if let Err(remove_err) = fs::remove_file(path) {
                    warn!(
                        path = %path.display(),
                        error = %remove_err,
                        "Could not remove barcode export"
                    );
                }
            }
            return Err(e);
        }

        result.records_written = catalog.len();
        result.barcode_file = barcodes.map(|path| path.display().to_string());
        Ok(())
    }
}
