//! Run metrics for catalog imports
//!
//! Metrics go through the `metrics` facade and are no-ops until a recorder is
//! installed. `init` installs a Prometheus recorder whose text rendering can be
//! dumped to a file at the end of a batch run.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::Path;
use tracing::info;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingest metrics
    RowsRead,

    // Build metrics
    RecordsBuilt,
    BuildErrors,
    UpcFallbacks,

    // Merge metrics
    RecordsInserted,
    RecordsOverwritten,
    DuplicatesSkipped,

    // Pipeline metrics
    PipelineDuration,
}

impl MetricName {
    /// Get the metric name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsRead => "mvdb_rows_read_total",
            MetricName::RecordsBuilt => "mvdb_records_built_total",
            MetricName::BuildErrors => "mvdb_build_errors_total",
            MetricName::UpcFallbacks => "mvdb_upc_fallbacks_total",
            MetricName::RecordsInserted => "mvdb_records_inserted_total",
            MetricName::RecordsOverwritten => "mvdb_records_overwritten_total",
            MetricName::DuplicatesSkipped => "mvdb_duplicates_skipped_total",
            MetricName::PipelineDuration => "mvdb_pipeline_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RowsRead,
            RecordsBuilt,
            BuildErrors,
            UpcFallbacks,
            RecordsInserted,
            RecordsOverwritten,
            DuplicatesSkipped,
            PipelineDuration,
        ]
        .into_iter()
    }
}

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Calling it twice is a no-op.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    METRICS_HANDLE.set(handle).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Current metrics in Prometheus text format, if a recorder is installed.
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

/// Write the Prometheus text rendering to `path` (textfile-collector style).
pub fn write_to_file(path: impl AsRef<Path>) -> std::io::Result<bool> {
    match render() {
        Some(text) => {
            fs::write(path.as_ref(), text)?;
            info!(path = %path.as_ref().display(), "Wrote metrics snapshot");
            Ok(true)
        }
        None => Ok(false),
    }
}

// ============================================================================
// Ingest Metrics
// ============================================================================

pub mod ingest {
    use super::MetricName;

    pub fn rows_read(count: usize) {
        ::metrics::counter!(MetricName::RowsRead.as_str()).increment(count as u64);
    }
}

// ============================================================================
// Build Metrics
// ============================================================================

pub mod build {
    use super::MetricName;

    pub fn record_built() {
        ::metrics::counter!(MetricName::RecordsBuilt.as_str()).increment(1);
    }

    pub fn record_failed() {
        ::metrics::counter!(MetricName::BuildErrors.as_str()).increment(1);
    }

    /// A record ended up with no UPC at all
    pub fn upc_fallback() {
        ::metrics::counter!(MetricName::UpcFallbacks.as_str()).increment(1);
    }
}

// ============================================================================
// Merge Metrics
// ============================================================================

pub mod merge {
    use super::MetricName;

    pub fn record_inserted() {
        ::metrics::counter!(MetricName::RecordsInserted.as_str()).increment(1);
    }

    pub fn record_overwritten() {
        ::metrics::counter!(MetricName::RecordsOverwritten.as_str()).increment(1);
    }

    pub fn duplicate_skipped() {
        ::metrics::counter!(MetricName::DuplicatesSkipped.as_str()).increment(1);
    }
}

// ============================================================================
// Pipeline Metrics
// ============================================================================

pub mod pipeline {
    use super::MetricName;

    pub fn duration(secs: f64, command: &'static str) {
        ::metrics::histogram!(MetricName::PipelineDuration.as_str(), "command" => command)
            .record(secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: HashSet<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
        assert!(names.iter().all(|n| n.starts_with("mvdb_")));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        build::record_built();
        merge::duplicate_skipped();
        pipeline::duration(0.5, "import");
    }
}
