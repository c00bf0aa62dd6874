//! Builds a host-inventory catalog of a movie collection from spreadsheet exports.

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use config::{Config, ReferenceTables};
pub use error::{CatalogError, Result};
pub use pipeline::processing::catalog::{
    filter_by_group, merge, refresh_sort_keys, reorder_by_keys, sort_catalog, DuplicatePolicy,
    MergeEvent, MergeReport, RecordBuilder,
};
pub use pipeline::processing::normalize::{apply_override, canonicalize, normalize, sort_key};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{Catalog, CellValue, MovieRecord};
