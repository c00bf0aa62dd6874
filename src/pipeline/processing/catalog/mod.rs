// Catalog stage: record building, duplicate-aware merging, and ordering

pub mod builder;
pub mod idempotency;
pub mod merge;
pub mod sorter;

pub use builder::RecordBuilder;
pub use idempotency::IdempotencyChecker;
pub use merge::{merge, DuplicatePolicy, MergeEvent, MergeReport};
pub use sorter::{filter_by_group, refresh_sort_keys, reorder_by_keys, sort_catalog};
