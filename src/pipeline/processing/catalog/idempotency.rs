use crate::error::{CatalogError, Result};
use crate::types::{Catalog, MovieRecord};

/// Handles duplicate and change detection for catalog merges
pub struct IdempotencyChecker;

impl IdempotencyChecker {
    /// Fails with `DuplicateRecord` when `identifier` is already cataloged.
    pub fn check_duplicate(existing: &Catalog, identifier: &str) -> Result<()> {
        match existing.get(identifier) {
            Some(record) => Err(CatalogError::DuplicateRecord {
                identifier: identifier.to_string(),
                title: record.data.title.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Names of the top-level fields that differ between two versions of a record
    pub fn changed_fields(existing: &MovieRecord, updated: &MovieRecord) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let (old, new) = (&existing.data, &updated.data);

        if existing.groups != updated.groups {
            changed.push("groups");
        }
        if existing.sort_key != updated.sort_key {
            changed.push("sort_key");
        }
        if old.title != new.title {
            changed.push("title");
        }
        if old.year != new.year {
            changed.push("year");
        }
        if old.runtime != new.runtime {
            changed.push("runtime");
        }
        if old.director != new.director {
            changed.push("director");
        }
        if old.crew != new.crew {
            changed.push("crew");
        }
        if old.genres != new.genres {
            changed.push("genres");
        }
        if old.release != new.release {
            changed.push("release");
        }
        if old.mpaa != new.mpaa {
            changed.push("mpaa");
        }

        changed
    }

    /// Check if a record has changes compared to the stored version
    pub fn record_has_changes(existing: &MovieRecord, updated: &MovieRecord) -> bool {
        !Self::changed_fields(existing, updated).is_empty()
    }
}
