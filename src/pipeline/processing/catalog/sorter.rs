use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::types::{Catalog, MovieRecord};

/// Order the catalog by sort key.
///
/// Keys are taken from the catalog itself and sorted bytewise, so every record
/// is emitted exactly once. Records sharing a key keep their catalog order.
pub fn sort_catalog(catalog: Catalog) -> Catalog {
    let keys: Vec<String> = catalog
        .values()
        .map(|record| record.sort_key.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut buckets = bucket_by_sort_key(catalog);
    let mut sorted = Catalog::with_capacity(buckets.values().map(Vec::len).sum());
    for key in &keys {
        if let Some(bucket) = buckets.remove(key.as_str()) {
            sorted.extend(bucket);
        }
    }

    debug!(records = sorted.len(), keys = keys.len(), "Sorted catalog");
    sorted
}

/// Reorder the catalog following a caller-supplied sequence of sort keys.
///
/// The sequence must name exactly the catalog's sort keys; repeats are
/// collapsed. A key missing from the sequence, or one the catalog does not
/// use, fails with `IncompleteSortKeySet` rather than dropping records.
pub fn reorder_by_keys<S: AsRef<str>>(catalog: Catalog, ordered_keys: &[S]) -> Result<Catalog> {
    let requested: HashSet<&str> = ordered_keys.iter().map(|k| k.as_ref()).collect();
    let present: HashSet<&str> = catalog.values().map(|r| r.sort_key.as_str()).collect();

    let mut missing: Vec<String> = present
        .difference(&requested)
        .map(|k| k.to_string())
        .collect();
    let mut unknown: Vec<String> = requested
        .difference(&present)
        .map(|k| k.to_string())
        .collect();
    if !missing.is_empty() || !unknown.is_empty() {
        missing.sort();
        unknown.sort();
        return Err(CatalogError::IncompleteSortKeySet { missing, unknown });
    }

    let mut buckets = bucket_by_sort_key(catalog);
    let mut sorted = Catalog::with_capacity(buckets.values().map(Vec::len).sum());
    for key in ordered_keys {
        // repeated keys find their bucket already drained
        if let Some(bucket) = buckets.remove(key.as_ref()) {
            sorted.extend(bucket);
        }
    }

    Ok(sorted)
}

/// Group records by sort key, preserving catalog order inside each group.
fn bucket_by_sort_key(catalog: Catalog) -> HashMap<String, Vec<(String, MovieRecord)>> {
    let mut buckets: HashMap<String, Vec<_>> = HashMap::new();
    for (identifier, record) in catalog {
        buckets
            .entry(record.sort_key.clone())
            .or_default()
            .push((identifier, record));
    }
    buckets
}

/// Re-apply the override table to persisted sort keys.
///
/// Every matching record is rewritten, even when the value is unchanged.
/// Returns how many records matched.
pub fn refresh_sort_keys(catalog: &mut Catalog, overrides: &HashMap<String, String>) -> usize {
    let mut matched = 0;
    for (identifier, record) in catalog.iter_mut() {
        if let Some(replacement) = overrides.get(&record.sort_key) {
            debug!(
                identifier = %identifier,
                from = %record.sort_key,
                to = %replacement,
                "Sort key override"
            );
            record.sort_key = replacement.clone();
            matched += 1;
        }
    }
    matched
}

/// Records carrying `group`, in catalog order.
pub fn filter_by_group<'a>(
    catalog: &'a Catalog,
    group: &'a str,
) -> impl Iterator<Item = (&'a String, &'a MovieRecord)> + 'a {
    catalog.iter().filter(move |(_, record)| record.has_group(group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::record;

    fn catalog(entries: &[(&str, &str)]) -> Catalog {
        entries
            .iter()
            .map(|(id, key)| (id.to_string(), record(id, key)))
            .collect()
    }

    fn ids(catalog: &Catalog) -> Vec<&str> {
        catalog.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_sort_catalog_orders_by_key() {
        let unsorted = catalog(&[
            ("zodiac", "zodiac"),
            ("the_matrix", "matrix"),
            ("alien", "alien"),
        ]);

        let sorted = sort_catalog(unsorted);
        assert_eq!(ids(&sorted), vec!["alien", "the_matrix", "zodiac"]);
    }

    #[test]
    fn test_sort_catalog_is_stable_within_key() {
        let unsorted = catalog(&[
            ("b_two", "same"),
            ("zeta", "aaa"),
            ("a_one", "same"),
            ("c_three", "same"),
        ]);

        let sorted = sort_catalog(unsorted.clone());
        assert_eq!(sorted.len(), unsorted.len());
        assert_eq!(ids(&sorted), vec!["zeta", "b_two", "a_one", "c_three"]);

        let keys: Vec<&str> = sorted.values().map(|r| r.sort_key.as_str()).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_is_bytewise() {
        let unsorted = catalog(&[("lower", "matrix"), ("digit", "2001"), ("dash", "matrix-a")]);
        let sorted = sort_catalog(unsorted);
        assert_eq!(ids(&sorted), vec!["digit", "lower", "dash"]);
    }

    #[test]
    fn test_reorder_by_keys_with_repeats() {
        let unsorted = catalog(&[("x1", "x"), ("y1", "y"), ("x2", "x")]);
        let sorted = reorder_by_keys(unsorted, &["y", "x", "x", "y"]).unwrap();
        assert_eq!(ids(&sorted), vec!["y1", "x1", "x2"]);
    }

    #[test]
    fn test_reorder_by_keys_rejects_incomplete_sequence() {
        let unsorted = catalog(&[("x1", "x"), ("y1", "y")]);
        match reorder_by_keys(unsorted, &["x", "z"]) {
            Err(CatalogError::IncompleteSortKeySet { missing, unknown }) => {
                assert_eq!(missing, vec!["y"]);
                assert_eq!(unknown, vec!["z"]);
            }
            other => panic!("expected IncompleteSortKeySet, got {:?}", other),
        }
    }

    #[test]
    fn test_refresh_sort_keys() {
        let mut movies = catalog(&[
            ("the_matrix", "matrix"),
            ("the_matrix_reloaded", "matrix_reloaded"),
            ("alien", "alien"),
        ]);
        let overrides = HashMap::from([
            ("matrix".to_string(), "matrix_1".to_string()),
            ("matrix_reloaded".to_string(), "matrix_2".to_string()),
            ("alien".to_string(), "alien".to_string()),
        ]);

        assert_eq!(refresh_sort_keys(&mut movies, &overrides), 3);
        assert_eq!(movies["the_matrix"].sort_key, "matrix_1");
        assert_eq!(movies["the_matrix_reloaded"].sort_key, "matrix_2");
        assert_eq!(movies["alien"].sort_key, "alien");
    }

    #[test]
    fn test_filter_by_group() {
        let mut movies = catalog(&[("alien", "alien"), ("heat", "heat")]);
        movies["heat"].groups.push("steelbook".to_string());

        let found: Vec<&String> = filter_by_group(&movies, "steelbook").map(|(id, _)| id).collect();
        assert_eq!(found, vec!["heat"]);
        assert_eq!(filter_by_group(&movies, "blu-ray").count(), 2);
    }
}
