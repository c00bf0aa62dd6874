use serde::Serialize;
use tracing::{debug, info, warn};

use super::idempotency::IdempotencyChecker;
use crate::error::{CatalogError, Result};
use crate::types::Catalog;

/// What to do when an incoming identifier is already cataloged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the existing record and drop the incoming one.
    #[default]
    Skip,
    /// Replace the existing record wholesale.
    Overwrite,
}

impl DuplicatePolicy {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            DuplicatePolicy::Overwrite
        } else {
            DuplicatePolicy::Skip
        }
    }
}

/// Action taken for one incoming record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MergeEvent {
    Inserted { identifier: String },
    Overwritten { identifier: String, changed: bool },
    DuplicateSkipped { identifier: String, title: String },
}

/// Ordered log of merge actions
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub events: Vec<MergeEvent>,
}

impl MergeReport {
    pub fn inserted(&self) -> usize {
        self.count(|e| matches!(e, MergeEvent::Inserted { .. }))
    }

    pub fn overwritten(&self) -> usize {
        self.count(|e| matches!(e, MergeEvent::Overwritten { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|e| matches!(e, MergeEvent::DuplicateSkipped { .. }))
    }

    fn count(&self, pred: impl Fn(&MergeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

/// Merge `incoming` into `existing` in the incoming batch's order.
///
/// New identifiers are appended. Known identifiers are skipped or replaced
/// according to `policy`; either way one event is recorded per record.
pub fn merge(
    existing: &mut Catalog,
    incoming: Catalog,
    policy: DuplicatePolicy,
) -> Result<MergeReport> {
    let mut report = MergeReport::default();

    for (identifier, record) in incoming {
        match IdempotencyChecker::check_duplicate(existing, &identifier) {
            Ok(()) => {
                debug!(identifier = %identifier, "Inserting new record");
                existing.insert(identifier.clone(), record);
                crate::observability::metrics::merge::record_inserted();
                report.events.push(MergeEvent::Inserted { identifier });
            }
            Err(CatalogError::DuplicateRecord { identifier, title }) => match policy {
                DuplicatePolicy::Skip => {
                    warn!(identifier = %identifier, title = %title, "Duplicate skipped");
                    crate::observability::metrics::merge::duplicate_skipped();
                    report.events.push(MergeEvent::DuplicateSkipped { identifier, title });
                }
                DuplicatePolicy::Overwrite => {
                    let changed = existing
                        .get(&identifier)
                        .map(|current| IdempotencyChecker::record_has_changes(current, &record))
                        .unwrap_or(true);
                    info!(identifier = %identifier, changed, "Overwriting existing record");
                    existing.insert(identifier.clone(), record);
                    crate::observability::metrics::merge::record_overwritten();
                    report.events.push(MergeEvent::Overwritten { identifier, changed });
                }
            },
            Err(other) => return Err(other),
        }
    }

    info!(
        inserted = report.inserted(),
        overwritten = report.overwritten(),
        skipped = report.skipped(),
        "Merge complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::record;

    fn catalog(entries: &[(&str, &str)]) -> Catalog {
        entries
            .iter()
            .map(|(id, title)| (id.to_string(), record(title, id)))
            .collect()
    }

    #[test]
    fn test_disjoint_batches_union() {
        let a = catalog(&[("alien", "Alien"), ("heat", "Heat")]);
        let b = catalog(&[("zodiac", "Zodiac")]);

        let mut merged = Catalog::new();
        merge(&mut merged, a.clone(), DuplicatePolicy::Skip).unwrap();
        let report = merge(&mut merged, b.clone(), DuplicatePolicy::Skip).unwrap();

        assert_eq!(merged.len(), 3);
        for (id, rec) in a.iter().chain(b.iter()) {
            assert_eq!(merged.get(id), Some(rec));
        }
        assert_eq!(report.inserted(), 1);
    }

    #[test]
    fn test_skip_keeps_existing() {
        let mut existing = catalog(&[("alien", "Alien")]);
        let before = existing.clone();
        let mut incoming = catalog(&[("alien", "Alien")]);
        incoming["alien"].data.runtime = 116;

        let report = merge(&mut existing, incoming, DuplicatePolicy::Skip).unwrap();

        assert_eq!(existing, before);
        assert_eq!(
            report.events,
            vec![MergeEvent::DuplicateSkipped {
                identifier: "alien".to_string(),
                title: "Alien".to_string()
            }]
        );
    }

    #[test]
    fn test_overwrite_takes_incoming() {
        let mut existing = catalog(&[("alien", "Alien"), ("heat", "Heat")]);
        let mut incoming = catalog(&[("alien", "Alien"), ("heat", "Heat")]);
        incoming["alien"].data.runtime = 116;

        let report = merge(&mut existing, incoming.clone(), DuplicatePolicy::Overwrite).unwrap();

        assert_eq!(existing["alien"].data.runtime, 116);
        assert_eq!(
            report.events,
            vec![
                MergeEvent::Overwritten {
                    identifier: "alien".to_string(),
                    changed: true
                },
                MergeEvent::Overwritten {
                    identifier: "heat".to_string(),
                    changed: false
                },
            ]
        );
    }

    #[test]
    fn test_events_follow_incoming_order() {
        let mut existing = catalog(&[("heat", "Heat")]);
        let incoming = catalog(&[("zodiac", "Zodiac"), ("heat", "Heat"), ("alien", "Alien")]);

        let report = merge(&mut existing, incoming, DuplicatePolicy::Skip).unwrap();

        let ids: Vec<&str> = report
            .events
            .iter()
            .map(|e| match e {
                MergeEvent::Inserted { identifier }
                | MergeEvent::Overwritten { identifier, .. }
                | MergeEvent::DuplicateSkipped { identifier, .. } => identifier.as_str(),
            })
            .collect();
        assert_eq!(ids, vec!["zodiac", "heat", "alien"]);
        assert_eq!((report.inserted(), report.skipped()), (2, 1));
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(DuplicatePolicy::from_overwrite(false), DuplicatePolicy::Skip);
        assert_eq!(DuplicatePolicy::from_overwrite(true), DuplicatePolicy::Overwrite);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Skip);
    }
}
