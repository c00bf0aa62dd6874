use std::str::FromStr;
use tracing::{debug, instrument, warn};

use crate::config::ReferenceTables;
use crate::constants::*;
use crate::error::{CatalogError, Result};
use crate::pipeline::ingestion::Row;
use crate::pipeline::processing::normalize::{
    apply_override, canonicalize, is_false, is_true, normalize, sort_key,
};
use crate::types::{Catalog, Crew, MovieData, MovieRecord, Mpaa, Release};

/// Builds catalog records from spreadsheet rows using injected reference tables.
pub struct RecordBuilder<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    /// Build one record, returning it with its identifier.
    #[instrument(skip_all, fields(title = row.get(TITLE).unwrap_or_default()))]
    pub fn build_record(&self, row: &Row) -> Result<(String, MovieRecord)> {
        let title = row.require(TITLE)?;
        let identifier = canonicalize(title);
        let sort_key = apply_override(sort_key(title), &self.tables.sort_overrides);

        let record = MovieRecord {
            groups: self.groups(row)?,
            data: MovieData {
                title: title.to_string(),
                year: parse_field(row, RELEASE_YEAR, title)?,
                runtime: parse_field(row, RUNTIME, title)?,
                director: normalize(row.require(DIRECTOR)?, LIST_DELIMITER),
                crew: Crew {
                    writer: normalize(row.require(WRITER)?, LIST_DELIMITER),
                    cinematographer: normalize(row.require(CINEMATOGRAPHER)?, LIST_DELIMITER),
                    composer: normalize(row.require(COMPOSER)?, LIST_DELIMITER),
                    editor: normalize(row.require(EDITOR)?, LIST_DELIMITER),
                },
                genres: self.genres(row),
                release: self.release(row, &identifier, title)?,
                mpaa: mpaa(row, title)?,
            },
            sort_key,
        };

        debug!(identifier = %identifier, sort_key = %record.sort_key, "Built record");
        Ok((identifier, record))
    }

    /// Build a batch in row order. Two rows sharing an identifier abort the batch.
    pub fn build_catalog(&self, rows: &[Row]) -> Result<Catalog> {
        let mut catalog = Catalog::with_capacity(rows.len());
        for row in rows {
            let (identifier, record) = match self.build_record(row) {
                Ok(built) => built,
                Err(e) => {
                    crate::observability::metrics::build::record_failed();
                    return Err(e);
                }
            };
            if let Some(existing) = catalog.get(&identifier) {
                crate::observability::metrics::build::record_failed();
                return Err(CatalogError::IdentifierCollision {
                    identifier,
                    first_title: existing.data.title.clone(),
                    second_title: record.data.title,
                });
            }
            catalog.insert(identifier, record);
            crate::observability::metrics::build::record_built();
        }
        Ok(catalog)
    }

    /// Classification tags, in fixed order. An HDR tier replaces the format tag.
    fn groups(&self, row: &Row) -> Result<Vec<String>> {
        let mut groups = Vec::new();

        let hdr = row.require(HDR)?.to_lowercase();
        let format = row.require(FORMAT)?;
        if hdr == HDR_DOLBY_VISION {
            groups.push(GROUP_HDR10_DV.to_string());
        } else if hdr == HDR_HDR10 {
            groups.push(GROUP_HDR10.to_string());
        } else {
            groups.push(format.to_lowercase());
        }

        if is_false(row.require(COLOR)?) {
            groups.push(GROUP_BLACK_WHITE.to_string());
        }
        if is_true(row.require(ANIMATION)?) {
            groups.push(GROUP_ANIMATION.to_string());
        }
        if self.tables.boutiques.contains(row.require(PUBLISHER)?) {
            groups.push(GROUP_BOUTIQUE.to_string());
        }
        if is_true(row.require(STEELBOOK)?) {
            groups.push(GROUP_STEELBOOK.to_string());
        }
        if is_true(row.require(SLIPCOVER)?) {
            groups.push(GROUP_SLIPCOVER.to_string());
        }
        if is_true(row.require(CASE_REPLACEMENT)?) {
            groups.push(GROUP_CASE_REPLACEMENT.to_string());
        }

        Ok(groups)
    }

    /// Valid genres flagged on the row, in reference order. Columns missing
    /// from this spreadsheet version are skipped.
    fn genres(&self, row: &Row) -> Vec<String> {
        self.tables
            .valid_genres
            .iter()
            .filter(|genre| row.get(genre).is_some_and(is_true))
            .cloned()
            .collect()
    }

    fn release(&self, row: &Row, identifier: &str, title: &str) -> Result<Release> {
        Ok(Release {
            publisher: row.require(PUBLISHER)?.to_string(),
            discs: parse_field(row, DISCS, title)?,
            aspect_ratio: parse_ratio(row, ASPECT_RATIO, title)?,
            upc: self.resolve_upc(row, identifier),
        })
    }

    /// Row UPC, then barcode override, then none.
    fn resolve_upc(&self, row: &Row, identifier: &str) -> Option<u64> {
        if let Some(raw) = row.get(UPC).map(str::trim).filter(|raw| !raw.is_empty()) {
            match raw.parse::<u64>() {
                Ok(upc) => return Some(upc),
                Err(_) => {
                    warn!(identifier, value = raw, "Unparseable UPC, falling back to barcode table")
                }
            }
        }

        let upc = self.tables.barcode_overrides.get(identifier).copied();
        if upc.is_none() {
            debug!(identifier, "No UPC available");
            crate::observability::metrics::build::upc_fallback();
        }
        upc
    }
}

/// MPAA block, present only when the row carries a rating.
fn mpaa(row: &Row, title: &str) -> Result<Option<Mpaa>> {
    let rating = match row.get(MPAA).and_then(|cell| normalize(cell, LIST_DELIMITER)) {
        Some(rating) => rating.to_string().to_uppercase(),
        None => return Ok(None),
    };

    Ok(Some(Mpaa {
        rating,
        reason: row.get(MPAA_REASON).and_then(|cell| normalize(cell, PROSE_DELIMITER)),
        distributor: row.get(DISTRIBUTOR).map(str::to_string),
        alt_title: row.get(ALT_TITLE).and_then(|cell| normalize(cell, PROSE_DELIMITER)),
        certificate: parse_field(row, MPAA_CERT, title)?,
    }))
}

/// Parse a required numeric column, reporting the raw value on failure.
fn parse_field<T: FromStr>(row: &Row, field: &str, title: &str) -> Result<T> {
    let raw = row.require(field)?;
    raw.trim().parse::<T>().map_err(|_| CatalogError::FieldParse {
        field: field.to_string(),
        title: title.to_string(),
        value: raw.to_string(),
    })
}

/// Parse a decimal column, rejecting `NaN` and infinities.
fn parse_ratio(row: &Row, field: &str, title: &str) -> Result<f64> {
    let ratio: f64 = parse_field(row, field, title)?;
    if ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(CatalogError::FieldParse {
            field: field.to_string(),
            title: title.to_string(),
            value: row.require(field)?.to_string(),
        })
    }
}
