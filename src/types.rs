use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog keyed by identifier. Insertion order is document order.
pub type Catalog = IndexMap<String, MovieRecord>;

/// A non-empty spreadsheet cell, either a single value or a delimited list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    One(String),
    Many(Vec<String>),
}

impl CellValue {
    /// All values as a slice-like list, one element for `One`.
    pub fn values(&self) -> Vec<&str> {
        match self {
            CellValue::One(v) => vec![v.as_str()],
            CellValue::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values().join(" & "))
    }
}

/// One catalog entry as written to the inventory document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub groups: Vec<String>,
    pub data: MovieData,
    pub sort_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieData {
    pub title: String,
    pub year: u16,
    pub runtime: u32,
    pub director: Option<CellValue>,
    pub crew: Crew,
    #[serde(default)]
    pub genres: Vec<String>,
    pub release: Release,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpaa: Option<Mpaa>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    pub writer: Option<CellValue>,
    pub cinematographer: Option<CellValue>,
    pub composer: Option<CellValue>,
    pub editor: Option<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub publisher: String,
    pub discs: u32,
    pub aspect_ratio: f64,
    pub upc: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mpaa {
    pub rating: String,
    pub reason: Option<CellValue>,
    pub distributor: Option<String>,
    pub alt_title: Option<CellValue>,
    pub certificate: u64,
}

impl MovieRecord {
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// One-line summary, e.g. `Alien (1979/117 min/2.39:1) | dir. Ridley Scott [4k_uhd]`.
    pub fn marquee(&self) -> String {
        let director = self
            .data
            .director
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        let media = self.groups.first().map(String::as_str).unwrap_or("");
        format!(
            "{} ({}/{} min/{}:1) | dir. {} [{}]",
            self.data.title,
            self.data.year,
            self.data.runtime,
            self.data.release.aspect_ratio,
            director,
            media
        )
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal record used by unit tests across modules.
    pub fn record(title: &str, sort_key: &str) -> MovieRecord {
        MovieRecord {
            groups: vec!["blu-ray".to_string()],
            data: MovieData {
                title: title.to_string(),
                year: 2000,
                runtime: 100,
                director: Some(CellValue::One("Someone".to_string())),
                crew: Crew {
                    writer: None,
                    cinematographer: None,
                    composer: None,
                    editor: None,
                },
                genres: Vec::new(),
                release: Release {
                    publisher: "Warner".to_string(),
                    discs: 1,
                    aspect_ratio: 1.85,
                    upc: None,
                },
                mpaa: None,
            },
            sort_key: sort_key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marquee_joins_directors() {
        let mut movie = fixtures::record("The Matrix", "matrix");
        movie.groups = vec!["hdr10".to_string(), "steelbook".to_string()];
        movie.data.year = 1999;
        movie.data.runtime = 136;
        movie.data.release.aspect_ratio = 2.39;
        movie.data.director = Some(CellValue::Many(vec![
            "Lana Wachowski".to_string(),
            "Lilly Wachowski".to_string(),
        ]));

        assert_eq!(
            movie.marquee(),
            "The Matrix (1999/136 min/2.39:1) | dir. Lana Wachowski & Lilly Wachowski [hdr10]"
        );
    }

    #[test]
    fn test_mpaa_omitted_from_document_when_absent() {
        let movie = fixtures::record("Alien", "alien");
        let yaml = serde_yaml::to_string(&movie).unwrap();
        assert!(!yaml.contains("mpaa"));
        assert!(yaml.contains("upc: null"));
    }

    #[test]
    fn test_cell_value_shapes_in_document() {
        let one: CellValue = serde_yaml::from_str("Ridley Scott").unwrap();
        assert_eq!(one, CellValue::One("Ridley Scott".to_string()));

        let many: CellValue = serde_yaml::from_str("- A\n- B\n").unwrap();
        assert_eq!(many, CellValue::Many(vec!["A".to_string(), "B".to_string()]));
    }
}
