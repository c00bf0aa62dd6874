use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed row{}: missing required column '{field}'", title_suffix(.title))]
    MalformedRow { field: String, title: Option<String> },

    #[error("Could not parse field '{field}' for '{title}': {value:?}")]
    FieldParse {
        field: String,
        title: String,
        value: String,
    },

    /// Raised by the merger's duplicate check; consumed as a skip, never returned to callers.
    #[error("Duplicate record '{identifier}' ({title})")]
    DuplicateRecord { identifier: String, title: String },

    #[error("Sort keys do not match catalog (missing: {missing:?}, unknown: {unknown:?})")]
    IncompleteSortKeySet {
        missing: Vec<String>,
        unknown: Vec<String>,
    },

    #[error("Identifier '{identifier}' produced by both '{first_title}' and '{second_title}'")]
    IdentifierCollision {
        identifier: String,
        first_title: String,
        second_title: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization failed: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn title_suffix(title: &Option<String>) -> String {
    match title {
        Some(t) => format!(" for '{}'", t),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_row_message_names_title() {
        let err = CatalogError::MalformedRow {
            field: "runtime".to_string(),
            title: Some("Alien".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Malformed row for 'Alien': missing required column 'runtime'"
        );

        let err = CatalogError::MalformedRow {
            field: "title".to_string(),
            title: None,
        };
        assert_eq!(err.to_string(), "Malformed row: missing required column 'title'");
    }

    #[test]
    fn test_field_parse_message_quotes_value() {
        let err = CatalogError::FieldParse {
            field: "releaseYear".to_string(),
            title: "Alien".to_string(),
            value: "nineteen".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not parse field 'releaseYear' for 'Alien': \"nineteen\""
        );
    }
}
