//! Column names used by the collection spreadsheet.
//! Required columns must be present on every row; optional ones may be missing
//! from older spreadsheet versions.

// Required columns
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";
pub const WRITER: &str = "writer";
pub const CINEMATOGRAPHER: &str = "cinematographer";
pub const COMPOSER: &str = "composer";
pub const EDITOR: &str = "editor";
pub const FORMAT: &str = "format";
pub const COLOR: &str = "color";
pub const ANIMATION: &str = "animation";
pub const HDR: &str = "hdr";
pub const PUBLISHER: &str = "publisher";
pub const STEELBOOK: &str = "steelbook";
pub const SLIPCOVER: &str = "slipcover";
pub const CASE_REPLACEMENT: &str = "caseReplacement";
pub const RELEASE_YEAR: &str = "releaseYear";
pub const RUNTIME: &str = "runtime";
pub const ASPECT_RATIO: &str = "aspectRatio";
pub const DISCS: &str = "discs";

// Optional columns
pub const UPC: &str = "upc";
pub const MPAA: &str = "mpaa";
pub const MPAA_REASON: &str = "mpaa_reason";
pub const MPAA_CERT: &str = "mpaa_cert";
pub const DISTRIBUTOR: &str = "distributor";
pub const ALT_TITLE: &str = "alt_title";

/// Delimiter for multi-valued crew cells.
pub const LIST_DELIMITER: &str = ",";
/// Delimiter for MPAA prose cells, which contain commas themselves.
pub const PROSE_DELIMITER: &str = "; ";

// Group tags
pub const GROUP_HDR10_DV: &str = "hdr10_dv";
pub const GROUP_HDR10: &str = "hdr10";
pub const GROUP_BLACK_WHITE: &str = "black_white";
pub const GROUP_ANIMATION: &str = "animation";
pub const GROUP_BOUTIQUE: &str = "boutique";
pub const GROUP_STEELBOOK: &str = "steelbook";
pub const GROUP_SLIPCOVER: &str = "slipcover";
pub const GROUP_CASE_REPLACEMENT: &str = "case_replacement";

// Recognised `hdr` column values, compared lower-cased
pub const HDR_DOLBY_VISION: &str = "dolby vision";
pub const HDR_HDR10: &str = "hdr10";

/// Default reference config location, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "archives/tech_specs.toml";

/// Suffix appended to a catalog path to form its release candidate.
pub const RELEASE_CANDIDATE_SUFFIX: &str = ".rc";
