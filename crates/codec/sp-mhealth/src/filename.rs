//! Grammar validation and field extraction for mHealth filenames.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sp_error::FilenameError;
use std::str::FromStr;
use std::sync::LazyLock;

/// Literal suffix every mHealth file carries.
pub const MHEALTH_SUFFIX: &str = ".csv.gz";

/// Number of dot-separated segments in an mHealth filename.
pub const FIELD_COUNT: usize = 6;

const INDEX_SENSOR_TYPE: usize = 0;
const INDEX_SENSOR_ID: usize = 1;
const INDEX_TIMESTAMP: usize = 2;
const INDEX_FILE_KIND: usize = 3;

// ASCII digit classes only; `\d` in `regex` matches any Unicode digit.
// Month, day and hour accept 00-19, 00-39 and 00-29.
pub(crate) const PATTERN_SEGMENT: &str = "[a-zA-Z0-9-]+";
pub(crate) const PATTERN_YEAR: &str = "2[0-9]{3}";
pub(crate) const PATTERN_MONTH: &str = "[0-1][0-9]";
pub(crate) const PATTERN_DAY: &str = "[0-3][0-9]";
pub(crate) const PATTERN_HOUR: &str = "[0-2][0-9]";
pub(crate) const PATTERN_MINUTE: &str = "[0-5][0-9]";
pub(crate) const PATTERN_SECOND: &str = "[0-5][0-9]";
pub(crate) const PATTERN_MILLISECOND: &str = "[0-9]{3}";
pub(crate) const PATTERN_TIMEZONE: &str = "[PM][0-1][0-9][0-5][0-9]";
const PATTERN_FILE_KIND: &str = "(?:sensor|annotation|event)";

/// Timestamp segment pattern, unanchored.
pub(crate) fn timestamp_pattern() -> String {
    format!(
        "{PATTERN_YEAR}-{PATTERN_MONTH}-{PATTERN_DAY}-{PATTERN_HOUR}-{PATTERN_MINUTE}-{PATTERN_SECOND}-{PATTERN_MILLISECOND}-{PATTERN_TIMEZONE}"
    )
}

static MHEALTH_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^{seg}\.{seg}\.{ts}\.{kind}\.csv\.gz$",
        seg = PATTERN_SEGMENT,
        ts = timestamp_pattern(),
        kind = PATTERN_FILE_KIND,
    );
    Regex::new(&pattern).expect("mHealth filename pattern compiles")
});

/// Check a filename against the full mHealth grammar.
///
/// The match is anchored at both ends, so a valid name embedded in a longer
/// string is rejected. Never panics.
///
/// # Example
///
/// ```
/// use sp_mhealth::is_valid;
///
/// assert!(is_valid("Battery.1112223333-Battery.2016-01-22-19-22-34-310-M0500.event.csv.gz"));
/// assert!(!is_valid("Battery.1112223333-Battery.2016-01-22-19-22-34-310-M0500.event.csv"));
/// ```
pub fn is_valid(filename: &str) -> bool {
    MHEALTH_FILENAME.is_match(filename)
}

/// Return field `index` of the dot-split filename, or `""`.
///
/// Only the suffix and the segment count are checked; the grammar is not.
/// Any precondition failure (index above 5, no `.csv.gz` suffix, segment
/// count other than 6) yields the empty string. Use [`try_extract_field`]
/// to tell these cases apart.
pub fn extract_field(filename: &str, index: usize) -> &str {
    try_extract_field(filename, index).unwrap_or("")
}

/// Return field `index` of the dot-split filename.
///
/// Empty segments between consecutive dots are dropped before counting.
pub fn try_extract_field(filename: &str, index: usize) -> Result<&str, FilenameError> {
    if index >= FIELD_COUNT {
        return Err(FilenameError::IndexOutOfRange(index));
    }
    if !filename.ends_with(MHEALTH_SUFFIX) {
        return Err(FilenameError::MissingSuffix);
    }

    let tokens: Vec<&str> = split_segments(filename).collect();
    if tokens.len() != FIELD_COUNT {
        return Err(FilenameError::SegmentCount(tokens.len()));
    }

    Ok(tokens[index])
}

fn split_segments(filename: &str) -> impl Iterator<Item = &str> {
    filename.split('.').filter(|s| !s.is_empty())
}

/// Sensor/data type and version descriptor (field 0).
pub fn sensor_type_and_version(filename: &str) -> &str {
    extract_field(filename, INDEX_SENSOR_TYPE)
}

/// Sensor or serial identifier (field 1).
pub fn sensor_id(filename: &str) -> &str {
    extract_field(filename, INDEX_SENSOR_ID)
}

/// Timestamp token (field 2).
pub fn timestamp_token(filename: &str) -> &str {
    extract_field(filename, INDEX_TIMESTAMP)
}

/// File kind token (field 3).
pub fn file_kind(filename: &str) -> &str {
    extract_field(filename, INDEX_FILE_KIND)
}

/// Semantic content of an mHealth file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Raw sensor samples
    Sensor,
    /// Labels attached to time ranges
    Annotation,
    /// Discrete device events
    Event,
}

impl FileKind {
    /// Token used in filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Annotation => "annotation",
            Self::Event => "event",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = FilenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensor" => Ok(Self::Sensor),
            "annotation" => Ok(Self::Annotation),
            "event" => Ok(Self::Event),
            other => Err(FilenameError::InvalidKind(other.to_string())),
        }
    }
}

/// Typed view of a grammar-valid mHealth filename.
///
/// Borrows its fields from the input; construct with [`MHealthFilename::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MHealthFilename<'a> {
    raw: &'a str,
    sensor_type_and_version: &'a str,
    sensor_id: &'a str,
    timestamp: &'a str,
    kind: FileKind,
}

impl<'a> MHealthFilename<'a> {
    /// Parse a filename, rejecting anything the grammar rejects.
    pub fn parse(filename: &'a str) -> Result<Self, FilenameError> {
        if !is_valid(filename) {
            return Err(FilenameError::Grammar(filename.to_string()));
        }

        Ok(Self {
            raw: filename,
            sensor_type_and_version: try_extract_field(filename, INDEX_SENSOR_TYPE)?,
            sensor_id: try_extract_field(filename, INDEX_SENSOR_ID)?,
            timestamp: try_extract_field(filename, INDEX_TIMESTAMP)?,
            kind: try_extract_field(filename, INDEX_FILE_KIND)?.parse()?,
        })
    }

    /// Parse the basename of a path or object key.
    pub fn parse_basename(path: &'a str) -> Result<Self, FilenameError> {
        let basename = path.rsplit('/').next().unwrap_or(path);
        Self::parse(basename)
    }

    /// The full filename.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn sensor_type_and_version(&self) -> &'a str {
        self.sensor_type_and_version
    }

    pub fn sensor_id(&self) -> &'a str {
        self.sensor_id
    }

    pub fn timestamp(&self) -> &'a str {
        self.timestamp
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// The six dot-separated segments, in order.
    pub fn segments(&self) -> [&'a str; FIELD_COUNT] {
        [
            self.sensor_type_and_version,
            self.sensor_id,
            self.timestamp,
            self.kind.as_str(),
            "csv",
            "gz",
        ]
    }
}

impl std::fmt::Display for MHealthFilename<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw)
    }
}
