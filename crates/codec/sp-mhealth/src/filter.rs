//! Selecting mHealth files by basename pattern and file kind.

use glob::Pattern;
use sp_error::{Result, SpError};
use std::path::Path;

use crate::filename::{FileKind, MHealthFilename};

/// A filter over paths or object keys that only passes valid mHealth names.
///
/// Matches against the basename (after the last `/`). A name passes when it
/// satisfies the grammar, matches the optional glob pattern, and has one of
/// the allowed kinds (all kinds when none are configured).
///
/// # Example
///
/// ```
/// use sp_mhealth::{FileKind, FilenameFilter};
///
/// let filter = FilenameFilter::new()
///     .with_pattern("iPhone-*").unwrap()
///     .with_kind(FileKind::Sensor);
///
/// assert!(filter.matches_key(
///     "up/iPhone-STEPS-iOSx9x1.1112223333-STEPS.2016-01-22-19-22-34-310-M0500.sensor.csv.gz"
/// ));
/// assert!(!filter.matches_key(
///     "Battery.1112223333-Battery.2016-01-22-19-22-34-310-M0500.event.csv.gz"
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilenameFilter {
    pattern: Option<Pattern>,
    kinds: Vec<FileKind>,
}

impl FilenameFilter {
    /// Create a filter passing every valid mHealth filename.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to basenames matching a glob pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let compiled = Pattern::new(pattern)
            .map_err(|e| SpError::Config(format!("Invalid glob pattern '{pattern}': {e}")))?;
        self.pattern = Some(compiled);
        Ok(self)
    }

    /// Allow a file kind. May be called repeatedly.
    pub fn with_kind(mut self, kind: FileKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Check a key or `/`-separated path.
    pub fn matches_key(&self, key: &str) -> bool {
        let filename = key.rsplit('/').next().unwrap_or(key);
        let Ok(parsed) = MHealthFilename::parse(filename) else {
            return false;
        };

        if let Some(pattern) = &self.pattern {
            if !pattern.matches(filename) {
                return false;
            }
        }

        self.kinds.is_empty() || self.kinds.contains(&parsed.kind())
    }

    /// Check a filesystem path.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.matches_key(name))
    }

    /// Human-readable description for logs.
    pub fn description(&self) -> String {
        let pattern = self.pattern.as_ref().map_or("*", |p| p.as_str());
        if self.kinds.is_empty() {
            format!("mhealth(pattern='{pattern}')")
        } else {
            let kinds: Vec<&str> = self.kinds.iter().map(|k| k.as_str()).collect();
            format!("mhealth(pattern='{pattern}', kinds={kinds:?})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SENSOR_FILE: &str =
        "iPhone-STEPS-iOSx9x1.1112223333-STEPS.2016-01-22-19-22-34-310-M0500.sensor.csv.gz";
    const EVENT_FILE: &str =
        "Battery.1112223333-Battery.2016-01-22-19-22-34-310-M0500.event.csv.gz";

    #[test]
    fn test_default_passes_valid_names_only() {
        let filter = FilenameFilter::new();

        assert!(filter.matches_key(SENSOR_FILE));
        assert!(filter.matches_key(EVENT_FILE));
        assert!(!filter.matches_key("notes.txt"));
        assert!(!filter.matches_key(SENSOR_FILE.trim_end_matches(".gz")));
    }

    #[test]
    fn test_matches_basename_of_key() {
        let filter = FilenameFilter::new();
        assert!(filter.matches_key(&format!("production/UPLOADS/7/{SENSOR_FILE}")));
    }

    #[test]
    fn test_pattern_restricts() {
        let filter = FilenameFilter::new().with_pattern("Battery.*").unwrap();

        assert!(filter.matches_key(EVENT_FILE));
        assert!(!filter.matches_key(SENSOR_FILE));
    }

    #[test]
    fn test_pattern_cannot_admit_invalid_names() {
        let filter = FilenameFilter::new().with_pattern("*").unwrap();
        assert!(!filter.matches_key("anything.csv.gz"));
    }

    #[test]
    fn test_kinds() {
        let filter = FilenameFilter::new()
            .with_kind(FileKind::Event)
            .with_kind(FileKind::Event);

        assert!(filter.matches_key(EVENT_FILE));
        assert!(!filter.matches_key(SENSOR_FILE));
        assert_eq!(filter.description(), "mhealth(pattern='*', kinds=[\"event\"])");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FilenameFilter::new().with_pattern("[invalid").is_err());
    }

    #[test]
    fn test_matches_path() {
        let filter = FilenameFilter::new();
        let path: PathBuf = ["samples", SENSOR_FILE].iter().collect();

        assert!(filter.matches_path(&path));
        assert!(!filter.matches_path(Path::new("samples")));
    }

    #[test]
    fn test_description_without_kinds() {
        let filter = FilenameFilter::new().with_pattern("*.sensor.csv.gz").unwrap();
        assert_eq!(filter.description(), "mhealth(pattern='*.sensor.csv.gz')");
    }
}
