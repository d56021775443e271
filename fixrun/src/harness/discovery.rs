//! Fixture discovery.
//!
//! Fixtures are the regular files directly inside the fixture directory whose
//! name ends with the configured extension. Listing order is whatever the
//! filesystem yields; callers that need a stable order sort the result.

use std::fs::ReadDir;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{HarnessError, Result};

/// A source file under test.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixture {
    path: PathBuf,
}

impl Fixture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The identity printed in reports: the path as discovered.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// The bare file name, used for filtering.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lazy iterator over the fixtures of one directory.
#[derive(Debug)]
pub struct Fixtures {
    entries: ReadDir,
    suffix: String,
    filter: Option<Regex>,
}

impl Fixtures {
    /// Keep only fixtures whose file name matches `filter`.
    pub fn with_filter(mut self, filter: Option<Regex>) -> Self {
        self.filter = filter;
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
            return false;
        };
        if !name.ends_with(&self.suffix) {
            return false;
        }
        self.filter
            .as_ref()
            .map_or(true, |filter| filter.is_match(&name))
    }
}

impl Iterator for Fixtures {
    type Item = Fixture;

    fn next(&mut self) -> Option<Fixture> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let is_file = entry.file_type().map(|kind| kind.is_file()).unwrap_or(false);
            let path = entry.path();
            if is_file && self.accepts(&path) {
                return Some(Fixture::new(path));
            }
        }
    }
}

/// Enumerate fixtures in `dir` whose file name ends with `.{extension}`.
///
/// Fails only when the directory itself cannot be listed.
pub fn discover_fixtures(dir: &Path, extension: &str) -> Result<Fixtures> {
    let entries = std::fs::read_dir(dir).map_err(|source| HarnessError::Discovery {
        path: dir.to_path_buf(),
        source,
    })?;

    Ok(Fixtures {
        entries,
        suffix: format!(".{}", extension.trim_start_matches('.')),
        filter: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in ["one.hs", "two.hs", "three.hs", "notes.txt", "hs"] {
            std::fs::write(dir.path().join(name), "-- OUT(x)").unwrap();
        }
        dir
    }

    fn sorted_names(fixtures: Fixtures) -> Vec<String> {
        let mut names: Vec<String> = fixtures.map(|fixture| fixture.file_name()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_discovers_only_matching_extension() {
        let dir = setup_fixture_dir();
        let fixtures = discover_fixtures(dir.path(), "hs").unwrap();
        assert_eq!(sorted_names(fixtures), vec!["one.hs", "three.hs", "two.hs"]);
    }

    #[test]
    fn test_extension_with_leading_dot() {
        let dir = setup_fixture_dir();
        let fixtures = discover_fixtures(dir.path(), ".hs").unwrap();
        assert_eq!(fixtures.count(), 3);
    }

    #[test]
    fn test_skips_directories() {
        let dir = setup_fixture_dir();
        std::fs::create_dir(dir.path().join("nested.hs")).unwrap();
        std::fs::write(dir.path().join("nested.hs").join("inner.hs"), "").unwrap();

        let fixtures = discover_fixtures(dir.path(), "hs").unwrap();
        assert_eq!(fixtures.count(), 3);
    }

    #[test]
    fn test_filter_narrows_by_file_name() {
        let dir = setup_fixture_dir();
        let filter = Regex::new("^t").unwrap();
        let fixtures = discover_fixtures(dir.path(), "hs")
            .unwrap()
            .with_filter(Some(filter));
        assert_eq!(sorted_names(fixtures), vec!["three.hs", "two.hs"]);
    }

    #[test]
    fn test_fixture_paths_are_inside_dir() {
        let dir = setup_fixture_dir();
        for fixture in discover_fixtures(dir.path(), "hs").unwrap() {
            assert_eq!(fixture.path().parent(), Some(dir.path()));
            assert!(fixture.name().ends_with(".hs"));
        }
    }

    #[test]
    fn test_missing_directory_is_discovery_error() {
        let result = discover_fixtures(Path::new("/nonexistent/fixtures"), "hs");
        assert!(matches!(result, Err(HarnessError::Discovery { .. })));
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(discover_fixtures(dir.path(), "hs").unwrap().count(), 0);
    }
}
