//! Configuration for applying codemods to a directory.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use gocodemod_engine::MatchMode;

use crate::error::{ApplyError, ApplyResult};

/// What to walk and which text replacements to make.
///
/// Every field has a default, so `{}` is a valid config:
///
/// ```
/// use gocodemod::ApplyConfig;
///
/// let config = ApplyConfig::from_json_str(r#"{"replacements": {"v1": "v2"}}"#).unwrap();
/// assert_eq!(config.skip, ["vendor"]);
/// assert_eq!(config.replacements["v1"], "v2");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplyConfig {
    /// Directory to walk.
    pub root: PathBuf,
    /// Paths containing any of these strings are left alone.
    pub skip: Vec<String>,
    /// Regex pattern to replacement, applied in order to every file before
    /// Go files are parsed. Replacements may use `$1`-style captures.
    pub replacements: IndexMap<String, String>,
    /// How statement-level edits pick their targets.
    pub match_mode: MatchMode,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        ApplyConfig {
            root: PathBuf::from("./"),
            skip: vec!["vendor".to_string()],
            replacements: IndexMap::new(),
            match_mode: MatchMode::default(),
        }
    }
}

impl ApplyConfig {
    /// A default config walking `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        ApplyConfig {
            root: root.into(),
            ..ApplyConfig::default()
        }
    }

    pub fn from_json_str(json: &str) -> ApplyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> ApplyResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| ApplyError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Add a replacement, keeping insertion order.
    pub fn with_replacement(mut self, pattern: &str, replacement: &str) -> Self {
        self.replacements
            .insert(pattern.to_string(), replacement.to_string());
        self
    }

    /// Whether `relative` (a path below the root) should be skipped.
    pub(crate) fn skips(&self, relative: &Path) -> bool {
        let text = relative.to_string_lossy();
        self.skip.iter().any(|s| text.contains(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApplyConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ApplyConfig::default());
        assert_eq!(config.root, PathBuf::from("./"));
        assert_eq!(config.match_mode, MatchMode::Identity);
    }

    #[test]
    fn test_replacements_keep_order() {
        let config = ApplyConfig::from_json_str(
            r#"{"root": "repo", "replacements": {"b": "1", "a": "2"}, "match_mode": "structural"}"#,
        )
        .unwrap();
        let patterns: Vec<&str> = config.replacements.keys().map(String::as_str).collect();
        assert_eq!(patterns, ["b", "a"]);
        assert_eq!(config.root, PathBuf::from("repo"));
        assert_eq!(config.match_mode, MatchMode::Structural);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(
            ApplyConfig::from_json_str(r#"{"roots": "x"}"#),
            Err(ApplyError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ApplyConfig::from_json_file(Path::new("/nonexistent/gocodemod.json")).unwrap_err();
        assert!(matches!(err, ApplyError::Io { .. }));
    }

    #[test]
    fn test_skips() {
        let config = ApplyConfig::for_root("repo");
        assert!(config.skips(Path::new("vendor/pkg/a.go")));
        assert!(!config.skips(Path::new("src/main.go")));
        let config = config.with_replacement("x", "y");
        assert_eq!(config.replacements.len(), 1);
    }
}
