//! Rule sets that steer listing, merging and cleaning.
//!
//! Each rule set is plain data with serde defaults so it can be read from
//! the `[ignore]`, `[merge]` and `[clean]` tables of the config file, or
//! built directly in tests.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Exclusion markers authors place in the source trees.
///
/// Matching entries are never listed, so they are never linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreRules {
    /// Exact entry names to exclude.
    pub names: Vec<String>,
    /// Entry names starting with any of these are excluded.
    pub prefixes: Vec<String>,
    /// Entry names ending with any of these are excluded.
    pub suffixes: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            names: vec![".gitignore".to_string()],
            prefixes: vec!["-".to_string()],
            suffixes: vec!["_IGNORE".to_string()],
        }
    }
}

impl IgnoreRules {
    /// Rules that exclude nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            names: Vec::new(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    /// Whether an entry called `name` must be skipped.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
            || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

/// Which unique directories are linked file-by-file instead of as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRules {
    /// Name suffixes marking a directory as explodable.
    pub explode: Vec<String>,
}

impl Default for MergeRules {
    fn default() -> Self {
        Self {
            explode: vec![".local".to_string()],
        }
    }
}

impl MergeRules {
    /// Whether a directory called `name` is exploded into its files.
    #[must_use]
    pub fn is_explodable(&self, name: &str) -> bool {
        self.explode.iter().any(|marker| name.ends_with(marker.as_str()))
    }
}

/// Install-root-relative prefixes that get wholesale-removal handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanRules {
    /// System directories, checked in order; the first match wins.
    pub system_dirs: Vec<PathBuf>,
}

impl Default for CleanRules {
    fn default() -> Self {
        Self {
            system_dirs: vec![PathBuf::from(".config"), PathBuf::from(".local/bin")],
        }
    }
}

impl CleanRules {
    /// The system directory `key` lives strictly beneath, if any.
    ///
    /// Matching is component-wise, so `.configs/x` is not under `.config`.
    /// A key equal to a system directory is not beneath it.
    #[must_use]
    pub fn system_dir_for(&self, key: &Path) -> Option<&Path> {
        self.system_dirs
            .iter()
            .map(PathBuf::as_path)
            .find(|sd| key != *sd && key.starts_with(sd))
    }
}
