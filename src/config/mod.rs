//! Configuration: profile naming and the rule sets passed to the engine.
//!
//! Read from `<user config dir>/dtm/config.toml` (or `--config`).  Every
//! field is optional; an absent file means the built-in defaults.
pub mod rules;
pub mod toml_loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::merge::SourceRoots;

pub use rules::{CleanRules, IgnoreRules, MergeRules};

/// Loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix joining the source base to a profile directory name.
    pub profile_prefix: String,
    /// Name of the profile holding configuration common to all profiles.
    pub shared_profile: String,
    /// Entry exclusion rules applied by the directory lister.
    pub ignore: IgnoreRules,
    /// Explode rules applied by the tree merger.
    pub merge: MergeRules,
    /// System directory rules applied by the uninstaller.
    pub clean: CleanRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_prefix: "_".to_string(),
            shared_profile: "shared".to_string(),
            ignore: IgnoreRules::default(),
            merge: MergeRules::default(),
            clean: CleanRules::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(path)
    }

    /// Load from `path` when given, else from [`Config::default_path`], else
    /// fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file exists but cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => Self::load(&p),
            None => Ok(Self::default()),
        }
    }

    /// Default location of the config file: `<user config dir>/dtm/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dtm").join("config.toml"))
    }

    /// Build the shared and profile roots for `profile` under `source_base`.
    ///
    /// The shared root is `<source_base>/<prefix><shared_profile>`; the
    /// profile root is `<source_base>/<prefix><profile>`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProfile`] if `profile` is empty, contains
    /// a path separator, or names the shared profile itself.
    pub fn source_roots(&self, source_base: &Path, profile: &str) -> Result<SourceRoots, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidProfile {
            name: profile.to_string(),
            reason: reason.to_string(),
        };
        if profile.trim().is_empty() {
            return Err(invalid("profile name must not be empty"));
        }
        if profile.contains(['/', '\\']) {
            return Err(invalid("profile name must not contain a path separator"));
        }
        if profile == self.shared_profile {
            return Err(invalid("reserved for the shared tree"));
        }

        Ok(SourceRoots {
            shared: source_base.join(format!("{}{}", self.profile_prefix, self.shared_profile)),
            profile: source_base.join(format!("{}{profile}", self.profile_prefix)),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_source_layout() {
        let config = Config::default();
        let roots = config.source_roots(Path::new("/dots"), "work").unwrap();
        assert_eq!(roots.shared, PathBuf::from("/dots/_shared"));
        assert_eq!(roots.profile, PathBuf::from("/dots/_work"));
    }

    #[test]
    fn shared_profile_is_rejected() {
        let err = Config::default()
            .source_roots(Path::new("/dots"), "shared")
            .unwrap_err();
        assert!(err.to_string().contains("reserved"), "got {err}");
    }

    #[test]
    fn empty_and_nested_profiles_are_rejected() {
        let config = Config::default();
        assert!(config.source_roots(Path::new("/dots"), "").is_err());
        assert!(config.source_roots(Path::new("/dots"), "a/b").is_err());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "profile_prefix = \"@\"\n[clean]\nsystem_dirs = [\".config\", \".local\"]\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.profile_prefix, "@");
        assert_eq!(config.shared_profile, "shared");
        assert_eq!(config.ignore, IgnoreRules::default());
        assert_eq!(config.merge, MergeRules::default());
        assert_eq!(
            config.clean.system_dirs,
            vec![PathBuf::from(".config"), PathBuf::from(".local")]
        );
    }

    #[test]
    fn explicit_missing_path_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(&dir.path().join("none.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }
}
