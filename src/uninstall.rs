//! Uninstaller: undo an installation recorded in a [`Mapping`].
//!
//! Exploded directories were never linked as a unit, only their files were,
//! so the mapping alone cannot say whether `.local/bin/a` came from an
//! exploded `bin` directory or from a single link.  The live filesystem
//! decides: under a system directory, a first path segment that is a real
//! directory is removed wholesale; otherwise only the link goes.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::CleanRules;
use crate::error::FsError;
use crate::fsops;
use crate::logging::Log;
use crate::mapping::Mapping;

/// Outcome of a [`Uninstaller::clean`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Paths removed (or that would be removed in dry-run mode).
    pub removed: Vec<PathBuf>,
}

impl CleanReport {
    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} removed", self.removed.len())
    }
}

/// Resolves and removes the artifacts of one installation.
#[derive(Debug, Clone, Default)]
pub struct Uninstaller {
    rules: CleanRules,
}

impl Uninstaller {
    /// Create an uninstaller using `rules` for system-directory handling.
    #[must_use]
    pub const fn new(rules: CleanRules) -> Self {
        Self { rules }
    }

    /// The single path to remove for `key`.
    #[must_use]
    pub fn removal_target(&self, install_root: &Path, key: &str) -> PathBuf {
        let key = Path::new(key);
        let link = install_root.join(key);
        let Some(sd) = self.rules.system_dir_for(key) else {
            return link;
        };
        let Some(first_part) = key
            .strip_prefix(sd)
            .ok()
            .and_then(|rest| rest.components().next())
        else {
            return link;
        };

        let candidate_dir = install_root.join(sd).join(first_part);
        if candidate_dir.is_dir() {
            candidate_dir
        } else {
            link
        }
    }

    /// Every path Clean removes for `mapping`, deduplicated.
    #[must_use]
    pub fn removal_targets(&self, mapping: &Mapping) -> BTreeSet<PathBuf> {
        mapping
            .entries
            .keys()
            .map(|key| self.removal_target(&mapping.install_root, key))
            .collect()
    }

    /// Remove every artifact of `mapping`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Remove`] for the first path that cannot be
    /// removed; paths removed before it stay removed.
    pub fn clean(
        &self,
        mapping: &Mapping,
        dry_run: bool,
        log: &dyn Log,
    ) -> Result<CleanReport, FsError> {
        let mut report = CleanReport::default();
        for target in self.removal_targets(mapping) {
            if dry_run {
                log.dry_run(&format!("would remove [{}]", target.display()));
            } else {
                fsops::remove_all(&target).map_err(|e| FsError::Remove {
                    path: target.clone(),
                    source: e,
                })?;
                log.info(&format!("removed [{}]", target.display()));
            }
            report.removed.push(target);
        }
        Ok(report)
    }
}
