//! Linker: materialize merge candidates as symlinks under the install root.
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use crate::error::FsError;
use crate::fsops;
use crate::logging::Log;
use crate::merge::SourceRoots;

/// Link key → absolute source path.
pub type LinkEntries = BTreeMap<String, PathBuf>;

/// Outcome of a [`Linker::link_all`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Entries to persist in the mapping.
    pub entries: LinkEntries,
    /// Symlinks created (or that would be created in dry-run mode).
    pub linked: usize,
    /// Targets skipped because something already existed there.
    pub already_present: usize,
    /// Parent directories created.
    pub dirs_created: usize,
    /// Candidates skipped because their path is not valid UTF-8.
    pub unrecordable: usize,
}

impl LinkReport {
    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} linked, {} already present, {} directories created",
            self.linked, self.already_present, self.dirs_created
        );
        if self.unrecordable > 0 {
            line.push_str(&format!(", {} skipped (not UTF-8)", self.unrecordable));
        }
        line
    }
}

/// Creates one symlink per candidate, never overwriting existing entries.
#[derive(Debug, Clone)]
pub struct Linker {
    install_root: PathBuf,
    dry_run: bool,
}

impl Linker {
    /// Create a linker targeting `install_root`.
    #[must_use]
    pub const fn new(install_root: PathBuf, dry_run: bool) -> Self {
        Self {
            install_root,
            dry_run,
        }
    }

    /// Link every candidate.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::OutsideRoots`] for a candidate under neither root,
    /// or the first directory or symlink creation failure.  Links created
    /// before the failure stay on disk.  Candidates whose path is not valid
    /// UTF-8 are skipped with a warning, never linked.
    pub fn link_all(
        &self,
        candidates: &[PathBuf],
        roots: &SourceRoots,
        log: &dyn Log,
    ) -> Result<LinkReport, FsError> {
        let mut report = LinkReport::default();
        let mut planned_dirs = BTreeSet::new();
        for source in candidates {
            let rel = roots
                .relative_key(source)
                .ok_or_else(|| FsError::OutsideRoots {
                    path: source.clone(),
                    shared: roots.shared.clone(),
                    profile: roots.profile.clone(),
                })?;
            // The mapping stores keys and sources as JSON strings.
            let Some(key) = link_key(rel).filter(|_| source.to_str().is_some()) else {
                report.unrecordable += 1;
                log.warn(&format!(
                    "skipping [{}]: name is not valid UTF-8 and cannot be recorded",
                    source.display()
                ));
                continue;
            };
            let target = self.install_root.join(rel);
            if self.link_one(source, &target, &mut report, &mut planned_dirs, log)? {
                report.entries.insert(key, source.clone());
            }
        }
        Ok(report)
    }

    /// Link `source` at `target`; returns whether the pair belongs in the
    /// mapping.
    fn link_one(
        &self,
        source: &Path,
        target: &Path,
        report: &mut LinkReport,
        planned_dirs: &mut BTreeSet<PathBuf>,
        log: &dyn Log,
    ) -> Result<bool, FsError> {
        if fsops::entry_exists(target) {
            report.already_present += 1;
            log.info(&format!(
                "already exists, skipping [{}] => [{}]",
                source.display(),
                target.display()
            ));
            if fsops::is_link_to(target, source) {
                return Ok(true);
            }
            log.warn(&format!(
                "{} is not a link to {}, leaving it out of the mapping",
                target.display(),
                source.display()
            ));
            return Ok(false);
        }

        if let Some(parent) = target.parent()
            && !fsops::entry_exists(parent)
            && !planned_dirs.contains(parent)
        {
            report.dirs_created += 1;
            if self.dry_run {
                // Dry-run never creates it, so later siblings would count it again.
                planned_dirs.insert(parent.to_path_buf());
                log.dry_run(&format!("would create dir [{}]", parent.display()));
            } else {
                log.info(&format!("making dir [{}]", parent.display()));
                std::fs::create_dir_all(parent).map_err(|e| FsError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        report.linked += 1;
        if self.dry_run {
            log.dry_run(&format!(
                "would link [{}] => [{}]",
                source.display(),
                target.display()
            ));
            return Ok(true);
        }

        log.info(&format!(
            "linking [{}] => [{}]",
            source.display(),
            target.display()
        ));
        fsops::create_symlink(source, target).map_err(|e| FsError::Symlink {
            link: target.to_path_buf(),
            target: source.to_path_buf(),
            source: e,
        })?;
        Ok(true)
    }
}

/// Render a relative path as a `/`-joined link key.
///
/// Returns `None` when a component is not valid UTF-8.
#[must_use]
pub fn link_key(rel: &Path) -> Option<String> {
    let parts = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
