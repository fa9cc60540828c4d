//! The `install` subcommand: merge source trees and create symlinks.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::Config;
use crate::error::{DtmError, EnvironmentError, FsError, MappingError};
use crate::fsops;
use crate::link::{LinkReport, Linker};
use crate::logging::{Log, Logger, version};
use crate::mapping::{JsonMappingStore, Mapping, MappingStore};
use crate::merge::TreeMerger;

/// Inputs of one Install run.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Profile overlaid on the shared tree.
    pub profile: String,
    /// Directory holding the profile trees; the current directory if `None`.
    pub source: Option<PathBuf>,
    /// Directory to install into; the home directory if `None`.
    pub target: Option<PathBuf>,
    /// Log what would happen without touching the filesystem.
    pub dry_run: bool,
}

/// Outcome of one Install run.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// The mapping that was (or, in dry-run mode, would have been) saved.
    pub mapping: Mapping,
    /// Link counters.
    pub links: LinkReport,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading, path resolution, linking or
/// saving the mapping fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    log.info(&format!("dtm {}", version()));
    let config = super::load_config(global, log)?;
    let store = JsonMappingStore::at_default_location()?;
    log.debug(&format!("mapping file: {}", store.path().display()));

    let request = InstallRequest {
        profile: opts.profile.clone(),
        source: opts.source.clone(),
        target: opts.target.clone(),
        dry_run: global.dry_run,
    };
    let report = install(&config, &request, &store, log)
        .with_context(|| format!("failed to install profile '{}'", opts.profile))?;

    log.print_summary(&report.links.summary());
    Ok(())
}

/// Merge the shared and profile trees, link the result under the target
/// directory and persist the mapping.
///
/// The mapping is saved exactly once, after every link succeeded, and never
/// in dry-run mode.  It replaces whatever mapping was stored before.
///
/// # Errors
///
/// Returns [`DtmError`] if the profile name is invalid, a directory cannot be
/// resolved, any directory or symlink creation fails, or the mapping cannot
/// be saved.  Links created before a failure are left in place.
pub fn install(
    config: &Config,
    request: &InstallRequest,
    store: &dyn MappingStore,
    log: &dyn Log,
) -> Result<InstallReport, DtmError> {
    log.stage("Resolving directories");
    let source_base = resolve_source(request.source.as_deref())?;
    let roots = config.source_roots(&source_base, &request.profile)?;
    log.info(&format!("shared: {}", roots.shared.display()));
    log.info(&format!("profile: {}", roots.profile.display()));
    ensure_recordable(&roots.shared)?;
    ensure_recordable(&roots.profile)?;
    let install_root = prepare_target(request.target.as_deref(), request.dry_run, log)?;
    log.info(&format!("target: {}", install_root.display()));
    ensure_recordable(&install_root)?;

    log.stage("Merging source trees");
    let merger = TreeMerger::new(config.ignore.clone(), config.merge.clone());
    let candidates = merger.merge(&roots, log);
    log.info(&format!("{} link candidate(s)", candidates.len()));

    log.stage("Linking");
    let links = Linker::new(install_root.clone(), request.dry_run).link_all(
        &candidates,
        &roots,
        log,
    )?;

    let mapping = Mapping {
        sources: roots,
        install_root,
        entries: links.entries.clone(),
    };

    log.stage("Saving mapping");
    if request.dry_run {
        log.dry_run(&format!(
            "would save mapping with {} entries",
            mapping.entries.len()
        ));
    } else {
        warn_if_replacing_other_install(store, &mapping, log);
        store.save(&mapping)?;
        log.info(&format!("saved mapping with {} entries", mapping.entries.len()));
    }

    Ok(InstallReport { mapping, links })
}

/// Resolve the source base to an absolute, canonical directory.
///
/// # Errors
///
/// Returns [`EnvironmentError`] if the current directory is unavailable or
/// the path does not exist.
pub fn resolve_source(source: Option<&Path>) -> Result<PathBuf, EnvironmentError> {
    let base = match source {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().map_err(EnvironmentError::CurrentDir)?,
    };
    dunce::canonicalize(&base).map_err(|e| EnvironmentError::Resolve {
        path: base,
        source: e,
    })
}

/// Resolve the install root, creating it when absent.
fn prepare_target(target: Option<&Path>, dry_run: bool, log: &dyn Log) -> Result<PathBuf, DtmError> {
    let target = match target {
        Some(p) => p.to_path_buf(),
        None => dirs::home_dir().ok_or(EnvironmentError::HomeDirUnavailable)?,
    };

    if !fsops::entry_exists(&target) {
        if dry_run {
            log.dry_run(&format!("would create dir [{}]", target.display()));
            return std::path::absolute(&target).map_err(|e| {
                EnvironmentError::Resolve {
                    path: target.clone(),
                    source: e,
                }
                .into()
            });
        }
        log.info(&format!("making dir [{}]", target.display()));
        std::fs::create_dir_all(&target).map_err(|e| FsError::CreateDir {
            path: target.clone(),
            source: e,
        })?;
    }

    dunce::canonicalize(&target).map_err(|e| {
        EnvironmentError::Resolve {
            path: target.clone(),
            source: e,
        }
        .into()
    })
}

/// The mapping is JSON, so every path it records must be valid UTF-8.
fn ensure_recordable(path: &Path) -> Result<(), MappingError> {
    if path.to_str().is_some() {
        Ok(())
    } else {
        Err(MappingError::NotUtf8 {
            path: path.to_path_buf(),
        })
    }
}

/// A new mapping replaces the old one wholesale; links recorded only in the
/// old one can no longer be cleaned.
///
/// The read is advisory: a missing or unreadable previous mapping never
/// stops the install.
fn warn_if_replacing_other_install(store: &dyn MappingStore, next: &Mapping, log: &dyn Log) {
    if !store.exists() {
        return;
    }
    match store.load() {
        Ok(previous) if previous.differs_in_origin(next) => log.warn(&format!(
            "replacing mapping of a previous install into {} from {} and {}; \
             its links will no longer be removed by clean",
            previous.install_root.display(),
            previous.sources.shared.display(),
            previous.sources.profile.display()
        )),
        Ok(_) => {}
        Err(e) => log.debug(&format!("previous mapping unreadable: {e}")),
    }
}
