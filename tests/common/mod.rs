// Shared helpers for integration tests.
//
// Provides a temporary source tree pair plus target directory, a fluent
// builder to populate them, and an in-memory log so each test can inspect
// the audit trail without installing a tracing subscriber.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dtm_cli::commands::clean::clean;
use dtm_cli::commands::install::{InstallReport, InstallRequest, install};
use dtm_cli::config::Config;
use dtm_cli::error::DtmError;
use dtm_cli::logging::Log;
use dtm_cli::mapping::{JsonMappingStore, Mapping, MappingStore};
use dtm_cli::uninstall::CleanReport;

/// Profile used by every fixture.
pub const PROFILE: &str = "work";

/// [`Log`] that keeps `(level, message)` pairs in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl MemoryLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, msg.to_string()));
    }

    /// Number of messages at `level` containing `needle`.
    pub fn count(&self, level: &str, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|(l, m)| *l == level && m.contains(needle))
            .count()
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
}

/// An isolated source tree pair and target directory backed by a
/// [`tempfile::TempDir`].
pub struct Dots {
    _dir: tempfile::TempDir,
    /// Source base holding `_shared` and `_work`.
    pub source: PathBuf,
    /// Install root.
    pub home: PathBuf,
    /// Where the mapping is stored.
    pub mapping_path: PathBuf,
}

impl Dots {
    /// Create empty `_shared`, `_work` and home directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dunce::canonicalize(dir.path()).expect("canonicalize temp dir");
        let source = root.join("dots");
        let home = root.join("home");
        for d in [source.join("_shared"), source.join(format!("_{PROFILE}")), home.clone()] {
            std::fs::create_dir_all(d).expect("create fixture dir");
        }
        Self {
            _dir: dir,
            source,
            mapping_path: root.join("mappings.json"),
            home,
        }
    }

    /// Add a file to the shared tree.
    pub fn shared(self, rel: &str) -> Self {
        write_file(&self.source.join("_shared"), rel);
        self
    }

    /// Add a file to the profile tree.
    pub fn profile(self, rel: &str) -> Self {
        write_file(&self.source.join(format!("_{PROFILE}")), rel);
        self
    }

    /// Add a pre-existing file to the target directory.
    pub fn existing(self, rel: &str) -> Self {
        write_file(&self.home, rel);
        self
    }

    /// Absolute path of `rel` in the shared tree.
    pub fn shared_path(&self, rel: &str) -> PathBuf {
        self.source.join("_shared").join(rel)
    }

    /// Absolute path of `rel` in the profile tree.
    pub fn profile_path(&self, rel: &str) -> PathBuf {
        self.source.join(format!("_{PROFILE}")).join(rel)
    }

    /// The mapping store used by [`Dots::install`] and [`Dots::clean`].
    pub fn store(&self) -> JsonMappingStore {
        JsonMappingStore::new(self.mapping_path.clone())
    }

    /// Read the stored mapping.
    pub fn mapping(&self) -> Mapping {
        self.store().load().expect("load mapping")
    }

    /// Run Install with `config`.
    pub fn install_with(
        &self,
        config: &Config,
        dry_run: bool,
        log: &MemoryLog,
    ) -> Result<InstallReport, DtmError> {
        let request = InstallRequest {
            profile: PROFILE.to_string(),
            source: Some(self.source.clone()),
            target: Some(self.home.clone()),
            dry_run,
        };
        install(config, &request, &self.store(), log)
    }

    /// Run Install with the default configuration.
    pub fn install(&self) -> InstallReport {
        self.install_with(&Config::default(), false, &MemoryLog::default())
            .expect("install")
    }

    /// Run Clean with `config`.
    pub fn clean_with(&self, config: &Config, log: &MemoryLog) -> Result<CleanReport, DtmError> {
        clean(config, &self.store(), false, log)
    }

    /// Whether `rel` under the target directory is a symlink.
    pub fn is_link(&self, rel: &str) -> bool {
        self.home
            .join(rel)
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink())
    }

    /// Whether anything exists at `rel` under the target directory.
    pub fn exists(&self, rel: &str) -> bool {
        self.home.join(rel).symlink_metadata().is_ok()
    }

    /// Every symlink beneath the target directory, relative and sorted.
    pub fn links(&self) -> Vec<String> {
        let mut found = Vec::new();
        let mut pending = vec![self.home.clone()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir).expect("read target dir") {
                let entry = entry.expect("read entry");
                let kind = entry.file_type().expect("file type");
                if kind.is_symlink() {
                    let rel = entry.path().strip_prefix(&self.home).expect("under home").to_path_buf();
                    found.push(rel.to_string_lossy().into_owned());
                } else if kind.is_dir() {
                    pending.push(entry.path());
                }
            }
        }
        found.sort();
        found
    }
}

fn write_file(root: &Path, rel: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("has parent")).expect("create parent");
    std::fs::write(path, rel).expect("write fixture file");
}
