//! Tree merger: reconcile the shared and profile trees into link candidates.
//!
//! Names present on only one side are resolved immediately.  Names present
//! on both sides are *collisions*: they are queued and the two subtrees are
//! merged one level deeper, breadth-first, until no collisions remain.  A
//! collision is never resolved by picking a side, so anything defined only
//! by the shared tree still surfaces at whatever depth it lives, while the
//! profile tree wins only where it actually defines something.
pub mod lister;

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{IgnoreRules, MergeRules};
use crate::fsops;
use crate::logging::Log;

use lister::{list_entries, not_ignored};

/// The two source trees of one installation.
///
/// Serialized as a two-element array `[shared, profile]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[PathBuf; 2]", into = "[PathBuf; 2]")]
pub struct SourceRoots {
    /// Configuration common to all profiles.
    pub shared: PathBuf,
    /// Configuration specific to the selected profile.
    pub profile: PathBuf,
}

impl From<[PathBuf; 2]> for SourceRoots {
    fn from([shared, profile]: [PathBuf; 2]) -> Self {
        Self { shared, profile }
    }
}

impl From<SourceRoots> for [PathBuf; 2] {
    fn from(roots: SourceRoots) -> Self {
        [roots.shared, roots.profile]
    }
}

impl SourceRoots {
    /// Path of `candidate` relative to whichever root contains it.
    #[must_use]
    pub fn relative_key<'a>(&self, candidate: &'a Path) -> Option<&'a Path> {
        candidate
            .strip_prefix(&self.shared)
            .or_else(|_| candidate.strip_prefix(&self.profile))
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
    }
}

/// Result of reconciling one directory level.
#[derive(Debug, Default)]
struct Level {
    /// Link candidates found at this level (explosions already applied).
    candidates: Vec<PathBuf>,
    /// Names present on both sides, to be merged one level deeper.
    collisions: Vec<OsString>,
}

/// Reconciles a [`SourceRoots`] pair into the flat list of paths to link.
#[derive(Debug, Clone, Default)]
pub struct TreeMerger {
    ignore: IgnoreRules,
    merge: MergeRules,
}

impl TreeMerger {
    /// Create a merger with the given listing and explode rules.
    #[must_use]
    pub const fn new(ignore: IgnoreRules, merge: MergeRules) -> Self {
        Self { ignore, merge }
    }

    /// Produce every absolute source path that must become a symlink.
    ///
    /// Candidates are returned in discovery order: level by level, shared
    /// before profile within a level, by name within a side.
    pub fn merge(&self, roots: &SourceRoots, log: &dyn Log) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        let mut pending: VecDeque<PathBuf> = VecDeque::from([PathBuf::new()]);

        while let Some(rel) = pending.pop_front() {
            let level = self.resolve_level(
                &under(&roots.shared, &rel),
                &under(&roots.profile, &rel),
                log,
            );
            let shown = if rel.as_os_str().is_empty() {
                Path::new(".")
            } else {
                rel.as_path()
            };
            log.debug(&format!(
                "merged [{}]: {} candidate(s), {} collision(s)",
                shown.display(),
                level.candidates.len(),
                level.collisions.len()
            ));
            candidates.extend(level.candidates);
            pending.extend(level.collisions.into_iter().map(|name| rel.join(name)));
        }

        candidates
    }

    /// List both sides of one level, split unique names from collisions and
    /// expand explodable unique directories into their files.
    fn resolve_level(&self, shared_dir: &Path, profile_dir: &Path, log: &dyn Log) -> Level {
        let keep = not_ignored(&self.ignore);
        let shared = list_entries(shared_dir, &[&keep], log);
        let profile = list_entries(profile_dir, &[&keep], log);

        let mut collisions = Vec::new();
        let mut uniques = Vec::new();
        for (name, path) in &shared {
            if profile.contains_key(name) {
                collisions.push(name.clone());
            } else {
                uniques.push(path.clone());
            }
        }
        uniques.extend(
            profile
                .into_iter()
                .filter(|(name, _)| !shared.contains_key(name))
                .map(|(_, path)| path),
        );

        // First pass decides which uniques explode; the second builds the
        // candidate list from the decisions.
        let explode: Vec<bool> = uniques.iter().map(|p| self.is_explodable(p)).collect();
        let mut candidates = Vec::with_capacity(uniques.len());
        for (path, explode) in uniques.into_iter().zip(explode) {
            if explode {
                let files = fsops::walk_files(&path, log);
                log.debug(&format!(
                    "exploded [{}] into {} file(s)",
                    path.display(),
                    files.len()
                ));
                candidates.extend(files);
            } else {
                candidates.push(path);
            }
        }

        Level {
            candidates,
            collisions,
        }
    }

    /// A unique entry explodes when it is a real directory whose name matches
    /// an explode marker.
    fn is_explodable(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.merge.is_explodable(&name.to_string_lossy()))
            && path.symlink_metadata().is_ok_and(|m| m.is_dir())
    }
}

fn under(root: &Path, rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}
