//! Filesystem primitives shared by the linker, the merger and the uninstaller.
use std::io;
use std::path::{Path, PathBuf};

use crate::logging::Log;

/// Whether anything exists at `path`, including a dangling symlink.
///
/// [`Path::exists`] follows symlinks and reports `false` for a broken one,
/// which would let the linker collide with it.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Whether `path` is a symlink resolving (textually) to `source`.
#[must_use]
pub fn is_link_to(path: &Path, source: &Path) -> bool {
    std::fs::read_link(path).is_ok_and(|existing| paths_equal(&existing, source))
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    s.strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from)
}

/// Create a symlink at `link` pointing to `source`.
///
/// # Errors
///
/// Returns the underlying I/O error, e.g. when `link` already exists or its
/// parent is missing.
#[cfg(unix)]
pub fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

/// Create a symlink at `link` pointing to `source`.
///
/// Directory and file symlinks are distinct on Windows; the kind follows
/// the source.
///
/// # Errors
///
/// Returns the underlying I/O error, e.g. when `link` already exists or
/// symlinks are not permitted (Developer Mode disabled).
#[cfg(windows)]
pub fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, link)
    } else {
        std::os::windows::fs::symlink_file(source, link)
    }
}

/// Remove whatever is at `path`.
///
/// Real directories are removed recursively; files and symlinks (including
/// symlinks to directories) are unlinked without following them.  A path
/// that does not exist is not an error.
///
/// # Errors
///
/// Returns the underlying I/O error if the entry exists but cannot be removed.
pub fn remove_all(path: &Path) -> io::Result<()> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like symlink.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, which must still be removed with `remove_dir`.
#[cfg(windows)]
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
}

#[cfg(not(windows))]
const fn is_dir_like(_meta: &std::fs::Metadata) -> bool {
    false
}

/// Collect every non-directory entry beneath `dir`.
///
/// The walk is iterative and does not follow symlinks: a symlink to a
/// directory is returned as an entry of its own.  Unreadable directories are
/// logged and skipped.  Entries are visited in name order.
pub fn walk_files(dir: &Path, log: &dyn Log) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = match std::fs::read_dir(&current) {
            Ok(rd) => rd.filter_map(Result::ok).collect::<Vec<_>>(),
            Err(e) => {
                log.info(&format!("error reading [{}]: {e}", current.display()));
                continue;
            }
        };
        entries.sort_by_key(std::fs::DirEntry::file_name);

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                subdirs.push(path);
            } else {
                files.push(path);
            }
        }
        // Reverse so the stack pops subdirectories in name order.
        pending.extend(subdirs.into_iter().rev());
    }

    files
}
