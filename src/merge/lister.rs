//! Directory lister: one directory's immediate entries, filtered.
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::IgnoreRules;
use crate::logging::Log;

/// Entry name → absolute entry path, ordered by name.
///
/// Names are kept as the OS reports them so that two names differing only
/// in bytes that are not valid UTF-8 stay distinct.
pub type Entries = BTreeMap<OsString, PathBuf>;

/// A predicate over an entry name; the entry is kept when it returns `true`.
///
/// Names that are not valid UTF-8 are seen lossily.
pub type EntryFilter<'a> = dyn Fn(&str) -> bool + 'a;

/// List the immediate entries of `dir` that satisfy every filter.
///
/// An unreadable or missing directory is not an error: it is logged and
/// yields an empty listing (a profile may define nothing at all).
pub fn list_entries(dir: &Path, filters: &[&EntryFilter<'_>], log: &dyn Log) -> Entries {
    let mut collected = Entries::new();
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            log.info(&format!("error reading [{}]: {e}", dir.display()));
            return collected;
        }
    };

    for entry in read.filter_map(Result::ok) {
        let name = entry.file_name();
        let shown = name.to_string_lossy();
        if filters.iter().all(|keep| keep(&shown)) {
            collected.insert(name, entry.path());
        }
    }
    collected
}

/// The built-in predicate: keep entries not matched by `rules`.
pub fn not_ignored(rules: &IgnoreRules) -> impl Fn(&str) -> bool + '_ {
    move |name| !rules.is_ignored(name)
}
