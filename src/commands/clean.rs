//! The `clean` subcommand: remove a previously recorded installation.

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::DtmError;
use crate::logging::{Log, Logger, version};
use crate::mapping::{JsonMappingStore, MappingStore};
use crate::uninstall::{CleanReport, Uninstaller};

/// Run the clean command.
///
/// # Errors
///
/// Returns an error if the mapping cannot be read or any removal fails.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    log.info(&format!("dtm {}", version()));
    let config = super::load_config(global, log)?;
    let store = JsonMappingStore::at_default_location()?;

    let report = clean(&config, &store, global.dry_run, log)
        .with_context(|| format!("failed to clean using {}", store.path().display()))?;

    log.print_summary(&report.summary());
    Ok(())
}

/// Remove everything the stored mapping says was installed.
///
/// The mapping itself is left in place.
///
/// # Errors
///
/// Returns [`DtmError::Mapping`] if the mapping cannot be read, or
/// [`DtmError::Fs`] for the first removal that fails.
pub fn clean(
    config: &Config,
    store: &dyn MappingStore,
    dry_run: bool,
    log: &dyn Log,
) -> Result<CleanReport, DtmError> {
    log.stage("Reading mapping");
    let mapping = store.load()?;
    log.info(&format!(
        "{} entries installed into {}",
        mapping.entries.len(),
        mapping.install_root.display()
    ));

    log.stage("Removing links");
    let uninstaller = Uninstaller::new(config.clean.clone());
    Ok(uninstaller.clean(&mapping, dry_run, log)?)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MappingError;
    use crate::link::LinkEntries;
    use crate::logging::test_helpers::RecordingLog;
    use crate::mapping::{Mapping, MockMappingStore};
    use crate::merge::SourceRoots;
    use std::path::{Path, PathBuf};

    fn mapping_for(home: &Path, keys: &[&str]) -> Mapping {
        Mapping {
            sources: SourceRoots {
                shared: PathBuf::from("/dots/_shared"),
                profile: PathBuf::from("/dots/_work"),
            },
            install_root: home.to_path_buf(),
            entries: keys
                .iter()
                .map(|k| ((*k).to_string(), Path::new("/dots/_shared").join(k)))
                .collect::<LinkEntries>(),
        }
    }

    #[test]
    fn missing_mapping_is_fatal() {
        let mut store = MockMappingStore::new();
        store.expect_load().times(1).returning(|| {
            Err(MappingError::Read {
                path: PathBuf::from("/home/u/.dtm_mappings"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });
        store.expect_save().times(0);

        let err = clean(&Config::default(), &store, false, &RecordingLog::new()).unwrap_err();

        assert!(matches!(err, DtmError::Mapping(MappingError::Read { .. })));
    }

    #[test]
    fn removes_mapped_entries_and_keeps_mapping() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".bashrc"), "").unwrap();
        std::fs::write(home.path().join(".unrelated"), "").unwrap();
        let m = mapping_for(home.path(), &[".bashrc"]);
        let mut store = MockMappingStore::new();
        store.expect_load().times(1).returning(move || Ok(m.clone()));
        store.expect_save().times(0);

        let report = clean(&Config::default(), &store, false, &RecordingLog::new()).unwrap();

        assert_eq!(report.removed, vec![home.path().join(".bashrc")]);
        assert!(!home.path().join(".bashrc").exists());
        assert!(home.path().join(".unrelated").exists());
    }

    #[test]
    fn dry_run_keeps_everything() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".bashrc"), "").unwrap();
        let m = mapping_for(home.path(), &[".bashrc"]);
        let mut store = MockMappingStore::new();
        store.expect_load().returning(move || Ok(m.clone()));
        let log = RecordingLog::new();

        clean(&Config::default(), &store, true, &log).unwrap();

        assert!(home.path().join(".bashrc").exists());
        assert_eq!(log.count("dry_run", "would remove"), 1);
    }
}
