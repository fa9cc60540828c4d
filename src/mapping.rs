//! Mapping store: the persisted record of one installation.
//!
//! The mapping is the single source of truth for Clean.  It is written once
//! at the end of a successful Install and read once at the start of Clean;
//! a second Install replaces it wholesale.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EnvironmentError, MappingError};
use crate::fsops;
use crate::link::LinkEntries;
use crate::merge::SourceRoots;

/// File name of the mapping under the user's home directory.
pub const MAPPING_FILE_NAME: &str = ".dtm_mappings";

/// What one Install run linked, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// The shared and profile roots the candidates came from.
    #[serde(rename = "sources_dir")]
    pub sources: SourceRoots,
    /// Absolute path of the target directory.
    #[serde(rename = "install_dir")]
    pub install_root: PathBuf,
    /// Link key → absolute source path.
    pub entries: LinkEntries,
}

impl Mapping {
    /// Whether replacing `self` with `next` would forget links elsewhere.
    #[must_use]
    pub fn differs_in_origin(&self, next: &Self) -> bool {
        self.install_root != next.install_root || self.sources != next.sources
    }
}

/// Persistence seam for [`Mapping`].
#[cfg_attr(test, mockall::automock)]
pub trait MappingStore {
    /// Whether a mapping has been stored.
    fn exists(&self) -> bool;

    /// Read the stored mapping.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Read`] if nothing was stored, or
    /// [`MappingError::Parse`] if the stored data is malformed.
    fn load(&self) -> Result<Mapping, MappingError>;

    /// Replace the stored mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping cannot be serialized or written.
    fn save(&self, mapping: &Mapping) -> Result<(), MappingError>;
}

/// [`MappingStore`] backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonMappingStore {
    path: PathBuf,
}

impl JsonMappingStore {
    /// Store the mapping at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the per-user location, `~/.dtm_mappings`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::HomeDirUnavailable`] if the home
    /// directory cannot be determined.
    pub fn at_default_location() -> Result<Self, EnvironmentError> {
        let home = dirs::home_dir().ok_or(EnvironmentError::HomeDirUnavailable)?;
        Ok(Self::new(home.join(MAPPING_FILE_NAME)))
    }

    /// Location of the mapping file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingStore for JsonMappingStore {
    fn exists(&self) -> bool {
        fsops::entry_exists(&self.path)
    }

    fn load(&self) -> Result<Mapping, MappingError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| MappingError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| MappingError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&self, mapping: &Mapping) -> Result<(), MappingError> {
        let mut content =
            serde_json::to_string_pretty(mapping).map_err(MappingError::Serialize)?;
        content.push('\n');
        std::fs::write(&self.path, content).map_err(|e| MappingError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}
