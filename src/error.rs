//! Domain-specific error types for the merge-and-link engine.
//!
//! Engine modules return typed errors (e.g., [`MappingError`], [`FsError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DtmError
//! ├── Config(ConfigError)           rules file, profile naming
//! ├── Environment(EnvironmentError) home and working directory resolution
//! ├── Mapping(MappingError)         mapping file read, parse and write
//! └── Fs(FsError)                   directory creation, symlinks, removal
//! ```
//!
//! An unreadable source directory is not an error: the lister treats it as
//! empty and only logs it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum DtmError {
    /// Configuration-related error (rules file, profile naming).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The process environment could not be resolved.
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    /// The mapping file could not be read, parsed or written.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// A filesystem mutation failed.
    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),
}

/// Errors that arise from loading the rules file and resolving profiles.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The profile name cannot be used to build a profile root.
    #[error("Invalid profile '{name}': {reason}")]
    InvalidProfile {
        /// Profile name given on the command line.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// An I/O error occurred while reading the rules file.
    #[error("IO error reading config file {path}: {source}")]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The rules file is not valid TOML or does not match the schema.
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Errors that arise while resolving the process environment.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    /// The user's home directory could not be determined.
    #[error("cannot determine the home directory")]
    HomeDirUnavailable,

    /// The current working directory could not be read.
    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// A path given on the command line could not be resolved.
    #[error("cannot resolve {path}: {source}")]
    Resolve {
        /// Path that failed to resolve.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that arise from persisting or loading the mapping file.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The mapping file could not be read (usually: nothing was installed).
    #[error("failed reading mappings in {path}: {source}")]
    Read {
        /// Location of the mapping file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The mapping file is not valid JSON or does not match the schema.
    #[error("failed to deserialize mappings in {path}: {source}")]
    Parse {
        /// Location of the mapping file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A path that must be recorded is not valid UTF-8.
    #[error("{path} is not valid UTF-8 and cannot be recorded in the mapping")]
    NotUtf8 {
        /// The offending path.
        path: PathBuf,
    },

    /// The mapping could not be serialized.
    #[error("failed generating mappings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The mapping file could not be written.
    #[error("failed writing mappings to {path}: {source}")]
    Write {
        /// Location of the mapping file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that arise from filesystem mutations during Install and Clean.
#[derive(Error, Debug)]
pub enum FsError {
    /// A directory (install root or link parent) could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A symlink could not be created.
    #[error("failed to link {link} -> {target}: {source}")]
    Symlink {
        /// Where the symlink was to be created.
        link: PathBuf,
        /// What the symlink was to point at.
        target: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An installed artifact could not be removed.
    #[error("failed to remove {path}: {source}")]
    Remove {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A merge candidate lies under neither source root.
    #[error("{path} is not under {shared} or {profile}")]
    OutsideRoots {
        /// The offending candidate.
        path: PathBuf,
        /// Shared source root.
        shared: PathBuf,
        /// Profile source root.
        profile: PathBuf,
    },
}
