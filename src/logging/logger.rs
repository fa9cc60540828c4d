//! Structured console/file logger backed by `tracing`.
use std::path::PathBuf;

use super::types::Log;
use super::utils::log_file_path;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger used by the `dtm` binary.
///
/// Every message becomes a [`tracing`] event.  With the subscriber installed
/// by [`init_subscriber`](super::init_subscriber), all events are also
/// written to `<cache dir>/dtm/<command>.log` with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command` (`install`, `clean`).
    ///
    /// Stores the log file path for display at the end of a run.  The file
    /// itself is created by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dtm::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dtm::dry_run", "{msg}");
    }

    /// Print a closing summary line followed by the log file location.
    pub fn print_summary(&self, summary: &str) {
        self.stage("Summary");
        self.info(summary);
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn logger_usable_through_trait_object() {
        let log = Logger::new("test");
        let log_ref: &dyn Log = &log;
        log_ref.info("info without a subscriber is a no-op");
        log_ref.dry_run("would link");
    }

    #[test]
    fn log_path_names_command() {
        let log = Logger::new("install");
        if let Some(path) = log.log_path() {
            assert!(path.ends_with("dtm/install.log"), "got {}", path.display());
        }
    }
}
