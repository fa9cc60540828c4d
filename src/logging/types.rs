//! Core logging abstraction: the [`Log`] trait.

/// Abstraction over logging backends.
///
/// Engine components ([`merge`](crate::merge), [`link`](crate::link),
/// [`uninstall`](crate::uninstall)) log every filesystem decision through
/// this trait so that the audit trail can be captured in tests without a
/// global tracing subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
