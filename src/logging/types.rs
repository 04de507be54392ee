//! Core logging types: per-path entries, status, and the [`Log`] trait.

/// Result of processing one managed path, kept for the run summary.
#[derive(Debug, Clone)]
pub struct PathEntry {
    /// Managed path relative to the home directory.
    pub name: String,
    /// Final status of the path.
    pub status: PathStatus,
    /// Optional detail message (e.g. skip reason or error description).
    pub message: Option<String>,
}

/// Outcome of a managed path within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// The transition was applied.
    Ok,
    /// The link was already in place; nothing changed.
    AlreadyLinked,
    /// The source was missing and the path was skipped.
    Skipped,
    /// Dry run; the transition would have been applied.
    DryRun,
    /// The transition failed and stopped the run.
    Failed,
}

/// Abstraction over logging backends.
///
/// Command code logs through `&dyn Log` so tests can substitute a logger
/// writing to an isolated cache directory.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a ✓-prefixed success line.
    fn success(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a managed path's result for the summary.
    fn record_path(&self, name: &str, status: PathStatus, message: Option<&str>);
    /// Print the per-path summary collected so far.
    fn print_summary(&self);
}
