//! Structured logger with dry-run awareness and a per-path summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, PathEntry, PathStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Every message is also written to `$XDG_CACHE_HOME/dotfiles/<command>.log`
/// (default `~/.cache/dotfiles/<command>.log`) by the file layer installed in
/// [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    paths: Mutex<Vec<PathEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            paths: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded path entries.
    #[must_use]
    pub fn path_entries(&self) -> Vec<PathEntry> {
        self.paths.lock().map_or_else(|_| vec![], |g| g.clone())
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
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a ✓-prefixed success line.
    pub fn success(&self, msg: &str) {
        tracing::info!("\x1b[32m✓\x1b[0m {msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a managed path's result for the summary.
    pub fn record_path(&self, name: &str, status: PathStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.paths.lock() {
            guard.push(PathEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the recorded paths with `status`.
    #[must_use]
    pub fn count(&self, status: PathStatus) -> usize {
        self.paths
            .lock()
            .map_or(0, |guard| guard.iter().filter(|p| p.status == status).count())
    }

    /// Print the summary of all recorded paths.
    pub fn print_summary(&self) {
        let entries = self.path_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        for entry in &entries {
            let (icon, color) = match entry.status {
                PathStatus::Ok => ("✓", "\x1b[32m"),
                PathStatus::AlreadyLinked => ("·", "\x1b[2m"),
                PathStatus::Skipped => ("○", "\x1b[33m"),
                PathStatus::DryRun => ("~", "\x1b[37m"),
                PathStatus::Failed => ("✗", "\x1b[31m"),
            };
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", entry.name));
        }

        self.info(&summary_line(&entries));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// Render the counts line, e.g. `3 paths: 1 ok, 1 already linked, 1 skipped`.
///
/// Zero counts other than `ok` are omitted.
fn summary_line(entries: &[PathEntry]) -> String {
    let count = |status| entries.iter().filter(|e| e.status == status).count();
    let mut parts = vec![format!("\x1b[32m{} ok\x1b[0m", count(PathStatus::Ok))];
    for (status, label, color) in [
        (PathStatus::AlreadyLinked, "already linked", "\x1b[2m"),
        (PathStatus::Skipped, "skipped", "\x1b[33m"),
        (PathStatus::DryRun, "dry-run", "\x1b[37m"),
        (PathStatus::Failed, "failed", "\x1b[31m"),
    ] {
        let n = count(status);
        if n > 0 {
            parts.push(format!("{color}{n} {label}\x1b[0m"));
        }
    }
    format!("{} paths: {}", entries.len(), parts.join(", "))
}

impl Log for Logger {
    forward_log_methods!(stage, info, success, debug, warn, error, dry_run);

    fn record_path(&self, name: &str, status: PathStatus, message: Option<&str>) {
        self.record_path(name, status, message);
    }

    fn print_summary(&self) {
        self.print_summary();
    }
}
