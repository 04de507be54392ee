//! Check-then-apply primitives for managed paths.
//!
//! Every operation re-derives the state of the filesystem from scratch; no
//! state is cached between calls. Checks and the actions that follow them are
//! separate system calls, so a concurrent writer can invalidate a check
//! before the action runs.
pub mod adopt;
pub mod fs;
pub mod symlink;

use std::path::{Path, PathBuf};

use crate::error::DotfilesError;

/// What currently sits at a filesystem location. Symlinks are not followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing exists at the location.
    Absent,
    /// A regular file.
    RealFile,
    /// A directory that is not a symlink.
    RealDirectory,
    /// A symbolic link and its raw (unresolved) target.
    SymlinkTo(PathBuf),
    /// Sockets, FIFOs, device nodes and the like.
    Other,
}

impl EntryKind {
    /// Return `true` for a file or directory that is not a symlink.
    #[must_use]
    pub const fn is_regular(&self) -> bool {
        matches!(self, Self::RealFile | Self::RealDirectory)
    }
}

/// Inspect `path` without following a final symlink.
///
/// # Errors
///
/// Returns [`DotfilesError::Filesystem`] for any failure other than the
/// entry not existing.
pub fn probe(path: &Path) -> Result<EntryKind, DotfilesError> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(EntryKind::Absent),
        Err(e) => return Err(DotfilesError::fs("inspect", path, e)),
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        let target = std::fs::read_link(path).map_err(|e| DotfilesError::fs("read link", path, e))?;
        Ok(EntryKind::SymlinkTo(target))
    } else if file_type.is_file() {
        Ok(EntryKind::RealFile)
    } else if file_type.is_dir() {
        Ok(EntryKind::RealDirectory)
    } else {
        Ok(EntryKind::Other)
    }
}

/// State of a managed path's location relative to what an operation expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathState {
    /// Nothing exists at the location.
    Absent,
    /// A file or directory that is not a symlink.
    RegularEntry,
    /// A symlink resolving to the expected counterpart.
    CorrectLink,
    /// Anything else: a symlink pointing elsewhere or a special file.
    ConflictingEntry {
        /// Description of what is in the way.
        reason: String,
    },
}

impl PathState {
    /// Classify `kind`, found at `location`, against the link target the
    /// caller expects there (if any).
    #[must_use]
    pub fn classify(kind: &EntryKind, location: &Path, expected_target: Option<&Path>) -> Self {
        match kind {
            EntryKind::Absent => Self::Absent,
            EntryKind::RealFile | EntryKind::RealDirectory => Self::RegularEntry,
            EntryKind::SymlinkTo(raw) => {
                let resolved = fs::resolve_link_target(location, raw);
                match expected_target {
                    Some(expected) if fs::paths_equal(&resolved, expected) => Self::CorrectLink,
                    _ => Self::ConflictingEntry {
                        reason: format!("symbolic link to {}", resolved.display()),
                    },
                }
            }
            EntryKind::Other => Self::ConflictingEntry {
                reason: "unsupported file type".to_string(),
            },
        }
    }
}

/// Result of checking or applying a resource.
///
/// # Examples
///
/// ```
/// use dotfiles_sync::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The change was made.
    Applied,
    /// Nothing to do; the location is already in the desired state.
    AlreadyCorrect,
    /// Preconditions hold and the change would be made (dry run).
    WouldApply,
}

/// A managed-path transition that can be checked and applied.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Verify preconditions without touching the filesystem.
    ///
    /// Returns [`ResourceChange::WouldApply`] when [`Resource::apply`] would
    /// act and [`ResourceChange::AlreadyCorrect`] when it would not.
    ///
    /// # Errors
    ///
    /// Returns the same error `apply` would fail with before acting.
    fn check(&self) -> Result<ResourceChange, DotfilesError>;

    /// Check preconditions, then perform the transition.
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition fails or any filesystem step fails.
    /// Steps already completed are not rolled back.
    fn apply(&self) -> Result<ResourceChange, DotfilesError>;
}
