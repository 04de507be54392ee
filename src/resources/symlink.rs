//! Symlink resource: link a home location to its managed counterpart.
use std::path::PathBuf;

use super::fs::{create_symlink, ensure_parent_dir};
use super::{EntryKind, PathState, Resource, ResourceChange, probe};
use crate::error::DotfilesError;

/// A symlink from the home directory into the managed directory.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The managed-directory entry the link points to.
    pub source: PathBuf,
    /// The home-directory location where the link is created.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Classify what currently sits at [`SymlinkResource::target`].
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be inspected.
    pub fn current_state(&self) -> Result<PathState, DotfilesError> {
        let kind = probe(&self.target)?;
        Ok(PathState::classify(&kind, &self.target, Some(&self.source)))
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn check(&self) -> Result<ResourceChange, DotfilesError> {
        let source = probe(&self.source)?;
        if source == EntryKind::Absent {
            return Err(DotfilesError::MissingSource {
                path: self.source.clone(),
            });
        }
        if !source.is_regular() {
            return Err(DotfilesError::Conflict {
                path: self.source.clone(),
                reason: "managed entry is not a regular file or directory".to_string(),
            });
        }

        match self.current_state()? {
            PathState::Absent => Ok(ResourceChange::WouldApply),
            PathState::CorrectLink => Ok(ResourceChange::AlreadyCorrect),
            PathState::RegularEntry => Err(DotfilesError::Conflict {
                path: self.target.clone(),
                reason: "file already exists".to_string(),
            }),
            PathState::ConflictingEntry { reason } => Err(DotfilesError::Conflict {
                path: self.target.clone(),
                reason,
            }),
        }
    }

    fn apply(&self) -> Result<ResourceChange, DotfilesError> {
        if self.check()? == ResourceChange::AlreadyCorrect {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)?;
        Ok(ResourceChange::Applied)
    }
}
