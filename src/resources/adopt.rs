//! Adopt resource: move a home entry into the managed directory and leave a
//! symlink behind.
use std::path::PathBuf;

use super::fs::{CopyStats, copy_file, copy_tree, create_symlink, remove_tree};
use super::{EntryKind, PathState, Resource, ResourceChange, probe};
use crate::config::ignore::IgnoreMatcher;
use crate::error::DotfilesError;

/// A home-directory entry to be taken over by the managed directory.
///
/// Applying it runs three steps in order: copy the home entry into the
/// managed directory, remove the home entry, create a symlink in its place.
/// A failure part-way leaves the earlier steps in effect.
#[derive(Debug)]
pub struct AdoptResource<'a> {
    /// Managed path relative to both roots, used in messages.
    pub name: String,
    /// The home-directory entry being adopted.
    pub source: PathBuf,
    /// Where the entry lands in the managed directory.
    pub destination: PathBuf,
    ignore: &'a IgnoreMatcher,
}

impl<'a> AdoptResource<'a> {
    /// Create a new adopt resource.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: PathBuf,
        destination: PathBuf,
        ignore: &'a IgnoreMatcher,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            destination,
            ignore,
        }
    }

    /// Apply the transition, returning what was copied.
    ///
    /// Ignore rules apply to entries below a copied directory, never to the
    /// managed path itself.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilesError::NotFound`] if the source is absent (the
    /// caller may skip it), a conflict if the source is not a regular entry
    /// or the destination exists, or a filesystem error from any step.
    pub fn apply_with_stats(&self) -> Result<(ResourceChange, CopyStats), DotfilesError> {
        let kind = self.source_kind()?;
        self.check_destination()?;

        let stats = if kind == EntryKind::RealDirectory {
            copy_tree(&self.source, &self.destination, self.ignore, "")?
        } else {
            copy_file(&self.source, &self.destination)?;
            CopyStats {
                files: 1,
                ..CopyStats::default()
            }
        };
        remove_tree(&self.source)?;
        create_symlink(&self.destination, &self.source)?;
        Ok((ResourceChange::Applied, stats))
    }

    fn source_kind(&self) -> Result<EntryKind, DotfilesError> {
        let kind = probe(&self.source)?;
        match PathState::classify(&kind, &self.source, None) {
            PathState::RegularEntry => Ok(kind),
            PathState::Absent => Err(DotfilesError::NotFound {
                path: PathBuf::from(&self.name),
            }),
            PathState::CorrectLink | PathState::ConflictingEntry { .. } => {
                Err(DotfilesError::Conflict {
                    path: self.source.clone(),
                    reason: "source is not a regular file or directory".to_string(),
                })
            }
        }
    }

    fn check_destination(&self) -> Result<(), DotfilesError> {
        if probe(&self.destination)? == EntryKind::Absent {
            Ok(())
        } else {
            Err(DotfilesError::Conflict {
                path: self.destination.clone(),
                reason: "file already exists".to_string(),
            })
        }
    }
}

impl Resource for AdoptResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.destination.display())
    }

    fn check(&self) -> Result<ResourceChange, DotfilesError> {
        self.source_kind()?;
        self.check_destination()?;
        Ok(ResourceChange::WouldApply)
    }

    fn apply(&self) -> Result<ResourceChange, DotfilesError> {
        self.apply_with_stats().map(|(change, _)| change)
    }
}
