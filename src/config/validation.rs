//! Validation of managed paths and ignore patterns.
use std::collections::HashSet;
use std::path::{Component, Path};

use crate::error::ConfigError;

/// A non-fatal problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration list the item came from (`"paths"` or `"ignore"`).
    pub source: String,
    /// The offending item.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Build a warning from its three parts.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Reject managed paths that would escape the home/managed mirror.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidManagedPath`] for absolute paths, for
/// paths containing `..`, and for paths that name no entry (such as `.`).
pub fn check_managed_path(entry: &str) -> Result<(), ConfigError> {
    let path = Path::new(entry);
    if path.has_root() || path.is_absolute() {
        return Err(ConfigError::InvalidManagedPath {
            path: entry.to_string(),
            reason: "must be relative to the home directory",
        });
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ConfigError::InvalidManagedPath {
            path: entry.to_string(),
            reason: "must not contain '..'",
        });
    }
    if !path.components().any(|c| matches!(c, Component::Normal(_))) {
        return Err(ConfigError::InvalidManagedPath {
            path: entry.to_string(),
            reason: "must name an entry below the home directory",
        });
    }
    Ok(())
}

/// Reject a managed path whose home location contains the managed directory.
///
/// Copying such a path would copy the managed directory into itself.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidManagedPath`] if `root` lies at or below
/// `home/entry`.
pub fn check_root_outside(entry: &str, home: &Path, root: &Path) -> Result<(), ConfigError> {
    if root.starts_with(home.join(entry)) {
        return Err(ConfigError::InvalidManagedPath {
            path: entry.to_string(),
            reason: "contains the managed directory",
        });
    }
    Ok(())
}

/// Normalise a managed path entry: trim whitespace and trailing separators.
pub(super) fn normalise_entry(entry: &str) -> &str {
    entry.trim().trim_end_matches(['/', '\\'])
}

/// Validate the managed path list and the ignore list.
///
/// Hard errors (escaping paths) are returned as `Err`; empty and duplicate
/// entries are reported as warnings.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidManagedPath`] encountered.
pub fn validate(paths: &[String], ignore: &[String]) -> Result<Vec<ValidationWarning>, ConfigError> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for raw in paths {
        let entry = normalise_entry(raw);
        if entry.is_empty() {
            warnings.push(ValidationWarning::new("paths", raw, "empty entry ignored"));
            continue;
        }
        check_managed_path(entry)?;
        if !seen.insert(entry) {
            warnings.push(ValidationWarning::new(
                "paths",
                entry,
                "duplicate entry ignored",
            ));
        }
    }

    let mut seen_patterns = HashSet::new();
    for pattern in ignore {
        if pattern.trim().is_empty() {
            warnings.push(ValidationWarning::new("ignore", pattern, "empty pattern"));
        } else if !seen_patterns.insert(pattern.as_str()) {
            warnings.push(ValidationWarning::new(
                "ignore",
                pattern,
                "duplicate pattern",
            ));
        }
    }

    Ok(warnings)
}
