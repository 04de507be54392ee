//! Filesystem primitives.
//!
//! Each wrapper maps the OS error into [`DotfilesError::Filesystem`] with
//! the action and path that failed.
use std::path::{Component, Path, PathBuf};

use crate::config::ignore::IgnoreMatcher;
use crate::error::DotfilesError;

/// Counters and skip lists collected while copying a tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyStats {
    /// Regular files copied.
    pub files: u32,
    /// Symbolic links recreated.
    pub links: u32,
    /// Directories created (including the root).
    pub dirs: u32,
    /// Relative paths excluded by ignore rules.
    pub ignored: Vec<String>,
    /// Relative paths of special files that were not copied.
    pub unsupported: Vec<String>,
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), DotfilesError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| DotfilesError::fs("create parent directory", parent, e))?;
    }
    Ok(())
}

/// Copy a single regular file, creating parent directories as needed.
///
/// Contents are copied byte-for-byte; metadata beyond what
/// [`std::fs::copy`] carries is not preserved.
///
/// # Errors
///
/// Returns an error if the parent cannot be created or the copy fails.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), DotfilesError> {
    ensure_parent_dir(dst)?;
    std::fs::copy(src, dst).map_err(|e| DotfilesError::fs("copy file", src, e))?;
    Ok(())
}

/// Recursively copy the directory `src` to `dst`, skipping entries matched
/// by `ignore`.
///
/// `prefix` is the path of `src` relative to the copy root (empty at the
/// root). Children are visited in lexicographic order of their names. An
/// ignored directory is skipped together with its whole subtree. Symlinks
/// inside the tree are recreated with the same raw target rather than
/// followed.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or read, or an entry
/// cannot be copied.
pub fn copy_tree(
    src: &Path,
    dst: &Path,
    ignore: &IgnoreMatcher,
    prefix: &str,
) -> Result<CopyStats, DotfilesError> {
    let mut stats = CopyStats::default();
    copy_tree_into(src, dst, ignore, prefix, &mut stats)?;
    Ok(stats)
}

fn copy_tree_into(
    src: &Path,
    dst: &Path,
    ignore: &IgnoreMatcher,
    prefix: &str,
    stats: &mut CopyStats,
) -> Result<(), DotfilesError> {
    std::fs::create_dir_all(dst).map_err(|e| DotfilesError::fs("create directory", dst, e))?;
    stats.dirs += 1;

    let mut entries = std::fs::read_dir(src)
        .map_err(|e| DotfilesError::fs("read directory", src, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DotfilesError::fs("read directory", src, e))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        let relative = if prefix.is_empty() {
            name_str.to_string()
        } else {
            format!("{prefix}/{name_str}")
        };

        if ignore.is_ignored(&name_str, &relative) {
            stats.ignored.push(relative);
            continue;
        }

        let src_path = entry.path();
        let dst_path = dst.join(&name);
        let file_type = entry
            .file_type()
            .map_err(|e| DotfilesError::fs("inspect", &src_path, e))?;

        if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
            stats.links += 1;
        } else if file_type.is_dir() {
            copy_tree_into(&src_path, &dst_path, ignore, &relative, stats)?;
        } else if file_type.is_file() {
            copy_file(&src_path, &dst_path)?;
            stats.files += 1;
        } else {
            stats.unsupported.push(relative);
        }
    }
    Ok(())
}

/// Recreate the symlink `src` at `dst` with the same raw target.
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), DotfilesError> {
    let target = std::fs::read_link(src).map_err(|e| DotfilesError::fs("read link", src, e))?;
    let resolved = resolve_link_target(src, &target);
    create_symlink_raw(&target, dst, resolved.is_dir())
}

/// Remove the file, symlink, or directory tree at `path`.
///
/// A symlink is removed itself; its target is left alone.
///
/// # Errors
///
/// Returns an error if the entry cannot be inspected or removed.
pub fn remove_tree(path: &Path) -> Result<(), DotfilesError> {
    let meta =
        std::fs::symlink_metadata(path).map_err(|e| DotfilesError::fs("inspect", path, e))?;
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| DotfilesError::fs("remove", path, e))
}

/// Create a symlink at `link` pointing to `target`.
///
/// Whether the link is a file or directory link is taken from what `target`
/// currently is; this only matters on Windows.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn create_symlink(target: &Path, link: &Path) -> Result<(), DotfilesError> {
    create_symlink_raw(target, link, target.is_dir())
}

#[cfg(unix)]
fn create_symlink_raw(target: &Path, link: &Path, _is_dir: bool) -> Result<(), DotfilesError> {
    std::os::unix::fs::symlink(target, link)
        .map_err(|e| DotfilesError::fs("create symlink", link, e))
}

#[cfg(windows)]
fn create_symlink_raw(target: &Path, link: &Path, is_dir: bool) -> Result<(), DotfilesError> {
    let result = if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };
    result.map_err(|e| DotfilesError::fs("create symlink", link, e))
}

/// Resolve the raw target of the link at `link` against the link's parent
/// directory and normalise it lexically.
#[must_use]
pub fn resolve_link_target(link: &Path, raw: &Path) -> PathBuf {
    let joined = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        link.parent().unwrap_or_else(|| Path::new("")).join(raw)
    };
    normalize_lexically(&joined)
}

/// Remove `.` components and fold `..` into the preceding component without
/// touching the filesystem.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Compare two paths after lexical normalisation, ignoring the `\\?\`
/// prefix Windows adds to extended-length paths.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    normalize_lexically(dunce::simplified(a)) == normalize_lexically(dunce::simplified(b))
}
