//! Configuration: managed directory, managed paths, and ignore patterns.
pub mod ignore;
pub mod toml_loader;
pub mod validation;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use validation::ValidationWarning;

/// Name of the optional override file inside the managed directory.
pub const CONFIG_FILE_NAME: &str = "dotfiles.toml";

/// Name of the managed directory below `$HOME` when nothing overrides it.
pub const DEFAULT_DIR_NAME: &str = ".dotfiles";

/// Paths managed when the config file does not list any.
pub const DEFAULT_PATHS: &[&str] = &[".gitconfig", ".zshrc", ".claude", ".nvm"];

/// Ignore patterns used when the config file does not list any.
pub const DEFAULT_IGNORE: &[&str] = &[".DS_Store", "node_modules", "*.log", "cache", "tmp", "*.swp"];

/// Where the configuration lists came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults only.
    Defaults,
    /// Defaults overridden by a `dotfiles.toml` file.
    File(PathBuf),
}

/// On-disk shape of `dotfiles.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    paths: Option<Vec<String>>,
    ignore: Option<Vec<String>>,
}

/// Immutable configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The managed directory.
    pub root: PathBuf,
    /// Managed paths relative to both `$HOME` and [`Config::root`], in processing order.
    pub paths: Vec<String>,
    /// Glob patterns excluded from recursive copies.
    pub ignore: Vec<String>,
    /// Origin of `paths` and `ignore`.
    pub source: ConfigSource,
}

impl Config {
    /// Build a configuration from explicit lists.
    #[must_use]
    pub fn new<P: AsRef<str>, I: AsRef<str>>(root: &Path, paths: &[P], ignore: &[I]) -> Self {
        Self {
            root: root.to_path_buf(),
            paths: paths.iter().map(|p| p.as_ref().to_string()).collect(),
            ignore: ignore.iter().map(|p| p.as_ref().to_string()).collect(),
            source: ConfigSource::Defaults,
        }
    }

    /// Built-in defaults for the managed directory `root`.
    #[must_use]
    pub fn defaults(root: &Path) -> Self {
        Self::new(root, DEFAULT_PATHS, DEFAULT_IGNORE)
    }

    /// Load the configuration for `root`, applying `root/dotfiles.toml` on
    /// top of the defaults when it exists. Each list present in the file
    /// replaces the corresponding default list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let file = root.join(CONFIG_FILE_NAME);
        let Some(overrides) = toml_loader::load_optional::<ConfigFile>(&file)? else {
            return Ok(Self::defaults(root));
        };

        let mut config = Self::defaults(root);
        if let Some(paths) = overrides.paths {
            config.paths = paths;
        }
        if let Some(ignore) = overrides.ignore {
            config.ignore = ignore;
        }
        config.source = ConfigSource::File(file);
        Ok(config)
    }

    /// Check the configuration against the home directory `home`, returning
    /// non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if any managed path is absolute, contains `..`, names
    /// no entry, or contains the managed directory.
    pub fn validate(&self, home: &Path) -> Result<Vec<ValidationWarning>, ConfigError> {
        let warnings = validation::validate(&self.paths, &self.ignore)?;
        for entry in self.managed_paths() {
            validation::check_root_outside(entry, home, &self.root)?;
        }
        Ok(warnings)
    }

    /// Managed paths in order, normalised, with empty and duplicate entries dropped.
    #[must_use]
    pub fn managed_paths(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.paths
            .iter()
            .map(|p| validation::normalise_entry(p))
            .filter(|p| !p.is_empty() && seen.insert(*p))
            .collect()
    }
}

/// Resolve the caller's home directory from `HOME`.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotSet`] if `HOME` is unset or empty.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    home_dir_from(std::env::var_os("HOME"))
}

fn home_dir_from(value: Option<std::ffi::OsString>) -> Result<PathBuf, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::HomeNotSet)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_lists() {
        let config = Config::defaults(Path::new("/home/u/.dotfiles"));
        assert_eq!(config.paths, DEFAULT_PATHS);
        assert_eq!(config.ignore, DEFAULT_IGNORE);
        assert_eq!(config.source, ConfigSource::Defaults);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.paths, DEFAULT_PATHS);
        assert_eq!(config.root, dir.path());
    }

    #[test]
    fn load_file_overrides_lists_independently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "paths = [\".vimrc\", \".config/nvim\"]\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.paths, [".vimrc", ".config/nvim"]);
        assert_eq!(config.ignore, DEFAULT_IGNORE, "ignore list should stay default");
        assert_eq!(
            config.source,
            ConfigSource::File(dir.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn load_file_can_clear_ignore_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "ignore = []\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.ignore.is_empty());
        assert_eq!(config.paths, DEFAULT_PATHS);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "pathz = []\n").unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err}");
    }

    #[test]
    fn managed_paths_drop_duplicates_and_empties() {
        let config = Config::new(
            Path::new("/m"),
            &[".zshrc", "", ".config/nvim/", ".zshrc", ".config/nvim"],
            &["*.log"],
        );
        assert_eq!(config.managed_paths(), [".zshrc", ".config/nvim"]);
    }

    #[test]
    fn validate_reports_escaping_path() {
        let config = Config::new(Path::new("/m"), &["../outside"], &["*.log"]);
        assert!(config.validate(Path::new("/home/u")).is_err());
    }

    #[test]
    fn validate_rejects_managed_directory_inside_managed_path() {
        let config = Config::new(
            Path::new("/home/u/.config/dotfiles"),
            &[".zshrc", ".config/"],
            &["*.log"],
        );
        let err = config.validate(Path::new("/home/u")).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidManagedPath { ref path, .. } if path == ".config"),
            "got {err}"
        );

        let beside = Config::new(Path::new("/home/u/.dotfiles"), &[".config"], &["*.log"]);
        assert!(beside.validate(Path::new("/home/u")).unwrap().is_empty());
    }

    #[test]
    fn home_dir_requires_non_empty_value() {
        assert!(matches!(home_dir_from(None), Err(ConfigError::HomeNotSet)));
        assert!(matches!(
            home_dir_from(Some(std::ffi::OsString::new())),
            Err(ConfigError::HomeNotSet)
        ));
        assert_eq!(
            home_dir_from(Some("/home/u".into())).unwrap(),
            PathBuf::from("/home/u")
        );
    }
}
