//! Top-level subcommand orchestration.
pub mod copy;
pub mod link;
pub mod sync;
pub mod version;

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::ignore::IgnoreMatcher;
use crate::config::{self, Config, ConfigSource};
use crate::error::ConfigError;
use crate::exec::Executor;
use crate::logging::Log;

/// Environment variable overriding the managed directory.
pub const ROOT_ENV_VAR: &str = "DOTFILES_ROOT";

/// Shared state for command execution, built once at startup and read-only
/// afterwards.
pub struct Context {
    /// Configuration for the run.
    pub config: Config,
    /// Compiled ignore rules from [`Config::ignore`].
    pub ignore: IgnoreMatcher,
    /// The caller's home directory.
    pub home: PathBuf,
    /// Logger for output and per-path recording.
    pub log: Arc<dyn Log>,
    /// Report transitions without performing them.
    pub dry_run: bool,
    /// Runs git for `sync`.
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("ignore", &self.ignore)
            .field("home", &self.home)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &self.executor)
            .finish()
    }
}

impl Context {
    /// Resolve `$HOME` and the managed directory, then load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is unset, or the configuration cannot be
    /// loaded or is invalid.
    pub fn init(global: &GlobalOpts, log: Arc<dyn Log>, executor: Arc<dyn Executor>) -> Result<Self> {
        let home = config::home_dir()?;
        let root = resolve_root(global.root.as_deref(), std::env::var_os(ROOT_ENV_VAR), &home)?;
        let config = Config::load(&root)?;
        Self::new(home, config, log, global.dry_run, executor)
    }

    /// Build a context from already-resolved parts.
    ///
    /// Validation warnings are logged; duplicate and empty ignore patterns
    /// are dropped before compiling.
    ///
    /// # Errors
    ///
    /// Returns an error if a managed path is invalid or an ignore pattern is
    /// malformed.
    pub fn new(
        home: PathBuf,
        config: Config,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        match &config.source {
            ConfigSource::Defaults => log.debug("using built-in configuration"),
            ConfigSource::File(path) => log.debug(&format!("loaded {}", path.display())),
        }
        log.debug(&format!("managed directory: {}", config.root.display()));

        let warnings = config.validate(&home)?;
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        let mut seen = HashSet::new();
        let patterns: Vec<&str> = config
            .ignore
            .iter()
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty() && seen.insert(*p))
            .collect();
        let ignore = IgnoreMatcher::compile(patterns.as_slice()).context("compiling ignore patterns")?;
        log.debug(&format!(
            "{} managed paths, {} ignore patterns",
            config.managed_paths().len(),
            ignore.len()
        ));

        Ok(Self {
            config,
            ignore,
            home,
            log,
            dry_run,
            executor,
        })
    }

    /// The managed directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }
}

/// Pick the managed directory: an explicit `--root`, then a non-empty
/// `DOTFILES_ROOT`, then `$HOME/.dotfiles`.
///
/// The result is absolute; a relative override is resolved against the
/// current working directory.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidRoot`] if the path cannot be made absolute.
pub fn resolve_root(
    explicit: Option<&Path>,
    env: Option<OsString>,
    home: &Path,
) -> Result<PathBuf, ConfigError> {
    let root = match explicit {
        Some(root) => root.to_path_buf(),
        None => env
            .filter(|v| !v.is_empty())
            .map_or_else(|| home.join(config::DEFAULT_DIR_NAME), PathBuf::from),
    };
    let absolute =
        std::path::absolute(&root).map_err(|source| ConfigError::InvalidRoot { path: root, source })?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}
