//! Domain-specific error types for the dotfiles engine.
//!
//! Library code returns [`DotfilesError`]; command handlers attach the
//! "while <context>" description through [`anyhow::Context`] and `main`
//! turns the first fatal error into exit status 1.
//!
//! # Error hierarchy
//!
//! ```text
//! DotfilesError
//! ├── Config(ConfigError)            HOME, ignore patterns, dotfiles.toml
//! ├── NotFound                       copy source missing (skippable)
//! ├── MissingSource                  link source missing
//! ├── Conflict                       destination already occupied
//! ├── Filesystem                     stat/copy/remove/symlink/mkdir failures
//! ├── NotARepository                 sync without a .git marker
//! └── CommandFailed / CommandLaunch / ProgramNotFound   git invocations
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DotfilesError`].
///
/// Only [`ErrorKind::NotFoundSkippable`] lets a run continue; every other
/// kind stops processing at the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or unusable configuration.
    Configuration,
    /// A `copy` source is absent from the home directory.
    NotFoundSkippable,
    /// The destination is occupied in a way that blocks the transition.
    Conflict,
    /// Any other filesystem failure.
    Filesystem,
    /// A version-control invocation failed or could not be started.
    ExternalCommand,
}

/// Top-level error type for the dotfiles engine.
#[derive(Error, Debug)]
pub enum DotfilesError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The home-directory source of a `copy` does not exist.
    #[error("{} not found in home directory", path.display())]
    NotFound {
        /// Managed path relative to the home directory.
        path: PathBuf,
    },

    /// The managed-directory source of a `link` does not exist.
    #[error("source not found in managed directory: {}", path.display())]
    MissingSource {
        /// Absolute path that was expected in the managed directory.
        path: PathBuf,
    },

    /// The destination is occupied by something that blocks the transition.
    #[error("{reason}: {}", path.display())]
    Conflict {
        /// Path of the blocking entry.
        path: PathBuf,
        /// Why the entry blocks the transition.
        reason: String,
    },

    /// A filesystem primitive failed.
    #[error("failed to {action} {}", path.display())]
    Filesystem {
        /// Short verb phrase naming the failed primitive (e.g. `"copy file"`).
        action: &'static str,
        /// Path the primitive was applied to.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// `sync` was asked to operate on a directory without a `.git` marker.
    #[error("not a git repository: {}", path.display())]
    NotARepository {
        /// The managed directory.
        path: PathBuf,
    },

    /// An external command ran but exited unsuccessfully.
    #[error("`{command}` exited with {}", describe_code(*code))]
    CommandFailed {
        /// Command line that was run (e.g. `"git pull"`).
        command: String,
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
    },

    /// An external command could not be started.
    #[error("failed to launch `{command}`")]
    CommandLaunch {
        /// Command line that was attempted.
        command: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The required program is not installed.
    #[error("`{program}` was not found on PATH")]
    ProgramNotFound {
        /// Program name that was looked up.
        program: String,
    },
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {c}"))
}

impl DotfilesError {
    /// Build a [`DotfilesError::Filesystem`] from an I/O error.
    pub fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Classify the error into one of the [`ErrorKind`] buckets.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::NotFound { .. } => ErrorKind::NotFoundSkippable,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::MissingSource { .. } | Self::Filesystem { .. } | Self::NotARepository { .. } => {
                ErrorKind::Filesystem
            }
            Self::CommandFailed { .. }
            | Self::CommandLaunch { .. }
            | Self::ProgramNotFound { .. } => ErrorKind::ExternalCommand,
        }
    }

    /// Return `true` if processing may continue with the next managed path.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFoundSkippable)
    }
}

/// Errors that arise while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `HOME` is unset or empty.
    #[error("HOME environment variable not set")]
    HomeNotSet,

    /// An ignore pattern is not a valid glob.
    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A managed path would escape the home or managed directory.
    #[error("invalid managed path '{path}': {reason}")]
    InvalidManagedPath {
        /// The offending entry.
        path: String,
        /// Why the entry is rejected.
        reason: &'static str,
    },

    /// The managed directory cannot be turned into an absolute path.
    #[error("invalid managed directory '{}'", path.display())]
    InvalidRoot {
        /// The path as given.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file exists but could not be read.
    #[error("IO error reading config file {}", path.display())]
    Io {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("invalid config file {}: {message}", path.display())]
    Parse {
        /// Path to the config file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn not_found_is_the_only_skippable_error() {
        let skippable = DotfilesError::NotFound {
            path: PathBuf::from(".zshrc"),
        };
        assert!(skippable.is_skippable());
        assert_eq!(skippable.kind(), ErrorKind::NotFoundSkippable);

        let fatal = [
            DotfilesError::MissingSource {
                path: PathBuf::from("/m/.zshrc"),
            },
            DotfilesError::Conflict {
                path: PathBuf::from("/m/.zshrc"),
                reason: "already exists".to_string(),
            },
            DotfilesError::fs("copy file", "/a", io::Error::other("boom")),
            DotfilesError::NotARepository {
                path: PathBuf::from("/m"),
            },
            DotfilesError::CommandFailed {
                command: "git pull".to_string(),
                code: Some(1),
            },
            DotfilesError::ProgramNotFound {
                program: "git".to_string(),
            },
            ConfigError::HomeNotSet.into(),
        ];
        for e in &fatal {
            assert!(!e.is_skippable(), "{e} should be fatal");
        }
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            DotfilesError::from(ConfigError::HomeNotSet).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            DotfilesError::Conflict {
                path: PathBuf::from("x"),
                reason: "r".to_string()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DotfilesError::CommandLaunch {
                command: "git push".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }
            .kind(),
            ErrorKind::ExternalCommand
        );
    }

    #[test]
    fn not_found_display() {
        let e = DotfilesError::NotFound {
            path: PathBuf::from(".gitconfig"),
        };
        assert_eq!(e.to_string(), ".gitconfig not found in home directory");
    }

    #[test]
    fn conflict_display() {
        let e = DotfilesError::Conflict {
            path: PathBuf::from("/home/u/.dotfiles/.zshrc"),
            reason: "file already exists".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "file already exists: /home/u/.dotfiles/.zshrc"
        );
    }

    #[test]
    fn filesystem_error_keeps_source() {
        let e = DotfilesError::fs(
            "remove",
            "/home/u/.zshrc",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(e.to_string(), "failed to remove /home/u/.zshrc");
        assert!(e.source().is_some());
    }

    #[test]
    fn command_failed_display() {
        let e = DotfilesError::CommandFailed {
            command: "git pull".to_string(),
            code: Some(128),
        };
        assert_eq!(e.to_string(), "`git pull` exited with exit code 128");

        let killed = DotfilesError::CommandFailed {
            command: "git push".to_string(),
            code: None,
        };
        assert_eq!(killed.to_string(), "`git push` exited with no exit code");
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::HomeNotSet.to_string(),
            "HOME environment variable not set"
        );
        let e = ConfigError::InvalidPattern {
            pattern: "[oops".to_string(),
            reason: "unclosed character class".to_string(),
        };
        assert!(e.to_string().contains("[oops"));
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let e = DotfilesError::ProgramNotFound {
            program: "git".to_string(),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<DotfilesError>();
        assert_send_sync::<ConfigError>();
    }
}
