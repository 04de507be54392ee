//! Command-line interface.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Move dotfiles into a git-tracked directory, link them back, and sync it",
    version
)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Managed directory (default: $DOTFILES_ROOT, then ~/.dotfiles)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move managed paths from $HOME into the managed directory and link them back
    Copy,
    /// Link managed paths in $HOME to the managed directory
    Link,
    /// Run `git pull` then `git push` in the managed directory
    Sync,
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, also used for the log file name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Link => "link",
            Self::Sync => "sync",
            Self::Version => "version",
        }
    }
}
