//! Dotfiles management engine.
//!
//! Moves configured paths from the home directory into a version-controlled
//! managed directory, replaces them with symlinks, and keeps that directory
//! in step with its remote through `git pull` and `git push`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: managed directory, managed paths, and ignore patterns
//! - **[`resources`]**: filesystem primitives and `check + apply` transitions
//! - **[`exec`]**: external command execution for `sync`
//! - **[`commands`]**: top-level subcommand orchestration (`copy`, `link`, `sync`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod resources;
