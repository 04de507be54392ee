// Shared helpers for integration tests.
//
// Provides a temporary home directory with a managed directory inside it,
// a fluent builder for populating both, and recording fakes for the logger
// and the command executor.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{Arc, Mutex};

use dotfiles_sync::commands::Context;
use dotfiles_sync::config::Config;
use dotfiles_sync::error::DotfilesError;
use dotfiles_sync::exec::{ExecResult, Executor, command_line};
use dotfiles_sync::logging::{Log, PathStatus};

/// Logger that keeps every line and per-path record in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    pub lines: Mutex<Vec<String>>,
    pub paths: Mutex<Vec<(String, PathStatus)>>,
}

impl RecordingLog {
    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("log lock")
            .push(format!("{level} {msg}"));
    }

    /// Recorded lines, each prefixed with its level.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lock").clone()
    }

    /// Recorded per-path statuses in order.
    pub fn statuses(&self) -> Vec<(String, PathStatus)> {
        self.paths.lock().expect("log lock").clone()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn success(&self, msg: &str) {
        self.push("ok", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry-run", msg);
    }
    fn record_path(&self, name: &str, status: PathStatus, _message: Option<&str>) {
        self.paths
            .lock()
            .expect("log lock")
            .push((name.to_string(), status));
    }
    fn print_summary(&self) {}
}

/// Executor that records command lines and replays scripted exit codes.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(PathBuf, String)>>,
    exit_codes: Mutex<Vec<i32>>,
    git_missing: bool,
}

impl RecordingExecutor {
    /// Fail the `n`th call (0-based) with exit code `code`; others succeed.
    pub fn failing_at(n: usize, code: i32) -> Self {
        let mut codes = vec![0; n];
        codes.push(code);
        codes.reverse();
        Self {
            exit_codes: Mutex::new(codes),
            ..Self::default()
        }
    }

    /// Report every program as missing from `PATH`.
    pub fn without_git() -> Self {
        Self {
            git_missing: true,
            ..Self::default()
        }
    }

    /// Command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("executor lock")
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Working directories of the calls run so far.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .expect("executor lock")
            .iter()
            .map(|(d, _)| d.clone())
            .collect()
    }
}

impl Executor for RecordingExecutor {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, DotfilesError> {
        self.calls
            .lock()
            .expect("executor lock")
            .push((dir.to_path_buf(), command_line(program, args)));
        let code = self.exit_codes.lock().expect("executor lock").pop().unwrap_or(0);
        Ok(ExecResult {
            success: code == 0,
            code: Some(code),
        })
    }

    fn which(&self, _program: &str) -> bool {
        !self.git_missing
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`], with the
/// managed directory at `~/.dotfiles`.
pub struct IntegrationTestContext {
    pub home: tempfile::TempDir,
    pub log: Arc<RecordingLog>,
    pub executor: Arc<RecordingExecutor>,
}

impl IntegrationTestContext {
    /// Create a new context with an empty home and managed directory.
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(home.path().join(".dotfiles")).expect("create managed dir");
        Self {
            home,
            log: Arc::new(RecordingLog::default()),
            executor: Arc::new(RecordingExecutor::default()),
        }
    }

    /// Path to the home directory.
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Path to the managed directory.
    pub fn managed(&self) -> PathBuf {
        self.home.path().join(".dotfiles")
    }

    /// Load configuration from the managed directory and build a command context.
    pub fn context(&self, dry_run: bool) -> Context {
        let config = Config::load(&self.managed()).expect("load config");
        Context::new(
            self.home().to_path_buf(),
            config,
            self.log.clone(),
            dry_run,
            self.executor.clone(),
        )
        .expect("build context")
    }

    /// Run the `dotfiles` binary with `HOME` pointing at this context.
    pub fn run_binary(&self, args: &[&str]) -> Output {
        self.run_binary_in(self.home(), args)
    }

    /// Run the `dotfiles` binary from the working directory `cwd`.
    pub fn run_binary_in(&self, cwd: &Path, args: &[&str]) -> Output {
        std::process::Command::new(env!("CARGO_BIN_EXE_dotfiles"))
            .args(args)
            .current_dir(cwd)
            .env("HOME", self.home())
            .env("XDG_CACHE_HOME", self.home().join(".cache"))
            .env_remove("DOTFILES_ROOT")
            .output()
            .expect("run dotfiles binary")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `relative` under the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.home().join(relative), content);
        self
    }

    /// Write `content` to `relative` under the managed directory.
    pub fn with_managed_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.managed().join(relative), content);
        self
    }

    /// Write `dotfiles.toml` into the managed directory.
    pub fn with_config(self, content: &str) -> Self {
        write_file(&self.ctx.managed().join("dotfiles.toml"), content);
        self
    }

    /// Create an empty `.git` directory in the managed directory.
    pub fn with_git_marker(self) -> Self {
        std::fs::create_dir_all(self.ctx.managed().join(".git")).expect("create .git");
        self
    }

    /// Replace the executor.
    pub fn with_executor(mut self, executor: RecordingExecutor) -> Self {
        self.ctx.executor = Arc::new(executor);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}

/// List every entry below `root`, sorted, one per line. Directories end in
/// `/`; symlinks show their raw target.
pub fn tree(root: &Path) -> String {
    let mut lines = Vec::new();
    walk(root, root, &mut lines);
    lines.join("\n")
}

fn walk(root: &Path, dir: &Path, lines: &mut Vec<String>) {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").path())
        .collect();
    entries.sort();
    for path in entries {
        let relative = path
            .strip_prefix(root)
            .expect("strip prefix")
            .to_string_lossy()
            .replace('\\', "/");
        let meta = path.symlink_metadata().expect("metadata");
        if meta.is_symlink() {
            let target = std::fs::read_link(&path).expect("read link");
            lines.push(format!("{relative} -> {}", target.display()));
        } else if meta.is_dir() {
            lines.push(format!("{relative}/"));
            walk(root, &path, lines);
        } else {
            lines.push(relative);
        }
    }
}
