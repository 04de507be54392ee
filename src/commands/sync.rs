//! Command: pull then push the managed directory with git.
use anyhow::{Context as _, Result};

use super::Context;
use crate::error::DotfilesError;
use crate::exec::{command_line, run_checked};
use crate::resources::{EntryKind, probe};

/// Program used to synchronise the managed directory.
const GIT: &str = "git";

/// Run `git pull`, then `git push`, inside the managed directory.
///
/// # Errors
///
/// Returns an error if the managed directory has no `.git` entry, git is
/// not on `PATH`, or either command fails. `push` does not run when `pull`
/// fails.
pub fn run(ctx: &Context) -> Result<()> {
    ctx.log.stage(&format!("Syncing {}", ctx.root().display()));
    check_preconditions(ctx).context("syncing")?;

    for args in [["pull"], ["push"]] {
        let line = command_line(GIT, &args);
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would run `{line}`"));
            continue;
        }
        ctx.log.debug(&format!("running `{line}` in {}", ctx.root().display()));
        run_checked(ctx.executor.as_ref(), ctx.root(), GIT, &args).context("syncing")?;
        ctx.log.success(&line);
    }
    Ok(())
}

fn check_preconditions(ctx: &Context) -> Result<(), DotfilesError> {
    if probe(&ctx.root().join(".git"))? == EntryKind::Absent {
        return Err(DotfilesError::NotARepository {
            path: ctx.root().to_path_buf(),
        });
    }
    if !ctx.executor.which(GIT) {
        return Err(DotfilesError::ProgramNotFound {
            program: GIT.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::{RecordingExecutor, Sandbox};

    fn init_repo(sandbox: &Sandbox) {
        std::fs::create_dir(sandbox.managed().join(".git")).unwrap();
    }

    #[test]
    fn pulls_then_pushes_in_managed_directory() {
        let sandbox = Sandbox::new();
        init_repo(&sandbox);
        let ctx = sandbox.context(&[], &[], false);

        run(&ctx).unwrap();

        assert_eq!(sandbox.executor.calls(), ["git pull", "git push"]);
        assert_eq!(sandbox.executor.dirs(), [sandbox.managed(), sandbox.managed()]);
    }

    #[test]
    fn missing_repository_marker_runs_nothing() {
        let sandbox = Sandbox::new();
        let ctx = sandbox.context(&[], &[], false);

        let err = run(&ctx).unwrap_err();

        assert!(format!("{err:#}").starts_with("syncing: not a git repository"));
        assert!(sandbox.executor.calls().is_empty());
    }

    #[test]
    fn gitdir_file_counts_as_repository() {
        let sandbox = Sandbox::new();
        std::fs::write(sandbox.managed().join(".git"), "gitdir: ../elsewhere").unwrap();
        let ctx = sandbox.context(&[], &[], false);

        run(&ctx).unwrap();
        assert_eq!(sandbox.executor.calls().len(), 2);
    }

    #[test]
    fn failed_pull_skips_push() {
        let sandbox = Sandbox::with_executor(RecordingExecutor::failing_at(0, 1));
        init_repo(&sandbox);
        let ctx = sandbox.context(&[], &[], false);

        let err = run(&ctx).unwrap_err();

        assert_eq!(format!("{err:#}"), "syncing: `git pull` exited with exit code 1");
        assert_eq!(sandbox.executor.calls(), ["git pull"]);
    }

    #[test]
    fn failed_push_is_fatal() {
        let sandbox = Sandbox::with_executor(RecordingExecutor::failing_at(1, 128));
        init_repo(&sandbox);
        let ctx = sandbox.context(&[], &[], false);

        let err = run(&ctx).unwrap_err();

        assert!(format!("{err:#}").contains("`git push` exited with exit code 128"));
        assert_eq!(sandbox.executor.calls(), ["git pull", "git push"]);
    }

    #[test]
    fn missing_git_is_reported() {
        let sandbox = Sandbox::with_executor(RecordingExecutor::without_git());
        init_repo(&sandbox);
        let ctx = sandbox.context(&[], &[], false);

        let err = run(&ctx).unwrap_err();

        assert!(format!("{err:#}").contains("`git` was not found on PATH"));
        assert!(sandbox.executor.calls().is_empty());
    }

    #[test]
    fn dry_run_runs_nothing() {
        let sandbox = Sandbox::new();
        init_repo(&sandbox);
        let ctx = sandbox.context(&[], &[], true);

        run(&ctx).unwrap();
        assert!(sandbox.executor.calls().is_empty());
    }
}
