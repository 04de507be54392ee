//! Command: link every managed path from the home directory into the
//! managed directory.
use anyhow::{Context as _, Result};

use super::Context;
use crate::error::DotfilesError;
use crate::logging::PathStatus;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Resource as _, ResourceChange};

/// Run the link command over every managed path, in order.
///
/// Paths that are already correctly linked are reported and left alone.
/// A missing managed entry or an occupied home location stops the run.
///
/// # Errors
///
/// Returns the first fatal error, with the path being linked as context.
pub fn run(ctx: &Context) -> Result<()> {
    ctx.log.stage(&format!(
        "Linking managed paths from {}",
        ctx.root().display()
    ));

    for name in ctx.config.managed_paths() {
        let resource = SymlinkResource::new(ctx.root().join(name), ctx.home.join(name));
        match link_one(ctx, name, &resource) {
            Ok(status) => ctx.log.record_path(name, status, None),
            Err(e) => {
                ctx.log.record_path(name, PathStatus::Failed, Some(&e.to_string()));
                ctx.log.print_summary();
                return Err(e).with_context(|| format!("linking {name}"));
            }
        }
    }

    ctx.log.print_summary();
    Ok(())
}

fn link_one(
    ctx: &Context,
    name: &str,
    resource: &SymlinkResource,
) -> Result<PathStatus, DotfilesError> {
    let change = if ctx.dry_run {
        resource.check()?
    } else {
        resource.apply()?
    };

    match change {
        ResourceChange::AlreadyCorrect => {
            ctx.log.success(&format!("{name} already linked"));
            Ok(PathStatus::AlreadyLinked)
        }
        ResourceChange::WouldApply => {
            ctx.log.dry_run(&format!("would link {}", resource.description()));
            Ok(PathStatus::DryRun)
        }
        ResourceChange::Applied => {
            ctx.log.success(&format!("linked {name}"));
            Ok(PathStatus::Ok)
        }
    }
}
