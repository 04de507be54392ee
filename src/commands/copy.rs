//! Command: move home-directory entries into the managed directory and link
//! them back.
use anyhow::{Context as _, Result};

use super::Context;
use crate::error::DotfilesError;
use crate::logging::PathStatus;
use crate::resources::adopt::AdoptResource;
use crate::resources::Resource as _;

/// Run the copy command over every managed path, in order.
///
/// A path missing from the home directory is skipped with a warning. Any
/// other failure stops the run at that path.
///
/// # Errors
///
/// Returns the first fatal error, with the path being copied as context.
pub fn run(ctx: &Context) -> Result<()> {
    ctx.log.stage(&format!(
        "Copying managed paths into {}",
        ctx.root().display()
    ));

    for name in ctx.config.managed_paths() {
        let resource = AdoptResource::new(
            name,
            ctx.home.join(name),
            ctx.root().join(name),
            &ctx.ignore,
        );
        match copy_one(ctx, &resource) {
            Ok(status) => ctx.log.record_path(name, status, None),
            Err(e) if e.is_skippable() => {
                ctx.log.warn(&format!("skipping {name}: {e}"));
                ctx.log.record_path(name, PathStatus::Skipped, Some("not found"));
            }
            Err(e) => {
                ctx.log.record_path(name, PathStatus::Failed, Some(&e.to_string()));
                ctx.log.print_summary();
                return Err(e).with_context(|| format!("copying {name}"));
            }
        }
    }

    ctx.log.print_summary();
    Ok(())
}

fn copy_one(ctx: &Context, resource: &AdoptResource<'_>) -> Result<PathStatus, DotfilesError> {
    if ctx.dry_run {
        resource.check()?;
        ctx.log.dry_run(&format!(
            "would copy {} and link it back",
            resource.description()
        ));
        return Ok(PathStatus::DryRun);
    }

    let (_, stats) = resource.apply_with_stats()?;
    ctx.log.debug(&format!(
        "{}: {} files, {} links, {} directories",
        resource.name, stats.files, stats.links, stats.dirs
    ));
    for ignored in &stats.ignored {
        ctx.log.debug(&format!("ignored {}/{ignored}", resource.name));
    }
    for special in &stats.unsupported {
        ctx.log.debug(&format!(
            "skipped unsupported file type {}/{special}",
            resource.name
        ));
    }
    ctx.log.success(&format!("copied {}", resource.name));
    Ok(PathStatus::Ok)
}
