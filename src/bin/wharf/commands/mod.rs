//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod init;
pub mod plan;
pub mod targets;

use std::path::Path;

use anyhow::Result;

use crate::cli::SourceCheckArg;
use wharf::core::Workspace;
use wharf::util::GlobalContext;

/// Locate and load the workspace, applying a command-line source check override.
pub fn load_workspace(
    ctx: &GlobalContext,
    manifest: Option<&Path>,
    source_check: Option<SourceCheckArg>,
) -> Result<Workspace> {
    let manifest_path = ctx.locate_manifest(manifest)?;
    let ws = Workspace::new(&manifest_path, ctx)?;

    Ok(match source_check {
        Some(check) => ws.with_source_check(check.into()),
        None => ws,
    })
}
