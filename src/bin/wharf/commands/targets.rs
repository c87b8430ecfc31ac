//! `wharf targets` command

use std::path::Path;

use anyhow::Result;

use crate::commands::load_workspace;
use wharf::ops::list_targets;
use wharf::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>) -> Result<()> {
    let ws = load_workspace(ctx, manifest, None)?;
    let targets = list_targets(&ws)?;

    if targets.is_empty() {
        eprintln!("no targets declared in {}", ws.manifest_path().display());
        return Ok(());
    }

    let width = targets.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for target in &targets {
        println!(
            "{:width$}  {:7}  {} -> {}",
            target.name,
            target.tool.as_str(),
            target.source,
            ws.root().relative(&target.output).display(),
            width = width
        );
    }

    Ok(())
}
