//! `wharf clean` command

use std::path::Path;

use anyhow::Result;

use crate::commands::load_workspace;
use wharf::ops::clean;
use wharf::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>) -> Result<()> {
    let ws = load_workspace(ctx, manifest, None)?;
    let removed = clean(&ws)?;
    eprintln!("     Removed {}", removed.display());
    Ok(())
}
