//! `wharf plan` command

use std::path::Path;

use anyhow::Result;

use crate::cli::PlanArgs;
use crate::commands::load_workspace;
use wharf::ops::{resolve_plan, PlanOptions};
use wharf::util::fs::write_string;
use wharf::util::GlobalContext;

pub fn execute(args: PlanArgs, ctx: &GlobalContext, manifest: Option<&Path>) -> Result<()> {
    let ws = load_workspace(ctx, manifest, args.source_check)?;

    let opts = PlanOptions {
        targets: args.target,
    };
    let plan = resolve_plan(&ws, &opts)?;
    let json = plan.to_json()?;

    match args.output {
        Some(path) => {
            let path = ctx.cwd().join(path);
            write_string(&path, &format!("{}\n", json))?;
            eprintln!("       Wrote plan to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
