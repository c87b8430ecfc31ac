//! `wharf build` command

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::load_workspace;
use wharf::ops::{build, BuildOptions, PlanOptions};
use wharf::util::GlobalContext;

pub fn execute(args: BuildArgs, ctx: &GlobalContext, manifest: Option<&Path>) -> Result<()> {
    let ws = load_workspace(ctx, manifest, args.source_check)?;

    let opts = BuildOptions {
        plan: PlanOptions {
            targets: args.target,
        },
        dry_run: args.dry_run,
        progress: !ctx.verbose() && io::stderr().is_terminal(),
    };

    let result = build(&ws, &opts)?;

    if args.dry_run {
        for command in &result.commands {
            println!("{}", command.display_command());
        }
        return Ok(());
    }

    for artifact in &result.artifacts {
        eprintln!(
            "    Finished `{}` -> {}",
            artifact.target,
            ws.root().relative(&artifact.path).display()
        );
    }

    Ok(())
}
