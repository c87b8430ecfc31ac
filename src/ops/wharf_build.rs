//! Implementation of `wharf build`.

use anyhow::Result;
use tracing::info;

use crate::builder::{Artifact, BuildPlan, PlanExecutor, ProcessRunner, RecordingRunner};
use crate::core::Workspace;
use crate::ops::wharf_plan::{resolve_plan, PlanOptions};
use crate::util::process::ProcessBuilder;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Which targets to build
    pub plan: PlanOptions,

    /// Print the tool invocations instead of running them
    pub dry_run: bool,

    /// Show a progress bar
    pub progress: bool,
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildResult {
    /// The plan that was executed
    pub plan: BuildPlan,

    /// Built artifacts, in plan order
    pub artifacts: Vec<Artifact>,

    /// Tool invocations recorded by a dry run
    pub commands: Vec<ProcessBuilder>,
}

/// Resolve the workspace and hand every action to its tool.
pub fn build(ws: &Workspace, opts: &BuildOptions) -> Result<BuildResult> {
    let plan = resolve_plan(ws, &opts.plan)?;
    let resolver = ws.resolver();
    let tools = &ws.config().tools;

    let executor = PlanExecutor::new(&resolver, tools)
        .require_tools(!opts.dry_run)
        .progress(opts.progress);

    if opts.dry_run {
        let mut runner = RecordingRunner::default();
        let artifacts = executor.execute(&plan, &mut runner)?;
        info!("dry run: {} command(s) not executed", runner.commands.len());
        return Ok(BuildResult {
            plan,
            artifacts,
            commands: runner.commands,
        });
    }

    let artifacts = executor.execute(&plan, &mut ProcessRunner)?;
    Ok(BuildResult {
        plan,
        artifacts,
        commands: Vec::new(),
    })
}
