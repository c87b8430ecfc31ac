//! Implementation of `wharf plan` and `wharf targets`.

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::builder::BuildPlan;
use crate::core::target::TargetDecl;
use crate::core::tool::ToolKind;
use crate::core::Workspace;
use crate::resolver::{Resolver, ResolverConfig, SourceCheck};
use crate::util::diagnostic::suggestions;

/// Options for plan resolution.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Specific targets to plan (empty = all, in declaration order)
    pub targets: Vec<String>,
}

/// A declared target with its resolved output, as listed by `wharf targets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetListing {
    pub name: String,
    pub tool: ToolKind,
    pub source: String,
    pub output: PathBuf,
}

/// Validate that all requested targets exist in the manifest.
///
/// This prevents silent no-ops when the user specifies a nonexistent target.
fn validate_target_filter(ws: &Workspace, targets: &[String]) -> Result<()> {
    let declared: Vec<&str> = ws
        .manifest()
        .targets
        .iter()
        .map(|t| t.name.as_str())
        .collect();

    for requested in targets {
        if !declared.contains(&requested.as_str()) {
            bail!(
                "unknown target `{}`\n\
                 available targets: {}\n\
                 {}",
                requested,
                if declared.is_empty() {
                    "(none)".to_string()
                } else {
                    declared.join(", ")
                },
                suggestions::TARGET_NOT_FOUND
            );
        }
    }

    Ok(())
}

/// Declarations selected by `opts`, keeping manifest order.
fn select_targets(ws: &Workspace, opts: &PlanOptions) -> Result<Vec<TargetDecl>> {
    validate_target_filter(ws, &opts.targets)?;

    Ok(ws
        .manifest()
        .targets
        .iter()
        .filter(|t| opts.targets.is_empty() || opts.targets.contains(&t.name))
        .cloned()
        .collect())
}

/// Resolve the workspace's targets into a build plan.
pub fn resolve_plan(ws: &Workspace, opts: &PlanOptions) -> Result<BuildPlan> {
    let decls = select_targets(ws, opts)?;
    let resolver = ws.resolver();

    debug!(
        "resolving {} target(s) with source check `{}`",
        decls.len(),
        resolver.config().source_check
    );

    let targets = resolver.define_all(&decls)?;
    let plan = BuildPlan::new(&ws.manifest().project.name, ws.root(), targets)?;

    info!(
        "planned {} action(s) for `{}`",
        plan.len(),
        ws.manifest().project.name
    );

    Ok(plan)
}

/// Resolve every declared target's output path without matching sources.
pub fn list_targets(ws: &Workspace) -> Result<Vec<TargetListing>> {
    let resolver = Resolver::new(ResolverConfig {
        source_check: SourceCheck::Deferred,
        ..ws.resolver().config().clone()
    });

    ws.manifest()
        .targets
        .iter()
        .map(|decl| -> Result<TargetListing> {
            let target = resolver.define(decl)?;
            Ok(TargetListing {
                name: target.name().to_string(),
                tool: target.tool(),
                source: target.source_pattern().to_string(),
                output: target.output_path().to_path_buf(),
            })
        })
        .collect()
}
