//! Plan executor with progress reporting.
//!
//! Actions run one at a time in plan order. Everything that can fail before a
//! tool runs (missing sources, output directories that leave the root through
//! a symlink, missing tools) is checked for every action first, so a failing
//! plan never leaves some outputs built and others not.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::builder::command::tool_command;
use crate::builder::plan::{BuildAction, BuildPlan};
use crate::core::tool::ToolKind;
use crate::resolver::Resolver;
use crate::util::config::ToolPaths;
use crate::util::diagnostic::suggestions;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_executable, ProcessBuilder};

/// A produced artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub target: String,
    pub path: PathBuf,
}

/// Runs a single prepared action.
pub trait ActionRunner {
    fn run(&mut self, action: &BuildAction, command: &ProcessBuilder) -> Result<()>;
}

/// Spawns the external tool and waits for it.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ActionRunner for ProcessRunner {
    fn run(&mut self, action: &BuildAction, command: &ProcessBuilder) -> Result<()> {
        ensure_dir(action.output_dir())?;
        debug!("running `{}`", command.display_command());

        let output = command.exec_and_check()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{}: {}", action.target, stdout.trim());
        }
        Ok(())
    }
}

/// Collects command lines without running anything.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub commands: Vec<ProcessBuilder>,
}

impl ActionRunner for RecordingRunner {
    fn run(&mut self, _action: &BuildAction, command: &ProcessBuilder) -> Result<()> {
        self.commands.push(command.clone());
        Ok(())
    }
}

/// Plan executor.
pub struct PlanExecutor<'a> {
    resolver: &'a Resolver,
    tools: &'a ToolPaths,
    require_tools: bool,
    progress: bool,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(resolver: &'a Resolver, tools: &'a ToolPaths) -> Self {
        PlanExecutor {
            resolver,
            tools,
            require_tools: true,
            progress: false,
        }
    }

    /// When false, unlocated tools fall back to their bare program name.
    pub fn require_tools(mut self, require: bool) -> Self {
        self.require_tools = require;
        self
    }

    /// Show a progress bar while running.
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Match every action's sources again and fail on the first empty one.
    pub fn materialize(&self, plan: &BuildPlan) -> Result<Vec<BuildAction>> {
        plan.actions
            .iter()
            .map(|action| -> Result<BuildAction> {
                let inputs = self
                    .resolver
                    .match_sources(&action.target, &action.source_pattern)?;
                Ok(BuildAction {
                    inputs,
                    ..action.clone()
                })
            })
            .collect()
    }

    /// Find the program for a tool: configured path first, then `PATH`.
    pub fn locate(&self, tool: ToolKind) -> Result<PathBuf> {
        if let Some(configured) = self.tools.get(tool) {
            let path = self.resolver.root().as_path().join(configured);
            if path.is_file() || !self.require_tools {
                return Ok(path);
            }
            return Err(anyhow!(
                "configured {} at `{}` does not exist\n{}",
                tool,
                path.display(),
                suggestions::TOOL_NOT_FOUND
            ));
        }

        match find_executable(tool.default_program()) {
            Some(path) => Ok(path),
            None if !self.require_tools => Ok(PathBuf::from(tool.default_program())),
            None => Err(anyhow!(
                "could not find `{}` on PATH\n{}",
                tool.default_program(),
                suggestions::TOOL_NOT_FOUND
            )),
        }
    }

    /// Prepare and run every action of `plan` through `runner`.
    pub fn execute(
        &self,
        plan: &BuildPlan,
        runner: &mut dyn ActionRunner,
    ) -> Result<Vec<Artifact>> {
        let start = Instant::now();

        let actions = self.materialize(plan)?;
        for action in &actions {
            self.resolver.check_contained(action.output_dir())?;
        }

        let mut programs: HashMap<ToolKind, PathBuf> = HashMap::new();
        for action in &actions {
            if !programs.contains_key(&action.tool) {
                programs.insert(action.tool, self.locate(action.tool)?);
            }
        }

        let pb = if self.progress && actions.len() > 1 {
            let pb = ProgressBar::new(actions.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let mut artifacts = Vec::with_capacity(actions.len());
        for action in &actions {
            let program = programs
                .get(&action.tool)
                .map(PathBuf::as_path)
                .unwrap_or(Path::new(action.tool.default_program()));
            let command = tool_command(action, program).cwd(&plan.root);

            if let Some(ref pb) = pb {
                pb.set_message(action.target.clone());
            }

            runner.run(action, &command)?;

            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            artifacts.push(Artifact {
                target: action.target.clone(),
                path: action.output.clone(),
            });
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        info!(
            "built {} target(s) in {:.2}s",
            artifacts.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(artifacts)
    }
}
