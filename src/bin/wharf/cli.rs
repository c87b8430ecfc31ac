//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use wharf::resolver::SourceCheck;

/// Wharf - resolve web asset build configuration into a build plan
#[derive(Parser)]
#[command(name = "wharf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Wharf.toml (or the directory containing it)
    #[arg(long, global = true, env = "WHARF_MANIFEST")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the build plan and print it as JSON
    Plan(PlanArgs),

    /// Run the external tools for every target
    Build(BuildArgs),

    /// List targets with their resolved output paths
    Targets,

    /// Create a Wharf.toml in an existing directory
    Init(InitArgs),

    /// Remove the output directory
    Clean,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// When source patterns are checked for matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceCheckArg {
    /// While resolving targets
    Eager,
    /// Just before the tools run
    Deferred,
}

impl From<SourceCheckArg> for SourceCheck {
    fn from(arg: SourceCheckArg) -> Self {
        match arg {
            SourceCheckArg::Eager => SourceCheck::Eager,
            SourceCheckArg::Deferred => SourceCheck::Deferred,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Write the plan to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Specific targets to plan
    #[arg(long)]
    pub target: Vec<String>,

    /// Override the configured source check
    #[arg(long, value_enum)]
    pub source_check: Option<SourceCheckArg>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Print the tool invocations without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Specific targets to build
    #[arg(long)]
    pub target: Vec<String>,

    /// Override the configured source check
    #[arg(long, value_enum)]
    pub source_check: Option<SourceCheckArg>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
