//! Wharf - a build configuration resolver for web front-end assets
//!
//! This crate turns a declarative `Wharf.toml` into an ordered build plan:
//! validated output paths under the project root, source patterns matched
//! against the filesystem, and one action per target for the external tools.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

pub use builder::{emit_build_plan, BuildAction, BuildPlan};
pub use crate::core::{
    manifest::Manifest, root::ProjectRoot, target::BuildTarget, tool::ToolKind,
    workspace::Workspace,
};

pub use resolver::{resolve_output_path, ResolveError, Resolver, ResolverConfig, SourceCheck};
pub use util::context::GlobalContext;
