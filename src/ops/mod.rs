//! High-level operations.
//!
//! This module contains the implementation of Wharf commands.

pub mod wharf_build;
pub mod wharf_clean;
pub mod wharf_init;
pub mod wharf_plan;

pub use wharf_build::{build, BuildOptions, BuildResult};
pub use wharf_clean::clean;
pub use wharf_init::{init_project, InitOptions};
pub use wharf_plan::{list_targets, resolve_plan, PlanOptions, TargetListing};
