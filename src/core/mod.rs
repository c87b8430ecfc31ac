//! Core data structures for Wharf.
//!
//! This module contains the foundational types used throughout Wharf:
//! - The project root all paths resolve against
//! - Tools and their option schemas
//! - Target declarations and resolved targets
//! - Manifests and workspace loading

pub mod manifest;
pub mod options;
pub mod root;
pub mod target;
pub mod tool;
pub mod workspace;

pub use manifest::Manifest;
pub use options::{OptionValue, ToolOptions};
pub use root::ProjectRoot;
pub use target::{BuildTarget, TargetDecl};
pub use tool::ToolKind;
pub use workspace::{find_manifest, Workspace, MANIFEST_ALIAS, MANIFEST_NAME};
