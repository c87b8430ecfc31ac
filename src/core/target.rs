//! Target definitions - what gets built.
//!
//! A [`TargetDecl`] is what the manifest says; a [`BuildTarget`] is the same
//! target after resolution, with an absolute output path the user never
//! spells out.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::options::ToolOptions;
use crate::core::tool::ToolKind;

/// A target as declared, before any path is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDecl {
    /// Target name, also used as the output subdirectory
    pub name: String,

    /// Tool the target is handed to
    pub tool: ToolKind,

    /// Source path or glob, relative to the project root
    pub source: String,

    /// Output file name
    pub filename: String,

    /// Tool options
    pub options: ToolOptions,
}

impl TargetDecl {
    /// Create a declaration with no options.
    pub fn new(
        name: impl Into<String>,
        tool: ToolKind,
        source: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        TargetDecl {
            name: name.into(),
            tool,
            source: source.into(),
            filename: filename.into(),
            options: ToolOptions::new(),
        }
    }

    pub fn with_options(mut self, options: ToolOptions) -> Self {
        self.options = options;
        self
    }
}

/// A resolved build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    name: String,
    tool: ToolKind,
    source_pattern: String,
    output_path: PathBuf,
    options: ToolOptions,
    inputs: Vec<PathBuf>,
}

impl BuildTarget {
    /// Only the resolver builds targets, so `output_path` is always derived.
    pub(crate) fn new(
        name: String,
        tool: ToolKind,
        source_pattern: String,
        output_path: PathBuf,
        options: ToolOptions,
        inputs: Vec<PathBuf>,
    ) -> Self {
        BuildTarget {
            name,
            tool,
            source_pattern,
            output_path,
            options,
            inputs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn source_pattern(&self) -> &str {
        &self.source_pattern
    }

    /// Absolute path of the produced artifact.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    /// Files matched at resolution time; empty when the check was deferred.
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }
}
