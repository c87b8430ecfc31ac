//! Wharf.toml manifest parsing and schema.
//!
//! The manifest is the only input describing what to build. Targets are an
//! array of tables so their declaration order is the build order.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::ToolOptions;
use crate::core::target::TargetDecl;
use crate::core::tool::ToolKind;
use crate::resolver::errors::ResolveError;
use crate::util::fs::read_to_string;

/// Output directory, relative to the project root, used when `[output]` is absent.
pub const DEFAULT_OUTPUT_DIR: &str = "target/classes/webroot";

/// The parsed Wharf.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectMetadata,

    /// Where artifacts go
    pub output: OutputConfig,

    /// Targets in declaration order
    pub targets: Vec<TargetDecl>,
}

/// Project metadata from the [project] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMetadata {
    /// Project name
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// The [output] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory under the project root that receives one subdirectory per target
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    project: ProjectMetadata,

    #[serde(default)]
    output: OutputConfig,

    #[serde(default, rename = "target")]
    targets: Vec<RawTarget>,
}

/// Raw target from TOML (before option validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    name: String,

    tool: ToolKind,

    #[serde(alias = "entry")]
    source: String,

    filename: String,

    #[serde(default)]
    options: BTreeMap<String, toml::Value>,
}

impl RawTarget {
    fn into_decl(self) -> Result<TargetDecl, ResolveError> {
        let options = ToolOptions::from_toml(self.tool, &self.options)
            .map_err(|reason| ResolveError::invalid_target(&self.name, reason))?;

        Ok(TargetDecl::new(self.name, self.tool, self.source, self.filename).with_options(options))
    }
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest text.
    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents)?;

        let targets = raw
            .targets
            .into_iter()
            .map(RawTarget::into_decl)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Manifest {
            project: raw.project,
            output: raw.output,
            targets,
        })
    }

    /// Find a declared target by name.
    pub fn target(&self, name: &str) -> Option<&TargetDecl> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gruntfile_equivalent() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "web-template-example"

[[target]]
name = "math"
tool = "coffee"
source = "src/main/coffee/*"
filename = "math.js"
options = { expand = true, flatten = true, sourceMap = true, bare = true }
"#,
        )
        .unwrap();

        assert_eq!(manifest.project.name, "web-template-example");
        assert_eq!(manifest.output.dir, DEFAULT_OUTPUT_DIR);
        assert_eq!(manifest.targets.len(), 1);

        let math = manifest.target("math").unwrap();
        assert_eq!(math.tool, ToolKind::Coffee);
        assert_eq!(math.source, "src/main/coffee/*");
        assert_eq!(math.options.flag("sourceMap"), Some(true));
    }

    #[test]
    fn test_parse_webpack_config_equivalent() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "frontend-example"
version = "1.0.0"

[output]
dir = "target/classes/webroot"

[[target]]
name = "frontend-example"
tool = "webpack"
entry = "src/main/javascript/index.js"
filename = "app.js"
"#,
        )
        .unwrap();

        let target = &manifest.targets[0];
        assert_eq!(target.tool, ToolKind::Webpack);
        assert_eq!(target.source, "src/main/javascript/index.js");
        assert!(target.options.is_empty());
        assert_eq!(manifest.project.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_targets_keep_declaration_order() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "multi"

[[target]]
name = "zeta"
tool = "webpack"
source = "z.js"
filename = "z.js"

[[target]]
name = "alpha"
tool = "webpack"
source = "a.js"
filename = "a.js"
"#,
        )
        .unwrap();

        let names: Vec<&str> = manifest.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_no_targets() {
        let manifest = Manifest::parse("[project]\nname = \"empty\"\n").unwrap();
        assert!(manifest.targets.is_empty());
    }

    #[test]
    fn test_invalid_option_is_invalid_target() {
        let err = Manifest::parse(
            r#"
[project]
name = "bad"

[[target]]
name = "math"
tool = "coffee"
source = "src/*.coffee"
filename = "math.js"
options = { minify = true }
"#,
        )
        .unwrap_err();

        let resolve = err.downcast_ref::<ResolveError>().unwrap();
        assert!(matches!(resolve, ResolveError::InvalidTarget { name, .. } if name == "math"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Manifest::parse(
            r#"
[project]
name = "bad"

[[target]]
name = "math"
tool = "coffee"
source = "src/*.coffee"
filename = "math.js"
path = "/tmp/out"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `path`"));
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let err = Manifest::parse(
            r#"
[project]
name = "bad"

[[target]]
name = "x"
tool = "grunt"
source = "x"
filename = "x.js"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant `grunt`"));
    }
}
