//! Build plan generation.
//!
//! A BuildPlan is the ordered list of actions handed to the external tools:
//! one action per target, in the order the targets were given. Targets are
//! independent, so no ordering between them is computed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::options::ToolOptions;
use crate::core::root::ProjectRoot;
use crate::core::target::BuildTarget;
use crate::core::tool::ToolKind;
use crate::resolver::errors::ResolveError;

/// A complete build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Project name from the manifest
    pub project: String,

    /// Absolute project root
    pub root: PathBuf,

    /// Actions in execution order
    pub actions: Vec<BuildAction>,
}

/// One hand-off to an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAction {
    /// Target name
    pub target: String,

    /// Tool to run
    pub tool: ToolKind,

    /// Source pattern as declared
    pub source_pattern: String,

    /// Files matched by the pattern (empty until materialized when deferred)
    pub inputs: Vec<PathBuf>,

    /// Absolute output file
    pub output: PathBuf,

    /// Options passed to the tool
    #[serde(default, skip_serializing_if = "ToolOptions::is_empty")]
    pub options: ToolOptions,
}

impl BuildAction {
    fn from_target(target: BuildTarget) -> Self {
        BuildAction {
            target: target.name().to_string(),
            tool: target.tool(),
            source_pattern: target.source_pattern().to_string(),
            inputs: target.inputs().to_vec(),
            output: target.output_path().to_path_buf(),
            options: target.options().clone(),
        }
    }

    /// Directory the output file is written into.
    pub fn output_dir(&self) -> &Path {
        self.output.parent().unwrap_or(Path::new(""))
    }

    /// Output file name without its directory.
    pub fn output_filename(&self) -> String {
        self.output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Turn resolved targets into actions, one per target, in input order.
///
/// Two targets writing the same output file fail the whole plan, as does a
/// target name used twice. Output paths are compared ignoring case, since
/// paths that differ only in case are one file on Windows and macOS.
pub fn emit_build_plan(targets: Vec<BuildTarget>) -> Result<Vec<BuildAction>, ResolveError> {
    let mut outputs: HashMap<String, String> = HashMap::new();
    let mut names: HashMap<String, usize> = HashMap::new();

    for (index, target) in targets.iter().enumerate() {
        let key = target.output_path().to_string_lossy().to_lowercase();
        if let Some(owner) = outputs.insert(key, target.name().to_string()) {
            return Err(ResolveError::invalid_target(
                target.name(),
                format!(
                    "output `{}` is already produced by target `{}`",
                    target.output_path().display(),
                    owner
                ),
            ));
        }

        if let Some(first) = names.insert(target.name().to_string(), index) {
            return Err(ResolveError::invalid_target(
                target.name(),
                format!("declared twice (entries {} and {})", first + 1, index + 1),
            ));
        }
    }

    Ok(targets.into_iter().map(BuildAction::from_target).collect())
}

impl BuildPlan {
    /// Create a plan for `project` from resolved targets.
    pub fn new(
        project: impl Into<String>,
        root: &ProjectRoot,
        targets: Vec<BuildTarget>,
    ) -> Result<Self, ResolveError> {
        let actions = emit_build_plan(targets)?;
        Ok(BuildPlan {
            project: project.into(),
            root: root.as_path().to_path_buf(),
            actions,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Find the action for a target.
    pub fn action(&self, target: &str) -> Option<&BuildAction> {
        self.actions.iter().find(|a| a.target == target)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::TargetDecl;
    use crate::resolver::{Resolver, ResolverConfig};
    use tempfile::TempDir;

    fn resolver() -> (TempDir, Resolver) {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        for file in ["a.coffee", "b.coffee", "index.js", "admin.js"] {
            std::fs::write(src.join(file), "").unwrap();
        }
        let root = ProjectRoot::new(tmp.path()).unwrap();
        (tmp, Resolver::new(ResolverConfig::new(root)))
    }

    #[test]
    fn test_one_action_per_target_in_order() {
        let (_tmp, resolver) = resolver();
        let targets = vec![
            resolver.define_target("site", "src/index.js", "app.js").unwrap(),
            resolver.define_target("math", "src/*.coffee", "math.js").unwrap(),
            resolver.define_target("admin", "src/admin.js", "admin.js").unwrap(),
        ];

        let actions = emit_build_plan(targets).unwrap();
        let names: Vec<&str> = actions.iter().map(|a| a.target.as_str()).collect();
        assert_eq!(names, ["site", "math", "admin"]);
        assert_eq!(actions[1].inputs.len(), 2);
        assert_eq!(actions[1].tool, ToolKind::Coffee);
        assert_eq!(actions[0].output_filename(), "app.js");
        assert!(actions[0].output_dir().ends_with("target/classes/webroot/site"));
    }

    #[test]
    fn test_empty_plan() {
        assert!(emit_build_plan(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_output_rejected() {
        let (_tmp, resolver) = resolver();
        let first = resolver.define_target("app", "src/index.js", "app.js").unwrap();
        let dup = resolver
            .define(&TargetDecl::new(
                "app",
                ToolKind::Webpack,
                "src/admin.js",
                "app.js",
            ))
            .unwrap();
        assert_eq!(first.output_path(), dup.output_path());

        match emit_build_plan(vec![first, dup]).unwrap_err() {
            ResolveError::InvalidTarget { name, reason } => {
                assert_eq!(name, "app");
                assert!(reason.contains("already produced by target `app`"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_outputs_differing_only_in_case_rejected() {
        let (_tmp, resolver) = resolver();
        let upper = resolver.define_target("App", "src/index.js", "app.js").unwrap();
        let lower = resolver.define_target("app", "src/admin.js", "APP.js").unwrap();
        assert_ne!(upper.output_path(), lower.output_path());

        match emit_build_plan(vec![upper, lower]).unwrap_err() {
            ResolveError::InvalidTarget { name, reason } => {
                assert_eq!(name, "app");
                assert!(reason.contains("already produced by target `App`"));
                assert!(reason.contains("APP.js"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_tmp, resolver) = resolver();
        let first = resolver.define_target("app", "src/index.js", "app.js").unwrap();
        let second = resolver.define_target("app", "src/admin.js", "admin.js").unwrap();

        match emit_build_plan(vec![first, second]).unwrap_err() {
            ResolveError::InvalidTarget { name, reason } => {
                assert_eq!(name, "app");
                assert_eq!(reason, "declared twice (entries 1 and 2)");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_plan_json() {
        let (_tmp, resolver) = resolver();
        let targets = vec![resolver.define_target("math", "src/*.coffee", "math.js").unwrap()];
        let plan = BuildPlan::new("demo", resolver.root(), targets).unwrap();

        let json = plan.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["project"], "demo");
        assert_eq!(value["actions"][0]["target"], "math");
        assert_eq!(value["actions"][0]["tool"], "coffee");
        assert!(value["actions"][0].get("options").is_none());

        let back: BuildPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
