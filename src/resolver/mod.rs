//! Build configuration resolution.
//!
//! The resolver turns target declarations into [`BuildTarget`]s with absolute
//! paths. It is a single pure pass over its inputs: the only I/O is reading
//! the filesystem to see which files a source pattern matches.

pub mod errors;
pub mod paths;

pub use errors::ResolveError;
pub use paths::{resolve_output_path, PathFault};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::manifest::DEFAULT_OUTPUT_DIR;
use crate::core::options::ToolOptions;
use crate::core::root::ProjectRoot;
use crate::core::target::{BuildTarget, TargetDecl};
use crate::core::tool::ToolKind;
use crate::util::fs::{canonicalize_existing, check_pattern, glob_files, has_parent_component};

/// When a source pattern that matches no file is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCheck {
    /// Fail while defining the target
    #[default]
    Eager,
    /// Fail just before the plan is executed
    Deferred,
}

impl fmt::Display for SourceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCheck::Eager => write!(f, "eager"),
            SourceCheck::Deferred => write!(f, "deferred"),
        }
    }
}

impl FromStr for SourceCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eager" => Ok(SourceCheck::Eager),
            "deferred" => Ok(SourceCheck::Deferred),
            _ => Err(format!(
                "invalid source check '{}'; expected 'eager' or 'deferred'",
                s
            )),
        }
    }
}

/// Everything the resolver needs, passed in explicitly.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Directory all relative paths resolve against
    pub root: ProjectRoot,

    /// Fixed relative segment between the root and the per-target directories
    pub output_dir: String,

    pub source_check: SourceCheck,
}

impl ResolverConfig {
    pub fn new(root: ProjectRoot) -> Self {
        ResolverConfig {
            root,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            source_check: SourceCheck::default(),
        }
    }
}

/// Stateless resolver over a fixed configuration.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Resolver { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.config.root
    }

    /// Join `segments` under the project root.
    pub fn resolve_output_path<I, S>(&self, segments: I) -> Result<PathBuf, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resolve_output_path(&self.config.root, segments)
    }

    /// The configured output directory as an absolute path.
    pub fn output_dir(&self) -> Result<PathBuf, ResolveError> {
        self.resolve_output_path([self.config.output_dir.as_str()])
    }

    /// Fail if `path` leaves the root once symlinks on disk are followed.
    ///
    /// Output paths are checked lexically when targets are defined; this is
    /// the second check, made right before anything is written or removed.
    pub fn check_contained(&self, path: &Path) -> Result<(), ResolveError> {
        match canonicalize_existing(path) {
            Ok(real) if self.root().contains(&real) => Ok(()),
            _ => Err(ResolveError::InvalidPathSegment {
                segment: self.root().relative(path).display().to_string(),
                fault: PathFault::SymlinkEscape,
            }),
        }
    }

    /// Define a target from a name, a source pattern and an output file name.
    ///
    /// The tool is picked from the pattern's extension; use [`Resolver::define`]
    /// to choose it explicitly.
    pub fn define_target(
        &self,
        name: &str,
        source_pattern: &str,
        output_filename: &str,
    ) -> Result<BuildTarget, ResolveError> {
        let decl = TargetDecl::new(
            name,
            ToolKind::for_source(source_pattern),
            source_pattern,
            output_filename,
        );
        self.define(&decl)
    }

    /// Resolve one declaration.
    pub fn define(&self, decl: &TargetDecl) -> Result<BuildTarget, ResolveError> {
        check_target_name(&decl.name)?;
        check_source_pattern(&decl.name, &decl.source)?;
        paths::check_file_name(&decl.filename)?;

        let options = ToolOptions::validated(
            decl.tool,
            decl.options
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone())),
        )
        .map_err(|reason| ResolveError::invalid_target(&decl.name, reason))?;

        let output_path = self.resolve_output_path([
            self.config.output_dir.as_str(),
            decl.name.as_str(),
            decl.filename.as_str(),
        ])?;

        let inputs = match self.config.source_check {
            SourceCheck::Eager => self.match_sources(&decl.name, &decl.source)?,
            SourceCheck::Deferred => Vec::new(),
        };

        debug!(
            "target `{}`: {} -> {} ({} input(s))",
            decl.name,
            decl.source,
            output_path.display(),
            inputs.len()
        );

        Ok(BuildTarget::new(
            decl.name.clone(),
            decl.tool,
            decl.source.clone(),
            output_path,
            options,
            inputs,
        ))
    }

    /// Resolve declarations in order, stopping at the first error.
    pub fn define_all(&self, decls: &[TargetDecl]) -> Result<Vec<BuildTarget>, ResolveError> {
        decls.iter().map(|decl| self.define(decl)).collect()
    }

    /// Files under the root matched by `pattern`; fails if there are none.
    pub fn match_sources(&self, target: &str, pattern: &str) -> Result<Vec<PathBuf>, ResolveError> {
        let files = glob_files(self.config.root.as_path(), pattern)
            .map_err(|e| ResolveError::invalid_target(target, format!("{:#}", e)))?;

        if files.is_empty() {
            return Err(ResolveError::MissingSource {
                target: target.to_string(),
                pattern: pattern.to_string(),
            });
        }
        Ok(files)
    }
}

fn check_target_name(name: &str) -> Result<(), ResolveError> {
    if name.is_empty() {
        return Err(ResolveError::invalid_target(name, "target name is empty"));
    }
    paths::check_component(name)
        .map_err(|fault| ResolveError::invalid_target(name, format!("target name: {}", fault)))
}

fn check_source_pattern(target: &str, pattern: &str) -> Result<(), ResolveError> {
    if pattern.is_empty() {
        return Err(ResolveError::invalid_target(target, "source pattern is empty"));
    }
    if Path::new(pattern).is_absolute() || pattern.starts_with('/') {
        return Err(ResolveError::invalid_target(
            target,
            format!("source pattern `{}` must be relative to the project root", pattern),
        ));
    }
    if has_parent_component(Path::new(pattern)) {
        return Err(ResolveError::invalid_target(
            target,
            format!("source pattern `{}` must not leave the project root", pattern),
        ));
    }
    check_pattern(pattern).map_err(|e| {
        ResolveError::invalid_target(target, format!("invalid glob `{}`: {}", pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionValue;
    use tempfile::TempDir;

    fn project() -> (TempDir, Resolver) {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/a.coffee"), "a = 1").unwrap();
        let root = ProjectRoot::new(tmp.path()).unwrap();
        (tmp, Resolver::new(ResolverConfig::new(root)))
    }

    fn deferred(resolver: &Resolver) -> Resolver {
        let mut config = resolver.config().clone();
        config.source_check = SourceCheck::Deferred;
        Resolver::new(config)
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let tmp = TempDir::new().unwrap();
        for dir in ["site[v2]", "a[b"] {
            let base = tmp.path().join(dir);
            std::fs::create_dir_all(base.join("src")).unwrap();
            std::fs::write(base.join("src/a.coffee"), "a = 1").unwrap();
            let resolver = Resolver::new(ResolverConfig::new(ProjectRoot::new(&base).unwrap()));

            let target = resolver
                .define_target("math", "src/*.coffee", "math.js")
                .unwrap_or_else(|e| panic!("{}: {}", dir, e));
            assert_eq!(target.inputs().len(), 1, "{}", dir);
            assert!(target.inputs()[0].ends_with("src/a.coffee"));
        }
    }

    #[test]
    fn test_define_target_output_path() {
        let (_tmp, resolver) = project();
        let target = resolver
            .define_target("math", "src/*.coffee", "math.js")
            .unwrap();

        assert!(target.output_path().ends_with("math.js"));
        assert!(target
            .output_path()
            .ends_with("target/classes/webroot/math/math.js"));
        assert!(resolver.root().contains(target.output_path()));
        assert_eq!(target.tool(), ToolKind::Coffee);
        assert_eq!(target.inputs().len(), 1);
        assert!(target.inputs()[0].ends_with("src/a.coffee"));
    }

    #[test]
    fn test_empty_name_is_invalid_target() {
        let (_tmp, resolver) = project();
        let err = resolver.define_target("", "*.js", "out.js").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTarget { .. }));
    }

    #[test]
    fn test_name_with_separator_is_invalid_target() {
        let (_tmp, resolver) = project();
        for name in ["..", "a:b", "con"] {
            let err = resolver
                .define_target(name, "src/*.coffee", "out.js")
                .unwrap_err();
            assert!(matches!(err, ResolveError::InvalidTarget { .. }), "{}", name);
        }
    }

    #[test]
    fn test_bad_patterns_are_invalid_target() {
        let (_tmp, resolver) = project();
        for pattern in ["", "/etc/*", "../other/*.js", "src/[a-"] {
            let err = resolver.define_target("x", pattern, "x.js").unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidTarget { .. }),
                "{:?}: {:?}",
                pattern,
                err
            );
        }
    }

    #[test]
    fn test_bad_filename_is_invalid_segment() {
        let (_tmp, resolver) = project();
        for filename in ["", "js/out.js", "out?.js", ".."] {
            let err = resolver
                .define_target("math", "src/*.coffee", filename)
                .unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidPathSegment { .. }),
                "{:?}",
                filename
            );
        }
    }

    #[test]
    fn test_bad_output_dir_is_invalid_segment() {
        let (_tmp, resolver) = project();
        let mut config = resolver.config().clone();
        config.output_dir = "../dist".to_string();
        let resolver = Resolver::new(config);

        let err = resolver
            .define_target("math", "src/*.coffee", "math.js")
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidPathSegment {
                segment: "../dist".into(),
                fault: PathFault::ParentTraversal,
            }
        );
    }

    #[test]
    fn test_missing_source_eager() {
        let (_tmp, resolver) = project();
        let err = resolver
            .define_target("app", "src/main/javascript/*.js", "app.js")
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingSource {
                target: "app".into(),
                pattern: "src/main/javascript/*.js".into(),
            }
        );
    }

    #[test]
    fn test_missing_source_deferred() {
        let (_tmp, resolver) = project();
        let resolver = deferred(&resolver);
        let target = resolver
            .define_target("app", "src/main/javascript/*.js", "app.js")
            .unwrap();
        assert!(target.inputs().is_empty());

        let err = resolver
            .match_sources(target.name(), target.source_pattern())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingSource { .. }));
    }

    #[test]
    fn test_options_validated_against_tool() {
        let (_tmp, resolver) = project();
        let options = ToolOptions::validated(
            ToolKind::Coffee,
            [("bare".to_string(), OptionValue::Bool(true))],
        )
        .unwrap();

        let decl = TargetDecl::new("math", ToolKind::Coffee, "src/*.coffee", "math.js")
            .with_options(options.clone());
        assert_eq!(resolver.define(&decl).unwrap().options(), &options);

        let decl = TargetDecl::new("math", ToolKind::Webpack, "src/*.coffee", "math.js")
            .with_options(options);
        let err = resolver.define(&decl).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTarget { .. }));
    }

    #[test]
    fn test_define_all_stops_at_first_error() {
        let (_tmp, resolver) = project();
        let decls = vec![
            TargetDecl::new("ok", ToolKind::Coffee, "src/*.coffee", "ok.js"),
            TargetDecl::new("", ToolKind::Coffee, "src/*.coffee", "bad.js"),
            TargetDecl::new("missing", ToolKind::Webpack, "nope/*.js", "m.js"),
        ];
        let err = resolver.define_all(&decls).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTarget { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_contained_follows_symlinks() {
        let (tmp, resolver) = project();
        let elsewhere = TempDir::new().unwrap();
        let out = resolver.output_dir().unwrap();
        assert_eq!(resolver.check_contained(&out), Ok(()));

        std::fs::create_dir(tmp.path().join("dist")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("dist"), tmp.path().join("target")).unwrap();
        assert_eq!(resolver.check_contained(&out), Ok(()));

        std::fs::remove_file(tmp.path().join("target")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), tmp.path().join("target")).unwrap();
        assert_eq!(
            resolver.check_contained(&out),
            Err(ResolveError::InvalidPathSegment {
                segment: "target/classes/webroot".to_string(),
                fault: PathFault::SymlinkEscape,
            })
        );
    }

    #[test]
    fn test_output_dir() {
        let (_tmp, resolver) = project();
        let dir = resolver.output_dir().unwrap();
        assert_eq!(dir, resolver.root().as_path().join("target/classes/webroot"));
    }

    #[test]
    fn test_source_check_parse() {
        assert_eq!("Deferred".parse::<SourceCheck>().unwrap(), SourceCheck::Deferred);
        assert!("later".parse::<SourceCheck>().is_err());
        assert_eq!(SourceCheck::default().to_string(), "eager");
    }
}
