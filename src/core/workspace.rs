//! Workspace - central configuration hub.
//!
//! A Workspace ties a loaded manifest to its project root and the merged
//! configuration, and hands out the resolver configured for it.

use std::path::{Path, PathBuf};

use anyhow::Result;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::manifest::Manifest;
use crate::core::root::ProjectRoot;
use crate::resolver::{Resolver, ResolverConfig, SourceCheck};
use crate::util::config::Config;
use crate::util::GlobalContext;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Wharf.toml";

/// Lower-case alias accepted for the manifest.
pub const MANIFEST_ALIAS: &str = "wharf.toml";

/// Errors locating a manifest.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("could not find `{}` in `{}` or any parent directory", MANIFEST_NAME, .dir.display())]
    #[diagnostic(
        code(wharf::manifest::not_found),
        help("Run `wharf init` to create a Wharf.toml")
    )]
    NotFound { dir: PathBuf },

    #[error("both `{}` and `{}` exist", .primary.display(), .alias.display())]
    #[diagnostic(
        code(wharf::manifest::ambiguous),
        help("Delete one of the two manifests")
    )]
    AmbiguousManifest { primary: PathBuf, alias: PathBuf },
}

/// Find the manifest in exactly this directory.
///
/// File names are compared exactly so that case-insensitive filesystems do not
/// report the alias as a second manifest.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let mut primary = None;
    let mut alias = None;

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name == MANIFEST_NAME {
                primary = Some(entry.path());
            } else if name == MANIFEST_ALIAS {
                alias = Some(entry.path());
            }
        }
    }

    match (primary, alias) {
        (Some(primary), Some(alias)) => Err(ManifestError::AmbiguousManifest { primary, alias }),
        (Some(path), None) | (None, Some(path)) => Ok(path),
        (None, None) => Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        }),
    }
}

/// A loaded project: manifest, root and configuration.
#[derive(Debug)]
pub struct Workspace {
    manifest: Manifest,
    manifest_path: PathBuf,
    root: ProjectRoot,
    config: Config,
    source_check: SourceCheck,
}

impl Workspace {
    /// Load the manifest at `manifest_path` and the configuration that applies to it.
    pub fn new(manifest_path: &Path, ctx: &GlobalContext) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let dir = manifest_path.parent().unwrap_or(Path::new("."));
        let root = ProjectRoot::new(ctx.cwd().join(dir))?;
        let config = ctx.load_config(root.as_path());
        let source_check = config.source_check();

        tracing::debug!(
            "loaded workspace `{}` at {}",
            manifest.project.name,
            root.as_path().display()
        );

        Ok(Workspace {
            manifest,
            manifest_path: manifest_path.to_path_buf(),
            root,
            config,
            source_check,
        })
    }

    /// Override the configured source check policy.
    pub fn with_source_check(mut self, source_check: SourceCheck) -> Self {
        self.source_check = source_check;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source_check(&self) -> SourceCheck {
        self.source_check
    }

    /// Build the resolver for this workspace.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(ResolverConfig {
            root: self.root.clone(),
            output_dir: self.manifest.output.dir.clone(),
            source_check: self.source_check,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path) -> PathBuf {
        let manifest_path = dir.join(MANIFEST_NAME);
        std::fs::write(
            &manifest_path,
            r#"
[project]
name = "frontend-example"

[[target]]
name = "app"
tool = "webpack"
source = "src/main/javascript/index.js"
filename = "app.js"
"#,
        )
        .unwrap();
        manifest_path
    }

    #[test]
    fn test_find_manifest_in_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            find_manifest(tmp.path()),
            Err(ManifestError::NotFound { .. })
        ));

        let path = write_manifest(tmp.path());
        assert_eq!(find_manifest(tmp.path()).unwrap(), path);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_ambiguous_manifest() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path());
        std::fs::write(tmp.path().join(MANIFEST_ALIAS), "").unwrap();

        assert!(matches!(
            find_manifest(tmp.path()),
            Err(ManifestError::AmbiguousManifest { .. })
        ));
    }

    #[test]
    fn test_workspace_creation() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = write_manifest(tmp.path());
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_home(None);

        let ws = Workspace::new(&manifest_path, &ctx).unwrap();
        assert_eq!(ws.manifest().project.name, "frontend-example");
        assert!(ws.root().as_path().is_absolute());
        assert_eq!(ws.source_check(), SourceCheck::Eager);
    }

    #[test]
    fn test_project_config_sets_source_check() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = write_manifest(tmp.path());
        std::fs::create_dir_all(tmp.path().join(".wharf")).unwrap();
        std::fs::write(
            tmp.path().join(".wharf/config.toml"),
            "[resolve]\nsource-check = \"deferred\"\n",
        )
        .unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_home(None);

        let ws = Workspace::new(&manifest_path, &ctx).unwrap();
        assert_eq!(ws.source_check(), SourceCheck::Deferred);

        let ws = ws.with_source_check(SourceCheck::Eager);
        assert_eq!(ws.source_check(), SourceCheck::Eager);
    }
}
