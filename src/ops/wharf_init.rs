//! Implementation of `wharf init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::DEFAULT_OUTPUT_DIR;
use crate::core::workspace::{MANIFEST_ALIAS, MANIFEST_NAME};

/// Options for initializing a project.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Project name
    pub name: String,
}

/// Entry point written for the starter target.
pub const STARTER_ENTRY: &str = "src/main/javascript/index.js";

/// Generate the starter manifest for a project.
pub fn generate_manifest(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[output]
dir = "{output}"

[[target]]
name = "app"
tool = "webpack"
source = "{entry}"
filename = "app.js"
options = {{ mode = "production" }}
"#,
        name = name,
        output = DEFAULT_OUTPUT_DIR,
        entry = STARTER_ENTRY,
    )
}

/// Write a starter Wharf.toml and entry point into `path`.
///
/// An existing entry point is left untouched.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    for existing in [MANIFEST_NAME, MANIFEST_ALIAS] {
        if path.join(existing).exists() {
            bail!("`{}` already exists in `{}`", existing, path.display());
        }
    }

    let manifest_path = path.join(MANIFEST_NAME);
    fs::write(&manifest_path, generate_manifest(&opts.name))
        .with_context(|| format!("failed to write {}", MANIFEST_NAME))?;

    let entry = path.join(STARTER_ENTRY);
    if !entry.exists() {
        if let Some(dir) = entry.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        }
        fs::write(&entry, "console.log(\"Hello, Wharf!\");\n")
            .with_context(|| format!("failed to write {}", STARTER_ENTRY))?;
    }

    tracing::debug!("initialized `{}` at {}", opts.name, path.display());
    Ok(())
}
