//! `wharf init` command

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::cli::InitArgs;
use wharf::ops::{init_project, InitOptions};
use wharf::util::GlobalContext;

/// Determines the project name from the arguments or directory.
pub fn determine_project_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

/// Validates a project name for common issues.
pub fn validate_project_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("project name cannot be empty");
    }

    if name.starts_with('-') || name.starts_with('_') || name.starts_with('.') {
        return Err("project name cannot start with a hyphen, underscore or dot");
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err("project name contains invalid characters");
    }

    Ok(())
}

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = ctx.cwd().join(args.path.unwrap_or_else(|| PathBuf::from(".")));

    // `.` has no file name of its own
    let dir = path.canonicalize().unwrap_or_else(|_| path.clone());
    let name = determine_project_name(&args.name, &dir);

    if let Err(reason) = validate_project_name(&name) {
        bail!("invalid project name `{}`: {}", name, reason);
    }

    init_project(&path, &InitOptions { name: name.clone() })?;

    eprintln!("     Initialized `{}` project", name);

    Ok(())
}
