//! Command lines for the external tools.
//!
//! Only options with a direct CLI equivalent become flags. `expand` and
//! `flatten` describe file mapping and stay in the plan only.

use std::path::Path;

use crate::builder::plan::BuildAction;
use crate::core::tool::ToolKind;
use crate::util::process::ProcessBuilder;

/// Build the invocation for `action` using `program`.
///
/// Inputs must already be materialized; an action with no inputs produces a
/// command with no source arguments.
pub fn tool_command(action: &BuildAction, program: &Path) -> ProcessBuilder {
    match action.tool {
        ToolKind::Coffee => coffee_command(action, program),
        ToolKind::Webpack => webpack_command(action, program),
    }
}

fn coffee_command(action: &BuildAction, program: &Path) -> ProcessBuilder {
    let opts = &action.options;
    let mut cmd = ProcessBuilder::new(program).arg("--compile");

    if opts.flag("bare") == Some(true) {
        cmd = cmd.arg("--bare");
    }
    if opts.flag("sourceMap") == Some(true) {
        cmd = cmd.arg("--map");
    }
    if opts.flag("header") == Some(false) {
        cmd = cmd.arg("--no-header");
    }

    // Several inputs always go into the one declared output file.
    let join = action.inputs.len() > 1 || opts.flag("join") == Some(true);
    cmd = if join {
        cmd.arg("--join").arg(&action.output)
    } else {
        cmd.arg("--output").arg(&action.output)
    };

    cmd.args(&action.inputs)
}

fn webpack_command(action: &BuildAction, program: &Path) -> ProcessBuilder {
    let opts = &action.options;
    let mut cmd = ProcessBuilder::new(program);

    for input in &action.inputs {
        cmd = cmd.arg("--entry").arg(input);
    }

    cmd = cmd
        .arg("--output-path")
        .arg(action.output_dir())
        .arg("--output-filename")
        .arg(action.output_filename());

    for name in ["mode", "devtool", "target"] {
        if let Some(value) = opts.string(name) {
            cmd = cmd.arg(format!("--{}", name)).arg(value);
        }
    }
    if opts.flag("bail") == Some(true) {
        cmd = cmd.arg("--bail");
    }
    if let Some(n) = opts.integer("parallelism") {
        cmd = cmd.arg("--parallelism").arg(n.to_string());
    }

    cmd
}
