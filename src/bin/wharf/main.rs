//! Wharf CLI - resolve web asset build configuration into a build plan

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic as MietteDiagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use wharf::core::workspace::ManifestError;
use wharf::resolver::ResolveError;
use wharf::util::diagnostic::{self, Diagnostic};
use wharf::util::GlobalContext;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("wharf=debug")
    } else {
        EnvFilter::new("wharf=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(color);

    let manifest = cli.manifest_path.as_deref();

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, &ctx, manifest),
        Commands::Build(args) => commands::build::execute(args, &ctx, manifest),
        Commands::Targets => commands::targets::execute(&ctx, manifest),
        Commands::Init(args) => commands::init::execute(args, &ctx),
        Commands::Clean => commands::clean::execute(&ctx, manifest),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, using the rich diagnostic when one is available.
fn report(e: &anyhow::Error, color: bool) {
    if let Some(resolve) = e.chain().find_map(|c| c.downcast_ref::<ResolveError>()) {
        let mut diag = resolve.to_diagnostic();
        for outer in e
            .chain()
            .take_while(|c| c.downcast_ref::<ResolveError>().is_none())
        {
            diag = diag.with_context(outer.to_string());
        }
        diagnostic::emit(&diag, color);
        return;
    }

    if let Some(err) = e.chain().find_map(|c| c.downcast_ref::<ManifestError>()) {
        let mut diag = Diagnostic::error(err.to_string());
        if let Some(help) = MietteDiagnostic::help(err) {
            diag = diag.with_suggestion(help.to_string());
        }
        diagnostic::emit(&diag, color);
        return;
    }

    eprintln!("error: {:#}", e);
}
