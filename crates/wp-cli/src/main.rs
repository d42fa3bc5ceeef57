use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod workflows;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("waypoint error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(flags.quiet, flags.verbose)?;

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;
    context::warn_unconfigured(&config);

    let mut ctx = context::AppContext::init(project_root, config)
        .await
        .context("failed to initialize waypoint application context")?;

    let result = commands::dispatch::dispatch(cli.command, &mut ctx, &flags).await;
    ctx.drain_background().await;
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("WAYPOINT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);
        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == ".waypoint")
        {
            return explicit
                .parent()
                .map(std::path::Path::to_path_buf)
                .context("invalid --project path: '.waypoint' directory has no parent");
        }
        if explicit.is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!("invalid --project '{}': directory does not exist", explicit.display());
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(context::find_project_root(&cwd).unwrap_or(cwd))
}
