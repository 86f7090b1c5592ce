use crate::config::{LayoutConfig, load_config};
use crate::layout::FamilyLayout;
use crate::layout_dump::write_layout_dump;
use crate::workspace::{TrackedWorkspace, WorkspaceSnapshot};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "famtree", version, about = "Auto-format a family-tree workspace")]
pub struct Args {
    /// Workspace snapshot (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the formatted snapshot. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Also write wrappers, heights and diagnostics to this file
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,

    /// Print the node change summary to stderr
    #[arg(long = "changes")]
    pub changes: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let snapshot: WorkspaceSnapshot =
        serde_json::from_str(&input).context("input is not a workspace snapshot")?;

    let (workspace, layout) = format_snapshot(snapshot, &config)?;
    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &layout, config.export_padding)
            .with_context(|| format!("failed to write layout dump {}", path.display()))?;
    }
    if args.changes {
        eprintln!("{}", change_summary(&workspace));
    }

    let json = serde_json::to_string_pretty(&workspace.snapshot())?;
    write_output(&json, args.output.as_deref())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn format_snapshot(
    snapshot: WorkspaceSnapshot,
    config: &LayoutConfig,
) -> Result<(TrackedWorkspace, FamilyLayout)> {
    let mut workspace = TrackedWorkspace::from_snapshot(snapshot);
    let layout = workspace
        .auto_format(config)
        .context("cannot lay out workspace")?;
    tracing::info!(diagnostics = layout.diagnostics.len(), "workspace formatted");
    Ok((workspace, layout))
}

fn change_summary(workspace: &TrackedWorkspace) -> String {
    let nodes = workspace.node_changes();
    format!(
        "nodes: {} added, {} updated, {} deleted",
        nodes.added.len(),
        nodes.updated.len(),
        nodes.deleted.len()
    )
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}
