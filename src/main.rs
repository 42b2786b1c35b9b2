//! treebeard - Convert a directory into a JSON tree for tree-view widgets.
//!
//! Usage:
//!   treebeard [PATH]              Print the tree as JSON
//!   treebeard [PATH] -o out.json  Write the tree to a file
//!   treebeard --help              Show help

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::Level;

use treebeard_scan::{AssemblyMode, DirWalker, ScanError, WalkConfig, WalkStats};

#[derive(Parser)]
#[command(
    name = "treebeard",
    version,
    about = "Convert a directory into a JSON tree",
    long_about = "treebeard walks a directory in sorted order and prints it as a \
                  nested JSON tree of nodes with `name`, `toggled`, `active`, \
                  `path`, `isdir` and `children` fields."
)]
struct Cli {
    /// Directory to convert (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Fail if an entry cannot be attached to its parent instead of dropping it
    #[arg(long)]
    strict: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// Print walk statistics to stderr
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = WalkConfig::builder()
        .root(cli.path.clone())
        .follow_symlinks(cli.follow_symlinks)
        .assembly(if cli.strict {
            AssemblyMode::Indexed
        } else {
            AssemblyMode::Sequential
        })
        .build()
        .map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })?;

    run(&config, &cli)
}

fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

/// Walk, assemble and write the tree.
fn run(config: &WalkConfig, cli: &Cli) -> Result<()> {
    let walk = DirWalker::with_config(config.clone())
        .walk()
        .map_err(|failure| failure.error)
        .wrap_err_with(|| format!("Failed to walk {}", config.root.display()))?;

    let stats = walk.stats.clone();
    let root = walk
        .into_tree(config.assembly)
        .context("Failed to assemble tree")?;

    if cli.summary {
        print_summary(config, &stats, root.size());
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&root)?
    } else {
        serde_json::to_string(&root)?
    };

    match &cli.output {
        Some(output_path) => {
            std::fs::write(output_path, json)
                .wrap_err_with(|| format!("Failed to write {}", output_path.display()))?;
            tracing::info!(path = %output_path.display(), "tree written");
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

/// Print walk statistics to stderr.
fn print_summary(config: &WalkConfig, stats: &WalkStats, attached: usize) {
    eprintln!("{}", "─".repeat(60));
    eprintln!(" {}", config.root.display());
    eprintln!(
        " {} files, {} directories, {} symlinks, {} other",
        stats.total_files, stats.total_dirs, stats.total_symlinks, stats.total_other
    );
    eprintln!(" {} of {} entries attached", attached, stats.total_entries());
    eprintln!(" Max depth {}", stats.max_depth);
    eprintln!("{}", "─".repeat(60));
}
