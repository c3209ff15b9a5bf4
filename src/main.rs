//! Doctree CLI - inspect the document tree of a word-processor document

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "doctree")]
#[command(version)]
#[command(about = "Document Tree - browse frame sets, frames and text structures of a document")]
#[command(long_about = r#"
Doctree builds a tree over a document's object graph:
  • Frame sets and their frames
  • Text documents, whose tables, lists and frames load on first access
  • Property and text pages for every node

Without --file (or a `document` entry in doctree.toml) a built-in
sample document is inspected.

Example usage:
  doctree tree --file report.json
  doctree pages --file report.json --path 0/0/0
  doctree serve --file report.json --port 7878
  doctree sample --output report.json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of terminal output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document tree
    Tree {
        /// Snapshot file (.json or .toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Node to start from, as rows from the root (e.g. 0/1)
        #[arg(short, long, default_value = "")]
        path: String,

        /// Levels to expand (defaults to the configured expand depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Expand everything, loading every text document
        #[arg(short, long)]
        all: bool,
    },

    /// Show the pages of one node as editor tabs
    Pages {
        /// Snapshot file (.json or .toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Node to select, as rows from the root (e.g. 0/0/0)
        #[arg(short, long)]
        path: String,
    },

    /// Show statistics about the document tree
    Stats {
        /// Snapshot file (.json or .toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Load every text document before counting
        #[arg(short, long)]
        load_all: bool,
    },

    /// Write a doctree.toml config file
    Init {
        /// Snapshot file to inspect by default
        #[arg(short, long)]
        document: Option<String>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Write the built-in sample document as a JSON snapshot
    Sample {
        /// File to write (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Serve the tree model over HTTP
    Serve {
        /// Snapshot file (.json or .toml)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check that primitive values survive the marshalling bridge
    BridgeCheck,
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a JSON success envelope for `command`
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = doctree::config::load_config(cli.config.as_deref())?.unwrap_or_default();

    let result = match cli.command {
        Commands::Tree { file, path, depth, all } => {
            let depth = if all {
                None
            } else {
                Some(depth.unwrap_or_else(|| config.expand_depth()))
            };
            commands::run_tree(output_mode, &config, file, &path, depth)
        }
        Commands::Pages { file, path } => commands::run_pages(output_mode, &config, file, &path),
        Commands::Stats { file, load_all } => {
            commands::run_stats(output_mode, &config, file, load_all)
        }
        Commands::Init { document, force } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(doctree::config::default_config_path);
            commands::run_init(output_mode, &path, document, force)
        }
        Commands::Sample { output, force } => commands::run_sample(output_mode, output, force),
        Commands::Serve { file, port } => {
            let port = port.unwrap_or_else(|| config.port());
            commands::run_serve(&config, file, port)
        }
        Commands::BridgeCheck => commands::run_bridge_check(output_mode),
    };

    if let Err(e) = result {
        if output_mode.is_human() {
            doctree::ui::error(&format!("{:#}", e));
        } else {
            let envelope = serde_json::json!({ "ok": false, "error": format!("{:#}", e) });
            println!("{}", envelope);
        }
        std::process::exit(1);
    }
    Ok(())
}
