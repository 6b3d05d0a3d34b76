//! metafield CLI tool
//!
//! Command-line interface for exploring the data lineage recorded in a notebook collection.
//!
//! ## Commands
//!
//! - `search <query>`: list node ids containing a substring
//! - `deps <target>`: print (or render) the lineage subgraph around a node
//! - `verify <target>`: compare recorded artifact fingerprints with the files on disk
//! - `friends <file-part>`: files that most often change in the same git commits
//! - `config`: print the effective configuration
//!
//! The notebook root comes from `--root`, else from the `root` key of `--config`, else the
//! top level of the enclosing git work tree, else the current directory.

use clap::{Parser, Subcommand};
use metafield::{
    config::LineageConfig,
    history::{find_friends, repo_toplevel},
    lineage::{LineageEngine, RenderFormat},
    MetafieldError,
};
use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

mod report;

#[derive(Parser)]
#[command(name = "metafield")]
#[command(author, version, about = "Data lineage across a collection of notebooks", long_about = None)]
struct Cli {
    /// Directory holding the notebooks (overrides the config file's root)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List node ids containing QUERY (case-insensitive)
    Search {
        query: String,

        /// Stop at the first match
        #[arg(long)]
        first: bool,
    },

    /// Show the lineage subgraph around the first node whose id contains TARGET
    Deps {
        target: String,

        /// Maximum number of hops in each direction
        #[arg(short, long)]
        depth: Option<usize>,

        /// Render a PNG with graphviz and print its path
        #[arg(long, conflicts_with = "dot")]
        png: bool,

        /// Write a DOT file and print its path
        #[arg(long)]
        dot: bool,

        /// Blank out node labels in rendered output
        #[arg(long)]
        hide_labels: bool,
    },

    /// Check every artifact around TARGET against the file on disk
    Verify {
        target: String,

        /// Maximum number of hops in each direction
        #[arg(short, long)]
        depth: Option<usize>,

        /// Emit JSON instead of colored rows
        #[arg(long)]
        json: bool,
    },

    /// Rank files by how many commits they share with the file matching FILE_PART
    Friends {
        file_part: String,

        /// Git repository to read (default: the notebook root)
        #[arg(long)]
        repo: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Root for a run without `--root` or `--config`: the enclosing git work tree, so recorded
/// `../` paths resolve the same wherever the command is started. Falls back to `cwd`.
fn default_root(cwd: &Path) -> PathBuf {
    match repo_toplevel(cwd) {
        Ok(toplevel) => toplevel,
        Err(e) => {
            tracing::debug!("No git work tree around {:?}, using it as root: {}", cwd, e);
            cwd.to_path_buf()
        }
    }
}

fn load_config(
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    cwd: &Path,
) -> Result<LineageConfig, MetafieldError> {
    Ok(match (root, config) {
        (Some(root), Some(path)) => LineageConfig::from_file(path)?.with_root(root),
        (None, Some(path)) => LineageConfig::from_file(path)?,
        (Some(root), None) => LineageConfig::new(root),
        (None, None) => LineageConfig::new(default_root(cwd)),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.root, cli.config, Path::new("."))?;

    match cli.command {
        Commands::Search { query, first } => {
            let engine = LineageEngine::new(config)?;
            for id in engine.search(&query, first) {
                println!("{id}");
            }
        }

        Commands::Deps {
            target,
            depth,
            png,
            dot,
            hide_labels,
        } => {
            let engine = LineageEngine::new(config)?;
            let format = if png {
                Some(RenderFormat::Png)
            } else if dot {
                Some(RenderFormat::Dot)
            } else {
                None
            };
            match format {
                Some(format) => {
                    let subgraph = engine.subgraph(&target, depth)?;
                    let path = engine.render(&subgraph, !hide_labels, format)?;
                    println!("{}", path.display());
                }
                None => print!("{}", engine.data_deps(&target, depth)?),
            }
        }

        Commands::Verify {
            target,
            depth,
            json,
        } => {
            let engine = LineageEngine::new(config)?;
            let records = engine.verify(&target, depth)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let color = std::io::stdout().is_terminal();
                for record in &records {
                    println!("{}", report::verify_row(record, color));
                }
            }
        }

        Commands::Friends { file_part, repo } => {
            let repo = repo.unwrap_or_else(|| config.root.clone());
            let friends = find_friends(&file_part, &repo)?;
            if friends.is_empty() {
                eprintln!("No tracked file matches {file_part:?}");
            }
            for (path, shared) in friends {
                println!("{shared:>4} {path}");
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
