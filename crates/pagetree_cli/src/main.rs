//! # PageTree CLI (`pagetree`)
//!
//! Thin host around `pagetree_core`: loads a JSON document collection,
//! runs one tree operation and prints JSON (or an outline) to stdout.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pagetree tree <file>` | Print the ordered forest |
//! | `pagetree flatten <file>` | Print documents in reading order |
//! | `pagetree move <file> <id> [--parent P] [--index N]` | Plan a move |
//! | `pagetree delete <file> <id> [--promote]` | Plan a delete |
//! | `pagetree search <file> <query>` | Match titles, list forced-open ancestors |
//! | `pagetree export <file> <id>...` | Selected subtrees in reading order |
//! | `pagetree check <file>` | Report consistency issues |
//! | `pagetree normalize <file>` | Renumber every sibling group |
//!
//! Mutating commands print the patch set; with `--write` they apply it
//! and rewrite the file.

mod config;
mod io;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use pagetree_core::{
    apply_patches, build_tree, check_documents, filter_forest, flatten, init_logging,
    normalize_orders, DeleteMode, DocumentId, MemoryDocumentRepository, MoveIntent, TreeService,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "pagetree",
    about = "Inspect and rearrange hierarchical page collections",
    version
)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (`trace|debug|info|warn|error`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute log directory override; enables file logging.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TreeFormat {
    Json,
    Outline,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ordered forest.
    Tree {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "json")]
        format: TreeFormat,
        /// Only show matches of this title query and their ancestors.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print documents in reading order.
    Flatten { file: PathBuf },

    /// Move a document. Without `--index` it is appended as last child.
    Move {
        file: PathBuf,
        id: String,
        /// Destination parent id; omit for root level.
        #[arg(long)]
        parent: Option<String>,
        /// Position among the destination's other children.
        #[arg(long)]
        index: Option<usize>,
        /// Apply the patches and rewrite the file.
        #[arg(long)]
        write: bool,
    },

    /// Delete a document and its subtree, or lift its children with `--promote`.
    Delete {
        file: PathBuf,
        id: String,
        #[arg(long)]
        promote: bool,
        #[arg(long)]
        write: bool,
    },

    /// Case-insensitive title search.
    Search { file: PathBuf, query: String },

    /// Selected subtrees in reading order.
    Export {
        file: PathBuf,
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Report dangling parents, cycles, duplicate ids and order gaps.
    Check { file: PathBuf },

    /// Renumber every sibling group to 0..n.
    Normalize {
        file: PathBuf,
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?
        .with_overrides(cli.log_level, cli.log_dir);

    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir).map_err(anyhow::Error::msg)?;
    }

    run(cli.command, &config)
}

fn run(command: Commands, config: &config::Config) -> Result<()> {
    match command {
        Commands::Tree {
            file,
            format,
            filter,
        } => {
            let docs = io::read_documents(&file)?;
            let mut forest = build_tree(&docs, None);
            if let Some(query) = filter {
                if let Some(outcome) = pagetree_core::search_documents(&docs, &query)? {
                    forest = filter_forest(&forest, &outcome);
                }
            }
            match format {
                TreeFormat::Json => io::print_json(&forest),
                TreeFormat::Outline => {
                    print!(
                        "{}",
                        io::render_outline(&forest, &config.display.untitled_label)
                    );
                    Ok(())
                }
            }
        }
        Commands::Flatten { file } => {
            let docs = io::read_documents(&file)?;
            io::print_json(&flatten(&build_tree(&docs, None)))
        }
        Commands::Move {
            file,
            id,
            parent,
            index,
            write,
        } => {
            let intent = MoveIntent {
                moving_id: DocumentId::new(id),
                destination_parent_id: parent.map(DocumentId::new),
                destination_index: index,
            };
            let service = load_service(&file)?;
            let plan = service.move_document(&intent)?;
            finish(service, &file, write)?;
            io::print_json(&plan)
        }
        Commands::Delete {
            file,
            id,
            promote,
            write,
        } => {
            let mode = if promote {
                DeleteMode::PromoteChildren
            } else {
                DeleteMode::Cascade
            };
            let service = load_service(&file)?;
            let plan = service.delete_document(&DocumentId::new(id), mode)?;
            finish(service, &file, write)?;
            io::print_json(&plan)
        }
        Commands::Search { file, query } => {
            let docs = io::read_documents(&file)?;
            match pagetree_core::search_documents(&docs, &query)? {
                Some(outcome) => io::print_json(&outcome),
                None => io::print_json(&serde_json::Value::Null),
            }
        }
        Commands::Export { file, ids } => {
            let service = load_service(&file)?;
            let selected: Vec<DocumentId> = ids.into_iter().map(DocumentId::new).collect();
            io::print_json(&service.export(&selected)?)
        }
        Commands::Check { file } => {
            let docs = io::read_documents(&file)?;
            io::print_json(&check_documents(&docs))
        }
        Commands::Normalize { file, write } => {
            let docs = io::read_documents(&file)?;
            let patches = normalize_orders(&docs);
            if write {
                io::write_documents(&file, &apply_patches(&docs, &patches))?;
            }
            io::print_json(&patches)
        }
    }
}

fn load_service(file: &Path) -> Result<TreeService<MemoryDocumentRepository>> {
    let docs = io::read_documents(file)?;
    let repo = MemoryDocumentRepository::from_documents(docs)?;
    Ok(TreeService::new(repo))
}

fn finish(service: TreeService<MemoryDocumentRepository>, file: &Path, write: bool) -> Result<()> {
    if !write {
        return Ok(());
    }
    let docs = service.into_repo().into_documents();
    io::write_documents(file, &docs)?;
    info!(
        "event=collection_write module=cli status=ok documents={}",
        docs.len()
    );
    Ok(())
}
