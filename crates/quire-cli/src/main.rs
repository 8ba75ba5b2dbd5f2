//! Quire CLI
//!
//! Thin front-end over quire-core: resolves queries against a JSON workspace
//! document and prints result records, or executes a result action.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quire_core::QuireCore;
use quire_core::config::{Directories, Settings};
use quire_core::query::QueryInput;
use quire_types::{Item, ItemId, ItemVariant, ResultAction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod store;

use store::{FileStore, WorkspaceDoc};

/// Quire - fuzzy search over hierarchical note workspaces
#[derive(Parser)]
#[command(name = "quire")]
#[command(version, about, long_about = None)]
#[command(after_help = "\
Examples:
  quire sample                          Write a sample workspace document
  quire query 'qn meeting'              Search page titles
  quire query 'qn nb:\\'                 Browse the notebook forest
  quire query 'qn nb:\\Work\\*plan'       Title search inside \"Work\"
  quire query 'qn rcntpgs:5'            Five most recently modified pages
  quire invoke '{\"type\":\"sync_all\"}'    Execute a result action
")]
struct Cli {
    /// Workspace document (defaults to the XDG data path)
    #[arg(long, value_name = "PATH", global = true)]
    workspace: Option<PathBuf>,

    /// Action keyword the host shell uses to invoke the engine
    #[arg(long, default_value = "qn", global = true)]
    keyword: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a query and print result records as JSON
    Query {
        /// Raw query text, action keyword included
        text: String,

        /// Treat the engine as globally invoked (keyword optional)
        #[arg(long)]
        global: bool,
    },

    /// Execute a result action given as JSON
    Invoke {
        /// A serialized `ResultAction`, e.g. '{"type":"sync_all"}'
        action: String,
    },

    /// Write a small sample workspace document
    Sample,
}

fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quire=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let dirs = Directories::new();
    let workspace = cli
        .workspace
        .clone()
        .unwrap_or_else(|| dirs.workspace_file.clone());

    match cli.command {
        Commands::Sample => {
            FileStore::save_doc(&workspace, &sample_workspace())
                .with_context(|| format!("failed to write {}", workspace.display()))?;
            println!("{}", workspace.display());
            Ok(())
        }
        Commands::Query { text, global } => {
            let core = build_core(&dirs, &workspace, &cli.keyword)?;
            let input = QueryInput::from_raw(&text, &cli.keyword, global);
            let results = core.query(&input).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Commands::Invoke { action } => {
            let core = build_core(&dirs, &workspace, &cli.keyword)?;
            let action: ResultAction =
                serde_json::from_str(&action).context("invalid action JSON")?;
            core.invoke(&action)
                .await
                .context("action failed against the store")?;
            Ok(())
        }
    }
}

fn build_core(dirs: &Directories, workspace: &Path, keyword: &str) -> Result<QuireCore> {
    let settings = Settings::load(&dirs.config_file).context("failed to load settings")?;
    let store = FileStore::load(workspace)
        .with_context(|| format!("failed to load workspace {}", workspace.display()))?;
    Ok(QuireCore::new(Arc::new(store), settings, keyword))
}

fn sample_workspace() -> WorkspaceDoc {
    fn item(id: &str, name: &str, variant: ItemVariant, children: Vec<Item>) -> Item {
        Item {
            id: ItemId::from(id),
            name: name.to_string(),
            relative_path: String::new(),
            last_modified: 1_722_000_000_000,
            is_unread: false,
            in_recycle_bin: false,
            variant,
            children,
        }
    }

    WorkspaceDoc {
        notebooks: vec![
            item(
                "item-1",
                "Work",
                ItemVariant::Notebook {
                    color: Some("#2a5caa".to_string()),
                },
                vec![item(
                    "item-2",
                    "Projects",
                    ItemVariant::SectionGroup {
                        is_recycle_bin: false,
                    },
                    vec![item(
                        "item-3",
                        "Planning",
                        ItemVariant::Section {
                            encrypted: false,
                            locked: false,
                            color: None,
                        },
                        vec![
                            item(
                                "item-4",
                                "Meeting Notes",
                                ItemVariant::Page {
                                    created: 1_721_000_000_000,
                                },
                                vec![],
                            ),
                            item(
                                "item-5",
                                "Roadmap",
                                ItemVariant::Page {
                                    created: 1_720_000_000_000,
                                },
                                vec![],
                            ),
                        ],
                    )],
                )],
            ),
            item(
                "item-6",
                "Personal",
                ItemVariant::Notebook { color: None },
                vec![item(
                    "item-7",
                    "Journal",
                    ItemVariant::Section {
                        encrypted: false,
                        locked: false,
                        color: Some("#7a3b8f".to_string()),
                    },
                    vec![item(
                        "item-8",
                        "Day One",
                        ItemVariant::Page {
                            created: 1_719_000_000_000,
                        },
                        vec![],
                    )],
                )],
            ),
        ],
    }
}
