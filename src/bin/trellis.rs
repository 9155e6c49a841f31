//! Trellis CLI — resolve, save and inspect diagrams addressed by URL fragments.
//!
//! Usage:
//!   trellis classify <fragment-or-url>
//!   trellis save <diagram.json> [--db path]
//!   trellis load <fragment-or-url> [--db path] [--resources file.json]
//!   trellis list [--db path]

use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trellis::config::default_config_path;
use trellis::{
    Config, DiagramLoader, DiagramWorkspace, FragmentReference, KeyValueStore, LoadOutcome,
    LocalPersistenceStore, OpenStore, RemoteSnapshotClient, ResolutionProvider,
    SerializedDiagram, SqliteStore, StaticProvider,
};

#[derive(Parser)]
#[command(
    name = "trellis",
    version,
    about = "Diagram-state resolution and hydration"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to the SQLite store (overrides the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// More log output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what a fragment or URL refers to
    Classify {
        location: String,
    },
    /// Store a diagram locally and print its key
    Save {
        /// JSON file holding a diagram (envelope or legacy layout)
        file: PathBuf,
    },
    /// Resolve a fragment or URL into a diagram and print the resulting graph
    Load {
        location: String,
        /// JSON file with entities and relations used for `#r=` fragments
        #[arg(long)]
        resources: Option<PathBuf>,
    },
    /// List locally stored diagram keys
    List,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<Config, String> {
    let config = match path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(default_config_path()),
    };
    config.map_err(|e| e.to_string())
}

fn open_store(config: &Config, db: Option<PathBuf>) -> Result<Arc<SqliteStore>, String> {
    let path = db.unwrap_or_else(|| config.store_path());
    let store = SqliteStore::open(&path)
        .map_err(|e| format!("Failed to open store {}: {}", path.display(), e))?;
    Ok(Arc::new(store))
}

fn cmd_classify(location: &str) -> i32 {
    let reference = FragmentReference::from_location(location);
    match serde_json::to_string_pretty(&reference) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_save(store: Arc<SqliteStore>, file: &Path) -> i32 {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", file.display(), e);
            return 1;
        }
    };
    let diagram = match SerializedDiagram::from_json_str(&text) {
        Ok(diagram) => diagram,
        Err(e) => {
            eprintln!("Error: '{}' is not a diagram: {}", file.display(), e);
            return 1;
        }
    };
    match LocalPersistenceStore::new(store).save(&diagram) {
        Ok(key) => {
            println!("{}", key);
            println!("{}", FragmentReference::LocalKey(key).to_fragment());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_list(store: Arc<SqliteStore>) -> i32 {
    match store.keys() {
        Ok(keys) if keys.is_empty() => {
            println!("No diagrams stored.");
            0
        }
        Ok(keys) => {
            for key in keys {
                println!("{}", key);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn outcome_json(outcome: &LoadOutcome) -> serde_json::Value {
    match outcome {
        LoadOutcome::Local(key) => json!({ "origin": "local", "key": key }),
        LoadOutcome::Cloud(key) => json!({ "origin": "cloud", "key": key }),
        LoadOutcome::Hydrated(report) => {
            json!({ "origin": "resources", "nodes": report.nodes.len(), "edges": report.edges_added })
        }
        LoadOutcome::Empty => json!({ "origin": "none" }),
    }
}

async fn cmd_load(
    config: &Config,
    store: Arc<SqliteStore>,
    location: &str,
    resources: Option<PathBuf>,
) -> i32 {
    let provider: Arc<dyn ResolutionProvider> = match resources {
        Some(path) => match StaticProvider::from_file(&path) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        None => Arc::new(StaticProvider::empty()),
    };
    let remote = match RemoteSnapshotClient::http(config.remote_base_url.clone()) {
        Ok(remote) => remote,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let loader = DiagramLoader::new(LocalPersistenceStore::new(store), remote);
    let mut workspace = DiagramWorkspace::new();
    let outcome = match loader.load_location(location, &mut workspace, provider).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let model = workspace.model();
    let summary = json!({
        "outcome": outcome_json(&outcome),
        "nodes": model.nodes().collect::<Vec<_>>(),
        "edges": model.edges(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Classify { location } = &cli.command {
        std::process::exit(cmd_classify(location));
    }

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let store = match open_store(&config, cli.db) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Classify { .. } => 0,
        Commands::Save { file } => cmd_save(store, &file),
        Commands::Load {
            location,
            resources,
        } => cmd_load(&config, store, &location, resources).await,
        Commands::List => cmd_list(store),
    };
    std::process::exit(code);
}
