//! floatmenu CLI
//!
//! Compiles stylesheets and manages a revision store kept as JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use floatmenu_styler::{
    Breakpoint, CascadeResolver, ExportBundle, HistoryFilter, JsonFileStore, MenuItem, RevisionStore, SettingsTree,
    StoreConfig, color_to_filter, compile, default_items, import, render_menu,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "floatmenu")]
#[command(about = "Floating side menu stylesheet compiler and revision store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a settings document to CSS
    Compile {
        settings: PathBuf,
        /// JSON array of menu items (defaults to Home/About/Contact)
        #[arg(long)]
        items: Option<PathBuf>,
        /// Print the HTML fragment after the stylesheet
        #[arg(long)]
        markup: bool,
    },
    /// Print the CSS filter chain for a color
    Filter { color: String },
    /// Print the effective value of a setting path
    Resolve {
        settings: PathBuf,
        path: String,
        #[arg(long, value_enum, default_value_t = Breakpoint::Desktop)]
        breakpoint: Breakpoint,
    },
    /// List history entries, newest first
    History {
        store: PathBuf,
        #[arg(long, value_enum, default_value = "all")]
        filter: HistoryFilter,
    },
    /// Publish an export bundle
    Publish {
        store: PathBuf,
        bundle: PathBuf,
        #[arg(long)]
        label: Option<String>,
    },
    /// Save an export bundle as draft
    Draft { store: PathBuf, bundle: PathBuf },
    /// Replay a history entry
    Rollback {
        store: PathBuf,
        id: String,
        #[arg(long)]
        as_draft: bool,
    },
    /// Print the editable configuration as an export bundle
    Export { store: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Compile {
            settings,
            items,
            markup,
        } => {
            let tree = read_settings(&settings)?;
            let items = match items {
                Some(path) => serde_json::from_str::<Vec<MenuItem>>(&read(&path)?)
                    .with_context(|| format!("parsing items from {}", path.display()))?,
                None => default_items(""),
            };
            print!("{}", compile(&tree, &items)?);
            if markup {
                println!();
                print!("{}", render_menu(&tree, &items)?);
            }
        }
        Commands::Filter { color } => println!("{}", color_to_filter(&color)),
        Commands::Resolve {
            settings,
            path,
            breakpoint,
        } => {
            let tree = read_settings(&settings)?;
            let resolver = CascadeResolver::new();
            let value = resolver.get(&tree, &path, breakpoint)?;
            match resolver.inheritance_source(&tree, &path, breakpoint)? {
                Some(source) => println!("{value} (inherited from {source})"),
                None => println!("{value}"),
            }
        }
        Commands::History { store, filter } => {
            let store = open_store(&store)?;
            for entry in store.history_filtered(filter) {
                let live = if store.is_current_live(&entry.id) { " *live*" } else { "" };
                println!(
                    "{}  {:7}  {}  {} items  {}{live}",
                    entry.id,
                    entry.kind.as_str(),
                    entry.timestamp,
                    entry.items_count,
                    entry.label,
                );
            }
        }
        Commands::Publish { store, bundle, label } => {
            let mut store = open_store(&store)?;
            let (tree, items) = read_bundle(&store, &bundle)?;
            let entry = store.publish(&tree, &items, label.as_deref())?;
            println!("{}", entry.id);
        }
        Commands::Draft { store, bundle } => {
            let mut store = open_store(&store)?;
            let (tree, items) = read_bundle(&store, &bundle)?;
            let entry = store.save_draft(&tree, &items)?;
            println!("{}", entry.id);
        }
        Commands::Rollback { store, id, as_draft } => {
            let mut store = open_store(&store)?;
            let entry = store.rollback(&id, as_draft)?;
            println!("{}", entry.id);
        }
        Commands::Export { store } => {
            let store = open_store(&store)?;
            let editable = store.editable();
            let bundle = ExportBundle::new(editable.settings.clone(), editable.items.clone());
            println!("{}", bundle.to_json_pretty()?);
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_settings(path: &Path) -> Result<SettingsTree> {
    SettingsTree::from_json(&read(path)?).with_context(|| format!("parsing settings from {}", path.display()))
}

fn open_store(dir: &Path) -> Result<RevisionStore<JsonFileStore>> {
    let config_path = dir.join("config.json");
    let config = if config_path.exists() {
        serde_json::from_str(&read(&config_path)?).context("parsing store config")?
    } else {
        StoreConfig::default()
    };
    let store = JsonFileStore::open(dir)?;
    Ok(RevisionStore::open(store, config)?)
}

/// Applies a bundle file over the store's editable state.
fn read_bundle(store: &RevisionStore<JsonFileStore>, path: &Path) -> Result<(SettingsTree, Vec<MenuItem>)> {
    let editable = store.editable();
    let outcome = import(&read(path)?, &editable.settings, &editable.items, &store.config().site_url)?;
    for key in &outcome.report.missing {
        eprintln!("note: bundle has no {key}, keeping current");
    }
    if !outcome.report.scrubbed_items.is_empty() {
        eprintln!(
            "warning: cleared icon_url of items {:?} (hosted on another origin)",
            outcome.report.scrubbed_items
        );
    }
    Ok((outcome.settings, outcome.items))
}
