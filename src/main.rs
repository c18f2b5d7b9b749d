mod errors;
mod operations;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sheetdex_core::*;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::errors::map_error;
use crate::operations::{parse_assignments, sync_to_dir, SyncTarget};
use crate::state::AppState;

/// Sheetdex - browse spreadsheet-derived game data by category, search and group
///
/// Examples:
///   # List the categories of a local export
///   sheetdex categories db.json
///
///   # Browse one category, searching across all values
///   sheetdex browse db.json --category ST --query 炎
///
///   # Narrow to a single group tab
///   sheetdex browse https://example.com/db.json --category ST --group A
///
///   # Pull tabs from a published sheet into ./data
///   sheetdex sync --sheet-id 1AbC --tab ST=0 --tab weapons=123 --out-dir data
#[derive(Parser, Debug)]
#[command(name = "sheetdex")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Browsing:\n  \
    - SOURCE is a JSON file path or an http(s) URL\n  \
    - Search is a case-insensitive substring match over every value, continuation rows included\n  \
    - Switching category always resets the group tab\n\n\
Logging:\n  \
    - RUST_LOG overrides the level set by -v")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories with entity counts and behaviors
    Categories {
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Category configuration table (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Render one category view
    Browse {
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Category to show (defaults to the first in the dataset)
        #[arg(short = 'C', long, value_name = "NAME")]
        category: Option<String>,

        /// Free-text search
        #[arg(short, long, value_name = "TEXT", default_value = "")]
        query: String,

        /// Group tab to show
        #[arg(short, long, value_name = "LABEL")]
        group: Option<String>,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,

        /// Category configuration table (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Export sheet tabs (or local CSV files) into dataset JSON
    Sync {
        #[arg(long, env = "SHEET_ID", value_name = "ID")]
        sheet_id: Option<String>,

        /// Sheet tab to export (format: name=gid, can be specified multiple times)
        #[arg(short, long = "tab", value_name = "NAME=GID")]
        tabs: Vec<String>,

        /// Local CSV export (format: name=path, can be specified multiple times)
        #[arg(long = "csv", value_name = "NAME=PATH")]
        csvs: Vec<String>,

        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Validate a category configuration table
    CheckConfig {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        let (title, message, details) = map_error(&err);
        eprintln!("{} {}", title.red().bold(), message);
        if !details.is_empty() {
            eprintln!("\n{}", details);
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Categories { source, config } => {
            let state = open(&source, config.as_deref())?;
            ui::print_categories(&state);
        }
        Command::Browse {
            source,
            category,
            query,
            group,
            json,
            config,
        } => {
            let mut state = open(&source, config.as_deref())?;
            if let Some(category) = category {
                state.select_category(&category)?;
            }
            state.set_query(query);
            if let Some(group) = group {
                state.select_group(GroupSelection::Named(group));
            }
            print_view(&state, json)?;
        }
        Command::Sync {
            sheet_id,
            tabs,
            csvs,
            out_dir,
        } => {
            let target = SyncTarget {
                sheet_id,
                tabs: parse_assignments(&tabs)?,
                csvs: parse_assignments(&csvs)?,
            };
            let written = sync_to_dir(&target, &out_dir)?;
            for path in written {
                println!("  {} {}", "→".cyan(), path.display());
            }
        }
        Command::CheckConfig { file } => {
            CategoryConfig::load(&file)
                .with_context(|| format!("checking {}", file.display()))?;
            println!("{} {}", "✓".green(), file.display());
        }
    }
    Ok(())
}

fn open(source: &str, config: Option<&std::path::Path>) -> Result<AppState> {
    let table = match config {
        Some(path) => CategoryTable::compile(CategoryConfig::load(path)?)?,
        None => CategoryTable::builtin(),
    };

    let mut state = AppState::new(table);
    state.load(DataSource::parse(source)?)?;
    info!(title = %state.title(), "dataset ready");
    Ok(state)
}

fn print_view(state: &AppState, json: bool) -> Result<()> {
    let Some(entities) = state.current_entities() else {
        return Ok(());
    };
    let view = entities.view(&state.table, &state.query, &state.group);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", state.title().bold());
        ui::print_view(&view);
    }
    Ok(())
}
