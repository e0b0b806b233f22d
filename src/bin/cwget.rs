//! Read-only command line front end over a cwget catalog.
//!
//! Loads the catalog file, validates it, and prints library details or the
//! synthesized commands and scripts. It never downloads or compiles anything;
//! output is meant to be copied or piped into a shell.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cwget_core::catalog::Catalog;
use cwget_core::render::RenderData;
use cwget_core::source::decode;
use cwget_core::{Dialect, DownloadTool, LibraryRecord, Settings};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cwget", version, about = "Fetch-and-compile commands for small C libraries")]
struct Cli {
    /// Catalog file (XML, HTML page with embedded XML, or JSON)
    #[arg(long, env = "CWGET_CATALOG", global = true, default_value = "index.html")]
    catalog: PathBuf,

    /// Override base install directory
    #[arg(long, env = "CWGET_BASE_DIR", global = true)]
    base_dir: Option<String>,

    /// Shell dialect for paths, commands and scripts
    #[arg(long, value_enum, global = true, default_value_t = Shell::Posix)]
    shell: Shell,

    /// Emit JSON for list/search/info/path/commands
    #[arg(long, global = true)]
    json: bool,

    /// More output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Less output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all libraries
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search title, description, tags and file names
    Search {
        query: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show details for one library
    Info { id: String },
    /// Print the install directory for one library
    Path { id: String },
    /// Print the sample program for one library
    Sample { id: String },
    /// Print the download and compile one-liners for one library
    Commands { id: String },
    /// Print the full install script for one library
    Script { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shell {
    Posix,
    Powershell,
}

impl From<Shell> for Dialect {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Posix => Dialect::Posix,
            Shell::Powershell => Dialect::PowerShell,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays copy-pasteable.
fn initialize_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "cwget_core=debug,cwget=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.catalog)
        .with_context(|| format!("Failed to read catalog: {}", cli.catalog.display()))?;
    let raw = decode(&text).with_context(|| format!("Failed to decode {}", cli.catalog.display()))?;
    let catalog = Catalog::load(&raw).context("Invalid catalog")?;

    let settings = Settings::resolve(cli.base_dir.as_deref(), cli.shell.into(), catalog.settings());
    tracing::debug!(
        base_dir = %settings.base_dir,
        dialect = %settings.dialect,
        overridden = settings.is_base_dir_override(catalog.settings()),
        "settings resolved"
    );

    match &cli.command {
        Command::List { limit } => {
            let records: Vec<&LibraryRecord> = catalog.records().iter().collect();
            print_listing(&records, *limit, cli.json)
        }
        Command::Search { query, tag, limit } => {
            let hits = catalog.search(query, tag.as_deref());
            if hits.is_empty() && !cli.json && !cli.quiet {
                eprintln!("No libraries match \"{query}\"");
            }
            print_listing(&hits, *limit, cli.json)
        }
        Command::Info { id } => {
            let record = lookup(&catalog, id)?;
            print_info(&catalog, record, &settings, cli.json)
        }
        Command::Path { id } => {
            let record = lookup(&catalog, id)?;
            let data = render_for(&catalog, record, &settings);
            let dir = data.target.dirs.for_dialect(settings.dialect);
            if cli.json {
                println!("{}", json!({ "id": record.id, "path": dir }));
            } else {
                println!("{dir}");
            }
            Ok(())
        }
        Command::Sample { id } => {
            let record = lookup(&catalog, id)?;
            println!("{}", record.sample_code.trim());
            Ok(())
        }
        Command::Commands { id } => {
            let record = lookup(&catalog, id)?;
            let data = render_for(&catalog, record, &settings);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&data.commands)?);
                return Ok(());
            }
            for tool in DownloadTool::ALL {
                if tool.dialect() != settings.dialect {
                    continue;
                }
                if !cli.quiet {
                    println!("# {}", tool.label());
                }
                println!("{}", data.commands.download(tool));
            }
            if !cli.quiet {
                println!("# compile");
            }
            println!("{}", data.commands.compile(settings.dialect));
            Ok(())
        }
        Command::Script { id } => {
            let record = lookup(&catalog, id)?;
            let data = render_for(&catalog, record, &settings);
            print!("{}", data.scripts.for_dialect(settings.dialect));
            Ok(())
        }
    }
}

fn lookup<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a LibraryRecord> {
    catalog
        .get(id)
        .with_context(|| {
            format!("Unknown library \"{id}\". Run 'cwget list' to see available ids.")
        })
}

fn render_for(catalog: &Catalog, record: &LibraryRecord, settings: &Settings) -> RenderData {
    RenderData::build(record, &settings.base_dir, &catalog.settings().base_dir_default)
}

fn print_listing(records: &[&LibraryRecord], limit: Option<usize>, as_json: bool) -> Result<()> {
    let shown = records.iter().take(limit.unwrap_or(usize::MAX));
    if as_json {
        let items: Vec<_> = shown
            .map(|r| {
                json!({
                    "id": r.id,
                    "title": r.title,
                    "version": r.version,
                    "categories": r.categories,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let width = records.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for record in shown {
        println!(
            "{:<width$}  {:<10}  {}",
            record.id,
            record.version,
            record.title,
            width = width
        );
    }
    Ok(())
}

fn print_info(
    catalog: &Catalog,
    record: &LibraryRecord,
    settings: &Settings,
    as_json: bool,
) -> Result<()> {
    let data = render_for(catalog, record, settings);
    let related: Vec<&str> = catalog
        .works_well_with(record)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();

    if as_json {
        let value = json!({
            "library": record,
            "installDir": data.target.dirs.for_dialect(settings.dialect),
            "worksWellWith": related,
            "documentation": data.documentation,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} {}", record.title, record.version);
    println!("{}", record.description);
    println!();
    println!("id:          {}", record.id);
    println!("install dir: {}", data.target.dirs.for_dialect(settings.dialect));
    println!("categories:  {}", record.categories.join(", "));
    println!("license:     {} ({})", record.license_summary, record.license_url);
    println!("files:");
    for (file, path) in record.files.iter().zip(&data.target.files) {
        println!("  {}  <-  {}", path.for_dialect(settings.dialect), file.url);
    }
    println!("documentation:");
    for doc in &data.documentation {
        println!("  {}: {}", doc.label, doc.display);
    }
    if !related.is_empty() {
        println!("works well with: {}", related.join(", "));
    }
    Ok(())
}
