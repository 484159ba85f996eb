//! Command-line front end for inspecting and editing `.bib` files in place.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bibscript::error::line_col;
use bibscript::{Bibliography, Config, OnError, fs};

/// Inspect and edit BibTeX files without disturbing their formatting
#[derive(Parser, Debug)]
#[command(name = "bibscript")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Abort on the first record which fails to parse
    #[arg(long, global = true)]
    strict: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write the result to this file
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Overwrite the input file, keeping a `.bak` copy of the original
    #[arg(long)]
    in_place: bool,

    /// The `.bib` file to read
    input: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// List the type and key of every entry
    List,
    /// Print a short reference for every entry
    Refs,
    /// Report duplicate keys, skipped records and other problems
    Check,
    /// Show the fields of one entry
    Show { key: String },
    /// Replace the value of a field
    ///
    /// The new value replaces the text between the delimiters, so for `title = {Old},` the value
    /// `New` gives `title = {New},`.
    Set {
        key: String,
        field: String,
        value: String,
    },
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = Config {
        on_error: if cli.strict {
            OnError::Abort
        } else {
            OnError::Skip
        },
        ..Config::default()
    };

    let input = fs::read(&cli.input)?;
    let mut bib = match Bibliography::parse_with(&input, &config) {
        Ok(bib) => bib,
        Err(err) => {
            let (line, col) = line_col(&input, err.position);
            return Err(format!("{}:{line}:{col}: {err}", cli.input.display()).into());
        }
    };

    let mut code = ExitCode::SUCCESS;

    match &cli.command {
        Command::List => {
            if cli.json {
                let entries: Vec<_> = bib
                    .entries()
                    .map(|entry| json!({ "type": entry.entry_type(), "key": entry.key() }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in bib.entries() {
                    println!("{:<20}: {}", entry.entry_type(), entry.key());
                }
            }
        }
        Command::Refs => {
            if cli.json {
                let refs: Vec<_> = bib
                    .entries()
                    .map(|entry| json!({ "key": entry.key(), "reference": entry.reference() }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&refs)?);
            } else {
                for entry in bib.entries() {
                    println!("{:<30} {}", entry.reference(), entry.key());
                }
            }
        }
        Command::Check => {
            let warnings = bib.warnings();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(warnings)?);
            } else {
                for warning in warnings {
                    match warning.offset() {
                        Some(offset) => {
                            let (line, col) = line_col(&input, offset);
                            println!("{}:{line}:{col}: {warning}", cli.input.display());
                        }
                        None => println!("{}: {warning}", cli.input.display()),
                    }
                }
            }
            if !warnings.is_empty() {
                code = ExitCode::FAILURE;
            }
        }
        Command::Show { key } => {
            let entry = bib
                .entry(key)
                .ok_or_else(|| format!("no entry with key '{key}'"))?;
            if cli.json {
                let value = json!({
                    "type": entry.entry_type(),
                    "key": entry.key(),
                    "fields": entry.field_values(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", entry.summary());
            }
        }
        Command::Set { key, field, value } => {
            let entry = bib
                .entry_mut(key)
                .ok_or_else(|| format!("no entry with key '{key}'"))?;
            if !entry.set(field, value) {
                return Err(format!("entry '{key}' has no field '{field}'").into());
            }
            tracing::debug!(key = key.as_str(), field = field.as_str(), "updated field");
            if cli.output.is_none() && !cli.in_place {
                print!("{entry}");
            }
        }
    }

    if let Some(output) = &cli.output {
        fs::write(output, &bib.serialize(), false)?;
    } else if cli.in_place {
        if let Some(backup) = bib.save(&cli.input, true)? {
            tracing::info!(backup = %backup.display(), "wrote backup");
        }
    }

    Ok(code)
}
