use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pathquill::config::Config;
use pathquill::document::parser::parse_literal;
use pathquill::document::tree::ValueTree;
use pathquill::document::value::Value;
use pathquill::file::loader::{load_file, load_from_stdin, DocumentFormat};
use pathquill::file::saver::{output_format_for, render, save_file, save_file_as};
use pathquill::{Change, QueryEngine};

/// PathQuill - read and update JSON and YAML documents by selector
#[derive(Parser)]
#[command(name = "pathquill")]
#[command(version)]
#[command(
    about = "Read and update JSON and YAML documents by selector",
    long_about = None
)]
struct Cli {
    /// Input file (JSON, JSON Lines or YAML, optionally gzipped), or - for stdin
    file: String,

    /// Output format: json, jsonl or yaml (default: from the file name, then config)
    #[arg(short, long)]
    format: Option<String>,

    /// Spaces per indentation level (0 for compact JSON)
    #[arg(short, long)]
    indent: Option<usize>,

    /// Write the updated document to this file instead of stdout
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Overwrite the input file with the updated document
    #[arg(long)]
    in_place: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every value the selector resolves to
    Get { selector: String },
    /// Replace (or merge into) every value the selector resolves to
    Set { selector: String, value: String },
    /// Push a value onto every array the selector resolves to
    Append { selector: String, value: String },
    /// Insert or overwrite a key in every object the selector resolves to
    Put {
        selector: String,
        key: String,
        value: String,
    },
    /// Print the elements of the root array chosen by a query
    Query { query: String },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load();
    if let Some(indent) = cli.indent {
        config.indent_size = indent;
    }

    let from_stdin = cli.file == "-";
    let root = if from_stdin {
        load_from_stdin()?
    } else {
        load_file(&cli.file)?
    };

    let format = output_format(&cli, &config)?;

    let update = match &cli.command {
        Command::Get { selector } => {
            let tree = ValueTree::new(root);
            let found = tree.get_by_selector(selector);
            if found.is_empty() {
                info!("selector '{}' matched nothing", selector);
            }
            for value in found {
                print_value(value, format, &config)?;
            }
            return Ok(());
        }
        Command::Query { query } => {
            let items = match &root {
                Value::Array(items) => items,
                other => bail!("query needs an array document, found {}", other.kind()),
            };
            let found = QueryEngine::new()
                .try_execute(items, query)
                .with_context(|| format!("Invalid query '{}'", query))?;
            let rows: Vec<Value> = found
                .indices
                .iter()
                .zip(found.values)
                .map(|(&index, value)| {
                    vec![
                        ("index", Value::Int(index as i64)),
                        ("value", value.clone()),
                    ]
                    .into_iter()
                    .collect::<Value>()
                })
                .collect();
            return print_value(&Value::Array(rows), format, &config);
        }
        Command::Set { selector, value } => (selector, Change::Replace(parse_literal(value))),
        Command::Append { selector, value } => (selector, Change::Append(parse_literal(value))),
        Command::Put {
            selector,
            key,
            value,
        } => (
            selector,
            Change::SetKeyValue {
                key: key.clone(),
                value: parse_literal(value),
            },
        ),
    };

    let (selector, change) = update;
    let mut tree = ValueTree::new(root);
    let written = tree.apply_by_selector(selector, &change);
    if written == 0 {
        warn!("selector '{}' changed nothing", selector);
    } else {
        info!("updated {} position(s)", written);
    }

    if cli.in_place {
        if from_stdin {
            bail!("--in-place needs a file, not stdin");
        }
        match &cli.format {
            Some(_) => save_file_as(&cli.file, tree.root(), format, &config)?,
            None => save_file(&cli.file, tree.root(), &config)?,
        }
    } else if let Some(output) = &cli.output {
        match &cli.format {
            Some(_) => save_file_as(output, tree.root(), format, &config)?,
            None => save_file(output, tree.root(), &config)?,
        }
    } else {
        print_value(tree.root(), format, &config)?;
    }

    Ok(())
}

/// Format for stdout: `--format`, then the input file name, then config.
fn output_format(cli: &Cli, config: &Config) -> Result<DocumentFormat> {
    if let Some(name) = &cli.format {
        return DocumentFormat::from_name(name)
            .with_context(|| format!("Unknown format '{}'", name));
    }
    if cli.file != "-" {
        return Ok(output_format_for(Path::new(&cli.file), config));
    }
    Ok(DocumentFormat::from_name(&config.output_format).unwrap_or(DocumentFormat::Json))
}

fn print_value(value: &Value, format: DocumentFormat, config: &Config) -> Result<()> {
    let text = render(value, format, config.serialize_options())?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}
