//! yamlnode CLI - Main entry point

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Output, Source, WriteOptions};

#[derive(Parser)]
#[command(name = "yamlnode")]
#[command(version)]
#[command(about = "Query and edit YAML configuration by key", long_about = None)]
struct Cli {
    /// Print values as JSON instead of YAML
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a key on a node without descending
    Get {
        #[command(flatten)]
        source: Source,

        /// Key name, or element index for sequence nodes
        key: String,
    },

    /// Find the first occurrence of a key anywhere below a node
    Deepget {
        #[command(flatten)]
        source: Source,

        /// Key to search for
        key: String,

        /// Print the mapping that holds the key instead of its value
        #[arg(long)]
        parent: bool,

        /// Value (YAML) to print when the key is not found
        #[arg(long, value_name = "VALUE")]
        default: Option<String>,
    },

    /// Exit successfully if a key exists
    Has {
        #[command(flatten)]
        source: Source,

        /// Key to check
        key: String,

        /// Search the whole subtree instead of the node itself
        #[arg(long)]
        deep: bool,
    },

    /// Print the first of several keys present below a node
    WhichHas {
        #[command(flatten)]
        source: Source,

        /// Candidate keys, in order of preference
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Store a value under a key of a node's mapping
    Set {
        #[command(flatten)]
        source: Source,

        /// Key to write
        key: String,

        /// Value to store, parsed as YAML
        value: String,

        #[command(flatten)]
        write: WriteOptions,
    },

    /// Replace the first occurrence of each key below a node
    Deepset {
        #[command(flatten)]
        source: Source,

        /// Assignments, values parsed as YAML
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,

        /// Fail without writing if any key is missing
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        write: WriteOptions,
    },

    /// Print a node's content
    Dump {
        #[command(flatten)]
        source: Source,
    },

    /// Print the parsed node structure
    Tree {
        #[command(flatten)]
        source: Source,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamlnode=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Get { source, key } => commands::query::get(&source, &key, &out),
        Commands::Deepget {
            source,
            key,
            parent,
            default,
        } => commands::query::deepget(&source, &key, parent, default.as_deref(), &out),
        Commands::Has { source, key, deep } => commands::query::has(&source, &key, deep),
        Commands::WhichHas { source, keys } => commands::query::which_has(&source, &keys),
        Commands::Set {
            source,
            key,
            value,
            write,
        } => commands::edit::set(&source, &key, &value, &write, &out),
        Commands::Deepset {
            source,
            pairs,
            strict,
            write,
        } => commands::edit::deepset(&source, &pairs, strict, &write, &out),
        Commands::Dump { source } => commands::show::dump(&source, &out),
        Commands::Tree { source } => commands::show::tree(&source),
    }
}
