//! Lectern CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(version)]
#[command(about = "Render DocBook manuals into websites", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a manual to HTML pages and a function index
    Render {
        /// Manual to render (XML)
        input: PathBuf,

        /// Site configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write HTML pages under DIR
        #[arg(long, value_name = "DIR")]
        build_dir: Option<PathBuf>,

        /// Write data indexes under DIR
        #[arg(long, value_name = "DIR")]
        index_dir: Option<PathBuf>,

        /// Language of the manual
        #[arg(short, long)]
        language: Option<String>,

        /// Entity replacement (NAME=VALUE)
        #[arg(short = 'E', long = "entity", value_name = "NAME=VALUE")]
        entities: Vec<String>,

        /// Suppress the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// List functions in a generated index, or show one function
    Functions {
        /// Path to functions.json
        index: PathBuf,

        /// Function to show
        name: Option<String>,

        /// Print JSON instead of signatures
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "lectern=debug"
    } else {
        "lectern=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            input,
            config,
            build_dir,
            index_dir,
            language,
            entities,
            quiet,
        } => commands::render::execute(commands::render::RenderArgs {
            input,
            config,
            build_dir,
            index_dir,
            language,
            entities,
            quiet,
        }),
        Commands::Functions { index, name, json } => {
            commands::functions::execute(commands::functions::FunctionsArgs { index, name, json })
        }
    }
}
