//! webscript CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "webscript")]
#[command(version)]
#[command(about = "Render dynamic documents from templates and scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a document and print its output
    Render {
        /// Document to render (.wsweb template or .wscript script)
        path: PathBuf,

        /// Request parameter (KEY=VALUE), may be repeated
        #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Engine configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the execution time limit in milliseconds (0 disables it)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Print the script generated from a template
    Transpile {
        /// Template to transpile
        path: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so rendered output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webscript=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            path,
            params,
            config,
            timeout_ms,
        } => commands::render::execute(commands::render::RenderArgs {
            path,
            params,
            config,
            timeout_ms,
        }),
        Commands::Transpile { path } => commands::transpile::execute(&path),
    }
}
