//! gbot CLI - replay recorded games through the agent and inspect its config.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// gbot - decision core of a fog-of-war territory-conquest agent
#[derive(Parser, Debug)]
#[command(name = "gbot")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed a recorded event stream (JSON lines) to the agent
    Replay {
        /// Recording file
        #[arg(required = true)]
        recording: PathBuf,

        /// Agent config file (JSON, default: built-in values)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Print the agent config as JSON
    Config {
        /// Config file to validate and print (default: built-in values)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Replay {
            recording,
            config,
            seed,
            format,
        } => cli::replay::execute(&recording, config.as_deref(), seed, format),

        Commands::Config { config } => cli::config::execute(config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
