//! qrscan CLI - decode QR codes from base64-encoded images over HTTP.
//!
//! qrscan runs a small HTTP service: clients POST a data-URL image to
//! `/scan` and get back the text and position of every QR code in it.
//! The same pipeline is available offline through `qrscan scan`.
//!
//! # Usage
//!
//! ```bash
//! # Start the server on 0.0.0.0:5000
//! qrscan serve
//!
//! # Scan a single image or a directory of images
//! qrscan scan ./captures/ --format jsonl
//!
//! # View configuration
//! qrscan config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// qrscan - decode QR codes from base64-encoded images.
#[derive(Parser, Debug)]
#[command(name = "qrscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "QRSCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP scan server
    Serve(cli::serve::ServeArgs),

    /// Scan image files from disk
    Scan(cli::scan::ScanArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => qrscan_core::Config::load_from(&qrscan_core::Config::expand_path(path))?,
        None => match qrscan_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `qrscan config path`."
                );
                qrscan_core::Config::default()
            }
        },
    };

    // The server's development diagnostics imply debug-level logs
    let verbose = cli.verbose
        || matches!(&cli.command, Commands::Serve(args) if config.server.debug && !args.quiet);
    logging::init_from_config(&config, verbose, cli.json_logs);

    tracing::debug!("qrscan v{}", qrscan_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Scan(args) => cli::scan::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config, cli.config.as_deref()).await,
    }
}
