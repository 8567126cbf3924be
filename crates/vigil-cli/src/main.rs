mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vigil",
    version = "0.1.0",
    about = "Threat-log triage over the analysis object store"
)]
struct Cli {
    /// Config file path (default: ~/.vigil/vigil.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the threat overview
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List normalized logs from all configured sources
    Logs {
        /// Substring filter over message and source
        #[arg(short, long)]
        search: Option<String>,
        /// Only show one class
        #[arg(long, value_parser = ["normal", "abnormal"])]
        class: Option<String>,
        /// Show the full flattened field columns
        #[arg(long)]
        wide: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List unacknowledged abnormal logs
    Alerts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Acknowledge abnormal logs by id
    Ack {
        /// Record ids to acknowledge
        #[arg(required_unless_present = "all")]
        ids: Vec<String>,
        /// Acknowledge every currently visible abnormal log
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the raw analysis document
    Fetch,
    /// Run the proxy server
    Serve {
        /// Listen port (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Probe the configured data source
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".vigil")
        .join("vigil.toml")
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let config = match vigil_config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Summary { json } => commands::summary::run(&config, json),
        Commands::Logs {
            search,
            class,
            wide,
            json,
        } => commands::logs::run(&config, search, class, wide, json),
        Commands::Alerts { json } => commands::alerts::run(&config, json),
        Commands::Ack { ids, all, json } => commands::ack::run(&config, ids, all, json),
        Commands::Fetch => commands::fetch::run(&config),
        Commands::Serve { port } => commands::serve::run(&config, port),
        Commands::Health { json } => commands::health::run(&config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
