use clap::{Parser, Subcommand, ValueEnum};

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// environmental sensor map dashboard host
#[derive(Parser)]
#[command(name = "sensormap")]
pub struct Cli {
    /// Address to bind (overrides config file and SENSORMAP_IP)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to bind (overrides config file and SENSORMAP_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to configuration file (supports `~`)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the dashboard and the readings it displays
    Serve {
        /// Readings JSON file (supports `~`)
        #[arg(short, long)]
        readings: Option<String>,
        /// Run as daemon in background (Unix only)
        #[arg(long)]
        daemon: bool,
    },

    /// Report which readings would be placed on the map
    Check {
        /// Readings JSON file (supports `~`)
        #[arg(short, long)]
        readings: Option<String>,
        /// Only count readings of this sensor type, e.g. DHT22
        #[arg(short = 't', long = "type")]
        sensor_type: Option<String>,
        /// Output format: table (default) or json (mapped readings only)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration and where it came from
    Show,
}
