// sensormap/src/main.rs

mod cli;
mod logic;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use colored::*;
use logic::config::HostConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command‐line arguments
    let args = Cli::parse();

    // Defaults < config file < SENSORMAP_* env < flags
    let mut config = HostConfig::load(args.config.as_deref())?;
    config.apply_env();

    match args.command {
        Commands::Serve { readings, daemon } => {
            config.apply_args(args.host, args.port, readings);
            logic::serve::run(config, daemon).await?
        }

        Commands::Check {
            readings,
            sensor_type,
            format,
        } => {
            config.apply_args(args.host, args.port, readings);
            logic::check::run(&config, sensor_type, format)?
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config.apply_args(args.host, args.port, None);
                let source = match (&args.config, HostConfig::default_path()) {
                    (Some(path), _) => path.clone(),
                    (None, Some(path)) if path.exists() => path.display().to_string(),
                    _ => "built-in defaults".to_string(),
                };
                println!("{} {}", "Configuration from:".bright_blue().bold(), source);
                println!();
                println!("  {} {}", "host:".cyan(), config.host.bright_white());
                println!("  {} {}", "port:".cyan(), config.port.to_string().bright_white());
                println!(
                    "  {} {}",
                    "readings:".cyan(),
                    config.readings_file().display().to_string().bright_white()
                );
                println!();
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}
