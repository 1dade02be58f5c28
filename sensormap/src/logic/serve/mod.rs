pub mod sensors;
pub mod ui;

use crate::logic::config::HostConfig;
use crate::logic::readings::load_readings;
use crate::logic::serve::sensors::sensors;
use crate::logic::serve::ui::ui_routes;
use anyhow::Context;
use colored::*;
use daemonize::Daemonize;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use warp::{filters::BoxedFilter, Filter, Reply};

/// API first, then static assets and the SPA fallback.
pub fn routes(readings_file: PathBuf) -> BoxedFilter<(impl Reply,)> {
    let api = sensors(Arc::new(readings_file)).boxed();
    let ui = ui_routes().boxed();
    api.or(ui).boxed()
}

pub async fn run(config: HostConfig, daemon: bool) -> anyhow::Result<()> {
    // 1) Daemonize if requested
    if daemon {
        Daemonize::new()
            .pid_file("sensormap.pid")
            .chown_pid_file(false)
            .working_directory(".")
            .start()?;
    }

    // 2) Report on the readings file; it is re-read per request, so a missing
    //    or broken file is not fatal here
    let readings_file = config.readings_file();
    match load_readings(&readings_file) {
        Ok(readings) => println!(
            "{} {} readings from {}",
            "✓".green(),
            readings.len(),
            readings_file.display()
        ),
        Err(e) => eprintln!("{} {:#}", "✗".red(), e),
    }

    // 3) Bind and serve
    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid bind address {}", config.host))?;
    println!("sensormap running on http://{}:{}", config.host, config.port);
    warp::serve(routes(readings_file)).run((ip, config.port)).await;
    Ok(())
}
