use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use keel_cli::{Args, execute, scenario, ship};
use keel_solvers::simulation::Status;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = ship::load(&args.ship)?;
    let scenario = scenario::load(&args.scenario)?;
    info!(ship = ?params.name, t_end = scenario.config.t_end, "inputs loaded");

    let summary = execute(&params, scenario, &args.out_dir)?;
    match summary.status {
        Status::Completed => info!(end_time = summary.end_time, ticks = summary.ticks, "done"),
        Status::Terminated => warn!(
            reason = %summary.reason,
            end_time = summary.end_time,
            ticks = summary.ticks,
            "terminated early"
        ),
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
