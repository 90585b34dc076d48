use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "keel")]
#[command(about = "Runs a vessel maneuvering scenario", long_about = None)]
pub struct Args {
    /// Ship definition (JSON)
    #[arg(long)]
    pub ship: PathBuf,
    /// Scenario definition (JSON)
    #[arg(long)]
    pub scenario: PathBuf,
    /// Directory for results.csv, results.jsonl, and summary.json
    #[arg(long)]
    pub out_dir: PathBuf,
}
