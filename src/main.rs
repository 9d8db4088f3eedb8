use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use roundtable::core::config::{self, CliOverrides, RoundtableConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(
    name = "roundtable",
    about = "Terminal client for multi-assistant conversations"
)]
struct Args {
    /// GraphQL endpoint of the conversation service
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Initial number of rounds
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    rounds: Option<u32>,

    /// Config file to use instead of ~/.roundtable/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to roundtable.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("roundtable.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config(args.config.as_deref()).unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        RoundtableConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            endpoint: args.endpoint,
            rounds: args.rounds,
        },
    );

    log::info!(
        "Roundtable starting up against {} (rounds={})",
        resolved.endpoint,
        resolved.roster.rounds
    );

    roundtable::tui::run(resolved)
}
