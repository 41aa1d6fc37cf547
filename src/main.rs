use clap::Parser;
use pbb::core::config::{self, CliOverrides, PbbConfig};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "pbb", about = "Terminal reader for the Pure Bhakti Base library")]
struct Args {
    /// Library API base URL (overrides PBB_API_BASE_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Base URL serving page images (overrides PBB_ASSET_BASE_URL and the config file)
    #[arg(long)]
    asset_url: Option<String>,

    /// Log level: error, warn, info, debug, trace or off
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}; continuing with default settings");
            PbbConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            api_url: args.api_url,
            asset_url: args.asset_url,
            log_level: args.log_level,
        },
    );

    // File logger: the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!(
        "pbb starting up: api={}, assets={}{}",
        resolved.api_base_url,
        resolved.asset_base_url,
        resolved.asset_root
    );

    pbb::tui::run(resolved)
}
