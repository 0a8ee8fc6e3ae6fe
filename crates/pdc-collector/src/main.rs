//! PDC Collector - main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use pdc_collector::config::{
    ArchivalState, BigIdConfig, OneTrustConfig, DEFAULT_PAGE_SIZE, DEFAULT_STATE_DIR,
};
use pdc_collector::secrets::{FileSecretStore, SECRET_STORE_FILE};
use pdc_collector::sink::StdoutSink;
use pdc_collector::{bigid, onetrust};
use pdc_common::logging::{init_logging, LogConfig, LogLevel};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pdc-collector")]
#[command(author, version, about = "Privacy data collector")]
struct Cli {
    /// Data source to collect
    #[command(subcommand)]
    source: Source,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Source {
    /// Collect OneTrust assessment summaries, details, and Q&A records
    Onetrust {
        /// Tenant base URL, e.g. https://customer.my.onetrust.com
        #[arg(long, env = "PDC_ONETRUST_BASE_URL")]
        base_url: String,

        /// OAuth2 bearer token, or the mask sentinel once sealed
        #[arg(long, env = "PDC_ONETRUST_API_TOKEN", hide_env_values = true)]
        api_token: String,

        /// Archival-state filter for the list endpoint
        #[arg(long, value_enum, default_value_t = ArchivalState::All)]
        archival_state: ArchivalState,

        /// Page size for the list endpoint
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Collect page 0 only and skip the detail/Q&A stages
        #[arg(long)]
        test_mode: bool,

        /// Directory for collector state (secret store)
        #[arg(long, env = "PDC_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
        state_dir: PathBuf,
    },

    /// Tail the BigID audit log with checkpointed resumption
    Bigid {
        /// BigID base URL
        #[arg(long, env = "PDC_BIGID_BASE_URL")]
        base_url: String,

        /// Bearer token, or the mask sentinel once sealed
        #[arg(long, env = "PDC_BIGID_API_TOKEN", hide_env_values = true)]
        api_token: String,

        /// Directory for collector state (secret store, checkpoint)
        #[arg(long, env = "PDC_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
        state_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    match cli.source {
        Source::Onetrust {
            base_url,
            api_token,
            archival_state,
            page_size,
            test_mode,
            state_dir,
        } => {
            let config = OneTrustConfig {
                base_url,
                api_token,
                archival_state,
                page_size,
                test_mode,
                state_dir,
            }
            .validated()?;

            let mut store = FileSecretStore::open(config.state_dir.join(SECRET_STORE_FILE))?;
            let mut sink = StdoutSink::new();

            info!(base_url = %config.base_url, "collecting OneTrust assessments");
            onetrust::run(&config, &mut store, &mut sink).await?;
        },

        Source::Bigid {
            base_url,
            api_token,
            state_dir,
        } => {
            let config = BigIdConfig {
                base_url,
                api_token,
                state_dir,
            }
            .validated()?;

            let mut store = FileSecretStore::open(config.state_dir.join(SECRET_STORE_FILE))?;
            let mut sink = StdoutSink::new();

            info!(base_url = %config.base_url, "collecting BigID audit log");
            bigid::run(&config, &mut store, &mut sink).await?;
        },
    }

    info!("collection complete");
    Ok(())
}
