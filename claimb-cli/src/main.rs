//! `claimb` - command-line front end for the Claimb data layer.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use claimb_core::{config, logger, paths};
use cli::{Cli, Commands};
use commands::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logging(&cli.log_level);

    let data_dir = paths::get_data_dir().context("resolving data directory")?;

    if let Commands::Config(cmd) = cli.command {
        return commands::handle_config_command(cmd, &data_dir);
    }

    let mut app_config = config::load_config(&data_dir)
        .with_context(|| format!("loading config from {}", data_dir.display()))?;
    if let Some(region) = cli.region {
        app_config.region = region;
    }
    debug!(region = %app_config.region, base_url = %app_config.proxy.base_url, "Config loaded");

    let session = Session::open(app_config, data_dir)?;

    match cli.command {
        Commands::Matches { puuid, limit, refresh, json } => {
            commands::list_matches(&session, &puuid, limit, refresh, json).await
        },
        Commands::Stats { puuid, by, limit, offline, json } => {
            commands::show_stats(&session, &puuid, by, limit, offline, json).await
        },
        Commands::Summoner { puuid, refresh, json } => {
            commands::show_summoner(&session, &puuid, refresh, json).await
        },
        Commands::Account { riot_id, json } => {
            commands::show_account(&session, &riot_id, json).await
        },
        Commands::Timeline { match_id, puuid, json } => {
            commands::show_timeline(&session, &match_id, &puuid, json).await
        },
        Commands::Champions { locale, filter } => {
            commands::list_champions(&session, locale, filter).await
        },
        Commands::Coach { prompt, system, model, max_output_tokens, reasoning_effort } => {
            commands::ask_coach(&session, prompt, system, model, max_output_tokens, reasoning_effort)
                .await
        },
        Commands::ClearCache => commands::clear_cache(&session).await,
        Commands::Config(_) => Ok(()),
    }
}
