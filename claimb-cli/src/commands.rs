use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use claimb_core::config::{self as core_config, AppConfig, CONFIG_FILE};
use claimb_core::paths::CACHE_DB;
use claimb_core::stats::{champion_stats, performance_summary, role_stats};
use claimb_core::{ProxyRemote, SqliteStore, SyncCoordinator};
use claimb_types::{CategoryStats, CoachRequest, Match, SyncResult};

use crate::cli::{ConfigCommands, StatsGrouping};

/// Everything a command needs, built once per invocation.
pub struct Session {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    remote: Arc<ProxyRemote>,
    coordinator: SyncCoordinator,
}

impl Session {
    pub fn open(config: AppConfig, data_dir: PathBuf) -> Result<Self> {
        let cache_dir = config.data_dir.clone().unwrap_or_else(|| data_dir.clone());
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("creating {}", cache_dir.display()))?;
        let store = Arc::new(SqliteStore::open(&cache_dir.join(CACHE_DB))?);
        let remote = Arc::new(ProxyRemote::from_config(&config)?);
        let coordinator = SyncCoordinator::new(remote.clone(), store);
        Ok(Self { config, data_dir, remote, coordinator })
    }

    fn limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.config.match_limit).max(1)
    }
}

fn loaded<T>(result: SyncResult<T>) -> Result<T> {
    result.into_result().map_err(|e| anyhow::anyhow!("{}", e))
}

pub async fn list_matches(
    session: &Session,
    puuid: &str,
    limit: Option<usize>,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let limit = session.limit(limit);
    let region = &session.config.region;
    let result = if refresh {
        session.coordinator.refresh_matches(puuid, region, limit).await
    } else {
        session.coordinator.request_matches(puuid, region, limit).await
    };
    let matches = loaded(result)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }
    if matches.is_empty() {
        println!("{}", "No matches found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Match", "Played", "Queue", "Champion", "Role", "K/D/A", "CS", "Result"]);
    for m in &matches {
        table.add_row(match_row(m, puuid));
    }
    println!("{table}");
    println!("\n{} matches", matches.len());
    Ok(())
}

fn match_row(m: &Match, puuid: &str) -> Vec<Cell> {
    let played = format_played(m);
    let Some(p) = m.participant(puuid) else {
        return vec![
            Cell::new(&m.match_id),
            Cell::new(played),
            Cell::new(m.queue_id),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
        ];
    };
    let outcome = if p.win {
        Cell::new("Win").fg(Color::Green)
    } else {
        Cell::new("Loss").fg(Color::Red)
    };
    vec![
        Cell::new(&m.match_id),
        Cell::new(played),
        Cell::new(m.queue_id),
        Cell::new(&p.champion_name),
        Cell::new(if p.team_position.is_empty() { "-" } else { &p.team_position }),
        Cell::new(format!("{}/{}/{}", p.kills, p.deaths, p.assists)),
        Cell::new(p.creep_score()),
        outcome,
    ]
}

fn format_played(m: &Match) -> String {
    m.played_at().map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

pub async fn show_stats(
    session: &Session,
    puuid: &str,
    by: StatsGrouping,
    limit: Option<usize>,
    offline: bool,
    json: bool,
) -> Result<()> {
    let limit = session.limit(limit);
    let matches = if offline {
        session.coordinator.cached_matches(puuid, Some(limit)).await?
    } else {
        loaded(session.coordinator.request_matches(puuid, &session.config.region, limit).await)?
    };

    if let StatsGrouping::Summary = by {
        let summary = performance_summary(&matches, puuid);
        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}", "Performance:".cyan().bold());
            println!("  Games:          {}", summary.games);
            println!("  Win rate:       {:.1}%", summary.win_rate * 100.0);
            println!("  Average KDA:    {:.2}", summary.average_kda);
            println!("  CS / minute:    {:.1}", summary.cs_per_minute);
            println!("  Vision / game:  {:.1}", summary.vision_per_game);
        }
        return Ok(());
    }

    let (label, stats) = match by {
        StatsGrouping::Champion => ("Champion", champion_stats(&matches, puuid)),
        StatsGrouping::Role | StatsGrouping::Summary => ("Role", role_stats(&matches, puuid)),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    print_category_table(label, &stats, matches.len());
    Ok(())
}

fn print_category_table(label: &str, stats: &[CategoryStats], games: usize) {
    if stats.is_empty() {
        println!("{}", "No games to aggregate.".yellow());
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![label, "Games", "Wins", "Losses", "Win rate"]);
    for s in stats {
        let rate = format!("{:.1}%", s.win_rate * 100.0);
        let rate = if s.win_rate >= 0.5 {
            Cell::new(rate).fg(Color::Green)
        } else {
            Cell::new(rate).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&s.category),
            Cell::new(s.total),
            Cell::new(s.wins),
            Cell::new(s.losses()),
            rate,
        ]);
    }
    println!("{table}");
    println!("\nfrom {} cached matches", games);
}

pub async fn show_summoner(
    session: &Session,
    puuid: &str,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let region = &session.config.region;
    let result = if refresh {
        session.coordinator.refresh_summoner(puuid, region).await
    } else {
        session.coordinator.request_summoner(puuid, region).await
    };
    let summoner = loaded(result)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summoner)?);
    } else {
        println!("{}", "Summoner:".cyan().bold());
        println!("  PUUID:        {}", summoner.puuid);
        println!("  Level:        {}", summoner.summoner_level);
        println!("  Profile icon: {}", summoner.profile_icon_id);
    }
    Ok(())
}

pub async fn show_account(session: &Session, riot_id: &str, json: bool) -> Result<()> {
    let (game_name, tag_line) = riot_id
        .split_once('#')
        .filter(|(name, tag)| !name.is_empty() && !tag.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Riot ID must look like name#tag"))?;

    let api = session.remote.api();
    let region = &session.config.region;
    let account = api.account(game_name, tag_line, region).await?;
    let entries = api.league_entries(&account.puuid, region).await?;

    if json {
        let out = serde_json::json!({ "account": account, "leagueEntries": entries });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} {}", account.riot_id().cyan().bold(), account.puuid.dimmed());
    if entries.is_empty() {
        println!("{}", "Unranked.".yellow());
        return Ok(());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Queue", "Tier", "LP", "W", "L", "Win rate"]);
    for e in &entries {
        table.add_row(vec![
            Cell::new(&e.queue_type),
            Cell::new(format!("{} {}", e.tier, e.rank)),
            Cell::new(e.league_points),
            Cell::new(e.wins),
            Cell::new(e.losses),
            Cell::new(format!("{:.1}%", e.win_rate() * 100.0)),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show_timeline(
    session: &Session,
    match_id: &str,
    puuid: &str,
    json: bool,
) -> Result<()> {
    let timeline =
        session.remote.api().timeline_lite(match_id, puuid, &session.config.region).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    println!("{} {}", "Timeline".cyan().bold(), timeline.match_id);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Checkpoint", "CS", "Gold", "XP", "K/D/A"]);
    for (label, c) in &timeline.checkpoints {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(c.cs),
            Cell::new(c.gold),
            Cell::new(c.xp),
            Cell::new(&c.kda),
        ]);
    }
    println!("{table}");

    let minute = |m: Option<f64>| m.map_or_else(|| "-".to_string(), |v| format!("{:.1} min", v));
    println!("  First back:       {}", minute(timeline.timings.first_back_min));
    println!("  First full item:  {}", minute(timeline.timings.first_full_item_min));
    println!("  First kill:       {}", minute(timeline.timings.first_kill_min));
    println!("  First death:      {}", minute(timeline.timings.first_death_min));
    println!(
        "  Wards pre-15:     {} placed, {} killed, {} control",
        timeline.vision_pre15.wards_placed,
        timeline.vision_pre15.wards_killed,
        timeline.vision_pre15.control_wards
    );
    println!("  Plates pre-14:    {}", timeline.plates_pre14);
    Ok(())
}

pub async fn list_champions(
    session: &Session,
    locale: Option<String>,
    filter: Option<String>,
) -> Result<()> {
    let locale = locale.unwrap_or_else(|| session.config.locale.clone());
    let champions = loaded(session.coordinator.request_champions(&locale).await)?;
    let needle = filter.map(|f| f.to_lowercase());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Name", "Title", "Tags"]);
    let mut shown = 0_usize;
    for c in champions
        .iter()
        .filter(|c| needle.as_deref().map_or(true, |n| c.name.to_lowercase().contains(n)))
    {
        table.add_row(vec![
            Cell::new(&c.key),
            Cell::new(&c.name),
            Cell::new(&c.title),
            Cell::new(c.tags.join(", ")),
        ]);
        shown += 1;
    }
    println!("{table}");
    println!("\n{} of {} champions", shown, champions.len());
    Ok(())
}

pub async fn ask_coach(
    session: &Session,
    prompt: String,
    system: Option<String>,
    model: String,
    max_output_tokens: Option<u32>,
    reasoning_effort: Option<String>,
) -> Result<()> {
    let mut request = CoachRequest::new(prompt, model);
    if let Some(system) = system {
        request = request.with_system(system);
    }
    if let Some(tokens) = max_output_tokens {
        request = request.with_max_output_tokens(tokens);
    }
    if let Some(effort) = reasoning_effort {
        request = request.with_reasoning_effort(effort);
    }

    println!("{}", "Asking coach...".cyan());
    let response = session.remote.api().coach(&request).await?;
    println!("{}", response.text);
    Ok(())
}

pub async fn clear_cache(session: &Session) -> Result<()> {
    session.coordinator.clear_cache().await?;
    println!("{} Cache cleared", "✓".green());
    Ok(())
}

pub fn handle_config_command(cmd: ConfigCommands, data_dir: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(data_dir),
        ConfigCommands::Path => {
            println!("{}", data_dir.display());
            Ok(())
        },
        ConfigCommands::Set { key, value } => set_config_value(data_dir, &key, &value),
    }
}

fn show_config(data_dir: &Path) -> Result<()> {
    let config = core_config::load_config(data_dir)?;
    println!("{}", "Proxy:".cyan().bold());
    println!("  Base URL:   {}", config.proxy.base_url);
    println!("  Anon key:   {}", mask_key(&config.proxy.anon_key));
    println!("  App token:  {}", mask_key(&config.proxy.app_token));
    println!("  Device:     {}", config.proxy.device_id);
    println!("{}", "Network:".cyan().bold());
    println!("  Request timeout:  {}s", config.network.request_timeout_secs);
    println!("  Resource timeout: {}s", config.network.resource_timeout_secs);
    println!("  Max attempts:     {}", config.network.max_attempts);
    println!("{}", "Sync:".cyan().bold());
    println!("  Region:       {}", config.region);
    println!("  Match limit:  {}", config.match_limit);
    println!("  Locale:       {}", config.locale);
    println!("  Data Dragon:  {}", config.ddragon_url);
    Ok(())
}

fn set_config_value(data_dir: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = core_config::read_config_file(&data_dir.join(CONFIG_FILE))?;
    match key {
        "region" => config.region = value.to_string(),
        "locale" => config.locale = value.to_string(),
        "ddragon_url" => config.ddragon_url = value.to_string(),
        "match_limit" => {
            config.match_limit =
                value.parse().map_err(|_| anyhow::anyhow!("Invalid number: {}", value))?;
        },
        "network.max_attempts" => {
            config.network.max_attempts =
                value.parse().map_err(|_| anyhow::anyhow!("Invalid number: {}", value))?;
        },
        "proxy.base_url" => config.proxy.base_url = value.trim_end_matches('/').to_string(),
        "proxy.anon_key" => config.proxy.anon_key = value.to_string(),
        "proxy.app_token" => config.proxy.app_token = value.to_string(),
        "proxy.device_id" => config.proxy.device_id = value.to_string(),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
    config.validate()?;
    core_config::save_config(data_dir, &config)?;

    let secret = key.ends_with("_key") || key.ends_with("_token");
    let shown = if secret { mask_key(value) } else { value.to_string() };
    println!("{} Config updated: {} = {}", "✓".green(), key, shown);
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
