use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "claimb",
    about = "Claimb - League of Legends match data, offline first",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[arg(short, long, env = "CLAIMB_REGION", global = true, help = "Regional routing value")]
    pub region: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sync and list recent matches")]
    Matches {
        #[arg(help = "Player PUUID")]
        puuid: String,

        #[arg(short = 'n', long, help = "Number of matches (defaults to match_limit)")]
        limit: Option<usize>,

        #[arg(long, help = "Incremental refresh instead of a deduplicated request")]
        refresh: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Win rates per role or champion over cached matches")]
    Stats {
        #[arg(help = "Player PUUID")]
        puuid: String,

        #[arg(long, value_enum, default_value = "role")]
        by: StatsGrouping,

        #[arg(short = 'n', long, help = "Number of matches (defaults to match_limit)")]
        limit: Option<usize>,

        #[arg(long, help = "Use the cache only, skip the network")]
        offline: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show a summoner profile")]
    Summoner {
        #[arg(help = "Player PUUID")]
        puuid: String,

        #[arg(long, help = "Refetch even if another request is in flight")]
        refresh: bool,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Resolve a Riot ID (name#tag) and show ranked standings")]
    Account {
        #[arg(help = "Riot ID, e.g. 'Faker#KR1'")]
        riot_id: String,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Early-game timeline digest for one match")]
    Timeline {
        #[arg(help = "Match id, e.g. 'EUW1_1234567890'")]
        match_id: String,

        #[arg(help = "Player PUUID")]
        puuid: String,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "List the champion catalogue")]
    Champions {
        #[arg(long, help = "Data Dragon locale (defaults to config locale)")]
        locale: Option<String>,

        #[arg(long, help = "Only champions whose name contains this text")]
        filter: Option<String>,
    },

    #[command(about = "Ask the AI coach")]
    Coach {
        #[arg(help = "Prompt text")]
        prompt: String,

        #[arg(long, help = "System instructions")]
        system: Option<String>,

        #[arg(long, default_value = "gpt-5-mini")]
        model: String,

        #[arg(long)]
        max_output_tokens: Option<u32>,

        #[arg(long, help = "minimal | low | medium | high")]
        reasoning_effort: Option<String>,
    },

    #[command(subcommand, about = "View and modify configuration")]
    Config(ConfigCommands),

    #[command(about = "Delete every cached entity")]
    ClearCache,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show,

    #[command(about = "Print the data directory")]
    Path,

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key (e.g., 'region', 'proxy.app_token')")]
        key: String,

        #[arg(help = "New value")]
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatsGrouping {
    Role,
    Champion,
    Summary,
}
