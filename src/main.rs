use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clash_scout::api::{RiotApi, RiotApiClient};
use clash_scout::cache::ResponseCache;
use clash_scout::config::Config;
use clash_scout::display::output::{
    display_comparison, display_error, display_info, display_scout_result, display_success,
};
use clash_scout::rate_limit::ScrapeGate;
use clash_scout::season::{FileSeasonStats, NoSeasonStats, SeasonStatsSource};
use clash_scout::{ClashScout, PlayerIdentity};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "Clash Scout")]
#[command(about = "Scout an enemy Clash team and get ban recommendations", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Region (default: RIOT_REGION or na1)
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// JSON export of per-player season champion stats
    #[arg(long, global = true)]
    season_stats: Option<PathBuf>,

    /// Don't read or write the on-disk response cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scout the Clash team a player is registered with
    Scout {
        /// Riot Game Name
        game_name: String,

        /// Riot Tag (tag line)
        tag_line: String,

        /// Our roster as "Name#TAG,Name#TAG,..." to compare against
        #[arg(long)]
        compare: Option<String>,
    },
    /// Scout up to five players without a Clash registration
    Analyze {
        /// Players as "Name#TAG,Name#TAG,..."
        players: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(region) = &args.region {
        config.region = region.to_lowercase();
    }
    let scout_config = config.load_scout_config()?;

    let cache = if args.no_cache {
        ResponseCache::in_memory()
    } else {
        let path = config.cache_path.clone().unwrap_or_else(ResponseCache::default_path);
        ResponseCache::load(&path).context("could not open the response cache")?
    };
    let cache = Arc::new(cache);

    let season: Box<dyn SeasonStatsSource> = match &args.season_stats {
        Some(path) => Box::new(FileSeasonStats::load(path)?),
        None => Box::new(NoSeasonStats),
    };

    display_info(&format!("Using region {}", config.region));
    let client = RiotApiClient::new(config, cache.clone());
    let names = client
        .champion_names()
        .await
        .context("could not load champion data")?;
    display_success(&format!("Loaded {} champions", names.len()));

    let gate = Arc::new(ScrapeGate::new(scout_config.fetch.scrape_min_delay()));
    let scout = ClashScout::new(client, season, names, gate, scout_config);

    let outcome = execute(&scout, args.command).await;
    cache.save_after(outcome)
}

async fn execute<A: RiotApi, S: SeasonStatsSource>(scout: &ClashScout<A, S>, command: Command) -> Result<()> {
    let spinner = spinner();
    match command {
        Command::Scout {
            game_name,
            tag_line,
            compare,
        } => {
            let identity = PlayerIdentity::RiotId {
                game_name,
                tag_line,
            };
            spinner.set_message(format!("Scouting the Clash team of {}", identity.label()));
            let enemy = scout.scout_clash_team(&identity).await;
            let ours = match compare {
                Some(roster) => {
                    spinner.set_message("Scouting our roster");
                    let players = parse_roster(&roster)?;
                    Some(scout.scout_team_by_players(&players).await)
                }
                None => None,
            };
            spinner.finish_and_clear();

            let enemy = enemy?;
            display_scout_result(&enemy);
            if let Some(ours) = ours {
                let ours = ours.context("could not scout our roster")?;
                display_comparison(scout.calculate_team_comparison(&ours, &enemy));
            }
        }
        Command::Analyze { players } => {
            let players = parse_roster(&players)?;
            spinner.set_message(format!("Scouting {} players", players.len()));
            let result = scout.scout_team_by_players(&players).await;
            spinner.finish_and_clear();
            display_scout_result(&result?);
        }
    }
    Ok(())
}

fn parse_roster(raw: &str) -> Result<Vec<PlayerIdentity>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            PlayerIdentity::parse_riot_id(entry).with_context(|| format!("invalid Riot ID '{}'", entry))
        })
        .collect()
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
