use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use riot_api_client::constants::{Continent, Region};
use riot_api_client::models::MatchlistOptions;
use riot_api_client::{ClientConfig, RiotClient};

#[derive(Parser, Debug)]
#[command(name = "riot-api")]
#[command(version, about = "Query the Riot Games API with client-side rate limiting")]
struct Args {
    /// Configuration file (YAML); `RIOT_*` environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Free champion rotation of a region
    Rotations {
        #[arg(long)]
        region: Region,
    },
    /// Recent match ids of a player
    Matchlist {
        #[arg(long)]
        continent: Continent,
        #[arg(long)]
        puuid: String,
        #[arg(long)]
        queue: Option<u16>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// A single match
    Match {
        #[arg(long)]
        continent: Continent,
        #[arg(long)]
        id: String,
    },
    /// The timeline of a match
    Timeline {
        #[arg(long)]
        continent: Continent,
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };
    info!(
        max_attempts = config.dispatch.max_attempts,
        app_limits = %config.rate_limits.app_limits,
        "Configuration loaded"
    );

    let client = RiotClient::new(config)?;

    // Abandoning the call on Ctrl+C drops any pending wait or exchange
    tokio::select! {
        result = run(&client, args.command) => {
            println!("{}", result?);
        }
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, abandoning request");
        }
    }

    Ok(())
}

async fn run(client: &RiotClient, command: Command) -> anyhow::Result<String> {
    let output = match command {
        Command::Rotations { region } => {
            serde_json::to_string_pretty(&client.champion_rotations(region).await?)?
        }
        Command::Matchlist {
            continent,
            puuid,
            queue,
            count,
        } => {
            let options = MatchlistOptions {
                queue,
                count,
                ..Default::default()
            };
            serde_json::to_string_pretty(&client.matchlist(continent, &puuid, &options).await?)?
        }
        Command::Match { continent, id } => {
            serde_json::to_string_pretty(&client.match_by_id(continent, &id).await?)?
        }
        Command::Timeline { continent, id } => {
            serde_json::to_string_pretty(&client.match_timeline(continent, &id).await?)?
        }
    };
    Ok(output)
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
