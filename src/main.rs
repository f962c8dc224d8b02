use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use team_pairing::config::AppConfig;
use team_pairing::storage::{LeagueStore, StorageConfig};
use team_pairing::{
    pair_rosters, parse_duration, EngineError, GameMode, PairingOutcome, PlayerName, Roster,
    RosterEntry,
};

#[derive(Parser)]
#[command(name = "team-pairing")]
#[command(about = "Pair two teams' players for the next league round")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./pairing.toml")]
    config: PathBuf,

    /// Data directory path (overrides the configuration)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair the next round and write it to the league store
    Pair {
        /// Print the pairings without writing a round sheet
        #[arg(long)]
        dry_run: bool,

        /// Print the pairings as JSON
        #[arg(long)]
        json: bool,

        /// Give up after this long (e.g. "5s", "500ms")
        #[arg(long)]
        timeout: Option<String>,
    },

    /// Show rosters with wins, byes and opponents so far
    Status,

    /// Register a player with a team
    AddPlayer {
        team: String,
        name: String,
        /// core, movie, any or drop
        mode: String,
    },

    /// Change the game mode a player has declared
    SetMode {
        name: String,
        /// core, movie, any or drop
        mode: String,
    },

    /// Record the games a player won in a round
    Record {
        player: String,
        wins: u32,

        /// Round number (default: latest)
        #[arg(long)]
        round: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::debug!("Starting team-pairing v{}", env!("CARGO_PKG_VERSION"));

    let store = LeagueStore::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Pair {
            dry_run,
            json,
            timeout,
        } => {
            let rosters = store.load_league(&config.team_names)?;
            let [team_a, team_b] = rosters.as_slice() else {
                bail!("Expected two teams, found {}", rosters.len());
            };

            let mut options = config.search.pairing_options();
            if let Some(timeout) = timeout {
                let limit = parse_duration(&timeout)
                    .with_context(|| format!("Invalid --timeout: {}", timeout))?;
                options.timeout = Some(limit);
            }

            let result = match pair_rosters(team_a, team_b, &options) {
                Ok(PairingOutcome::Paired(result)) => result,
                Ok(PairingOutcome::Infeasible { unplaced }) => {
                    eprintln!("No valid assignment found!");
                    eprintln!("Could not find an opponent for:");
                    for name in &unplaced {
                        eprintln!("  - {}", name);
                    }
                    eprintln!("Adjust a player's mode with `set-mode` and try again.");
                    bail!("no valid assignment");
                }
                Err(EngineError::Timeout { steps }) => {
                    bail!(
                        "Search gave up after {} steps; raise search.max_steps or --timeout",
                        steps
                    );
                }
                Err(e) => return Err(e.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\n=== Pairings: {} vs {} ===", team_a.name(), team_b.name());
                for pairing in &result {
                    println!("  {}", pairing);
                }
            }

            if dry_run {
                println!("\n(dry run - no round written)");
            } else {
                let round = store.write_next_round(&result, config.bye_wins)?;
                println!("\nWrote round {} to {:?}", round, store.config().round_path(round));
            }
        }
        Commands::Status => {
            let rosters = store.load_league(&config.team_names)?;
            for roster in &rosters {
                print_roster(roster);
            }
        }
        Commands::AddPlayer { team, name, mode } => {
            let Some(team) = config.team_name(&team) else {
                bail!(
                    "Unknown team {:?}; configured teams are {}",
                    team,
                    config.team_names.join(", ")
                );
            };
            let entry = RosterEntry {
                name: PlayerName::parse(&name)?,
                game_mode: mode.parse::<GameMode>()?,
            };
            store.add_player(team, entry)?;
            println!("Added {} to {}", name.trim(), team);
        }
        Commands::SetMode { name, mode } => {
            let name = PlayerName::parse(&name)?;
            let mode = mode.parse::<GameMode>()?;
            let team = store.set_mode(&config.team_names, &name, mode)?;
            println!("{} ({}) now plays {}", name, team, mode);
        }
        Commands::Record {
            player,
            wins,
            round,
        } => {
            let name = PlayerName::parse(&player)?;
            let round = store.record_wins(round, &name, wins)?;
            println!("Recorded {} wins for {} in round {}", wins, name, round);
        }
    }

    Ok(())
}

fn print_roster(roster: &Roster) {
    println!("\n=== {} (score {}) ===", roster.name(), roster.score());
    for player in roster.players() {
        let opponents: Vec<&str> = player.history.iter().map(|n| n.as_str()).collect();
        println!(
            "  {:<16} {:<6} wins: {:<3} bye: {:<3} faced: {}",
            player.name.as_str(),
            player.game_mode.to_string(),
            player.wins,
            if player.had_bye { "yes" } else { "no" },
            if opponents.is_empty() {
                "-".to_string()
            } else {
                opponents.join(", ")
            }
        );
    }
}
