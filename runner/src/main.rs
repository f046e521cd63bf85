// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for games, tournaments and one-off turn resolution
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conquest_engine::map::sample_map;
use conquest_engine::setup::SetupConfig;
use conquest_engine::{resolve_turn, wire, TerritoryGraph};
use conquest_tournament::{play_seeded, run_tournament, TournamentConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conquest-runner", about = "Territory conquest turn engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single game with random agents
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 2)]
        players: u8,
        #[arg(short, long, default_value_t = 100)]
        max_turns: u32,
        /// Map details JSON; the built-in sample map if omitted
        #[arg(long)]
        map: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a tournament of N games
    Tournament {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 2)]
        players: u8,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 100)]
        max_turns: u32,
        #[arg(long)]
        map: Option<PathBuf>,
    },
    /// Resolve one turn from JSON files and print the new standing
    Resolve {
        #[arg(long)]
        map: PathBuf,
        #[arg(long)]
        standing: PathBuf,
        #[arg(long)]
        orders: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play { seed, players, max_turns, map, json } => cmd_play(seed, players, max_turns, map.as_deref(), json),
        Commands::Tournament { games, players, seed, max_turns, map } => {
            let config = TournamentConfig { games, players, seed, max_turns, setup: SetupConfig::default() };
            cmd_tournament(&config, map.as_deref())
        }
        Commands::Resolve { map, standing, orders } => cmd_resolve(&map, &standing, &orders),
    }
}

fn load_graph(path: Option<&Path>) -> Result<Arc<TerritoryGraph>> {
    let graph = match path {
        Some(path) => {
            let json = read(path)?;
            wire::graph_from_json(&json).with_context(|| format!("bad map details in {}", path.display()))?
        }
        None => sample_map().context("built-in sample map")?,
    };
    Ok(Arc::new(graph))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn cmd_play(seed: u64, player_count: u8, max_turns: u32, map: Option<&Path>, json: bool) -> Result<()> {
    let graph = load_graph(map)?;
    let result = play_seeded(graph, player_count, &SetupConfig::default(), seed, max_turns)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Game finished: seed={}, players={}", seed, player_count);
    match result.winner {
        Some(p) => println!("  Winner: {}", p),
        None => println!("  No winner after {} turns", max_turns),
    }
    println!("  Turns played: {}", result.turns_played);
    println!("  Orders dropped: {}", result.dropped_orders);
    println!();
    println!("  Final standings:");
    for pr in &result.player_results {
        println!("    {:6} {:8} -- territories: {}, armies: {}, income: {}",
            pr.player.to_string(), pr.agent_name, pr.territories, pr.armies, pr.income);
    }
    Ok(())
}

fn cmd_tournament(config: &TournamentConfig, map: Option<&Path>) -> Result<()> {
    let graph = load_graph(map)?;
    let summary = run_tournament(graph, config);

    println!("--- Summary ({} games, {} draws, {} errors) ---", summary.games, summary.draws, summary.errors);
    for (player, wins) in &summary.wins {
        println!("  {:6}: {:>4} wins ({:.1}%)", player.to_string(), wins, summary.win_rate(*player) * 100.0);
    }
    println!("  Average turns: {:.1}", summary.average_turns);
    Ok(())
}

fn cmd_resolve(map: &Path, standing: &Path, orders: &Path) -> Result<()> {
    let graph = load_graph(Some(map))?;
    let state = wire::state_from_json(Arc::clone(&graph), &read(standing)?)
        .with_context(|| format!("bad standing in {}", standing.display()))?;
    let orders = wire::orders_from_json(&graph, &read(orders)?)
        .with_context(|| format!("bad orders in {}", orders.display()))?;

    let next = resolve_turn(&state, &orders)?;

    println!("{}", serde_json::to_string_pretty(&wire::state_to_standing(&next)?)?);
    for player in next.players() {
        tracing::info!(player = %player, income = next.income(player), territories = next.owned_by(player).len(), "next turn");
    }
    Ok(())
}
