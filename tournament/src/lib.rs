pub mod runner;
pub mod tournament;

pub use runner::{make_agents, play_seeded, run_game, GameError, GameResult, PlayerResult};
pub use tournament::{run_tournament, TournamentConfig, TournamentSummary};
