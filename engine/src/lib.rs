pub mod types;
pub mod error;
pub mod map;
pub mod state;
pub mod orders;
pub mod engine;
pub mod setup;
pub mod wire;


pub use types::*;
pub use error::*;
pub use map::{GraphDescription, TerritoryGraph};
pub use state::{GameState, TerritorySnapshot};
pub use orders::{combat, AttackTransfer, Deploy, Order, OrderOutcome};
pub use engine::{resolve_turn, resolve_turn_detailed, TurnResolution};
