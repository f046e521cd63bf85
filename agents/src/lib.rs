pub mod agent;
pub mod helper;
pub mod random;

pub use agent::Agent;
pub use helper::{collect_attacks, collect_deploys};
pub use random::RandomAgent;
