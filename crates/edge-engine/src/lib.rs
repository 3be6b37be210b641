// Library root: re-exports all modules so integration tests and the CLI can
// reach the crate's public API.

pub mod archetype;
pub mod assets;
pub mod config;
pub mod engine;
pub mod roster;
pub mod rounding;
pub mod snapshot;
pub mod valuation;

pub use engine::{score_league, score_snapshot, EngineError, LeagueReport, RosterAxes};
