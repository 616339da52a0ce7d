// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! gbot: the decision core of a fog-of-war territory-conquest agent.
//!
//! The agent sees the board through incremental, partial observations and
//! answers every turn with at most one move. It keeps a queue of pending
//! single-step moves and refills it with routes found by a budget-bounded,
//! value-maximizing breadth-first search.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Transport / Recording (events)    │
//! ├─────────────────────────────────────┤
//! │   Agent: per-turn decision policy   │
//! ├──────────────┬──────────────────────┤
//! │  MoveQueue   │ Route search, threat │
//! │              │ detection, expansion │
//! ├──────────────┴──────────────────────┤
//! │   Map: observed grid + visibility   │
//! └─────────────────────────────────────┘
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod game;
pub mod replay;

pub use agent::{Agent, Command, CommandSink, CounterAttack, Event, MoveItem, MoveQueue, Purpose, Threat};
pub use config::AgentConfig;
pub use error::WireError;

// Re-export key game types at crate root for convenience
pub use game::{Color, LeaderboardEntry, Map, MapDiff, Position, Tile, TileType};
