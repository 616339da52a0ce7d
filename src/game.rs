//! Observed game world.
//!
//! Everything the agent knows about the board:
//! - The grid of tiles as of the latest frame, plus the "ever seen" record
//! - Sparse frame diffs as they arrive from the server
//! - Player colors, leaderboard rows and General sightings

mod diff;
mod map;
mod player;

pub use diff::MapDiff;
pub use map::{MAX_SIDE, Map, Position, Tile, TileType};
pub use player::{Color, EnemyGeneral, Generals, LeaderboardEntry};
