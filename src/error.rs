//! Error types for decoding observations from the wire.

use thiserror::Error;

/// A malformed observation received from the game server.
///
/// Only the decoding boundary produces these. Once an observation is decoded,
/// the decision core never fails: stale or impossible states are filtered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Tile type code outside the known range.
    #[error("unknown tile type code {0}")]
    UnknownTileType(u8),
    /// A diff entry in index position is not a non-negative integer.
    #[error("diff entry {position} is not a cell index: {found}")]
    BadIndex {
        /// Offset of the entry inside the diff array.
        position: usize,
        /// The offending JSON value.
        found: String,
    },
    /// The diff ends with an index that has no tile after it.
    #[error("diff ends with index {0} but no tile")]
    DanglingIndex(u64),
    /// A tile tuple could not be decoded.
    #[error("malformed tile at diff entry {position}: {reason}")]
    BadTile {
        /// Offset of the entry inside the diff array.
        position: usize,
        /// Decoder message.
        reason: String,
    },
    /// A leaderboard row without both a color and an army count.
    #[error("leaderboard row needs a color and an army count, got {0} fields")]
    ShortLeaderboardRow(usize),
    /// A leaderboard field that does not fit its type.
    #[error("leaderboard field out of range: {0}")]
    LeaderboardOutOfRange(i64),
}
