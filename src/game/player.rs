//! Player colors, leaderboard rows and General sightings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WireError;
use crate::game::{Map, Position, TileType};

/// A player's color, which doubles as their identity on the board.
pub type Color = u8;

/// One row of the server leaderboard.
///
/// On the wire a row is `[color, army, land]`; the land count is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub struct LeaderboardEntry {
    /// Player color.
    pub color: Color,
    /// Total army of the player.
    pub total_army: u64,
    /// Number of tiles held, when reported.
    pub land: Option<u64>,
}

impl TryFrom<Vec<i64>> for LeaderboardEntry {
    type Error = WireError;

    fn try_from(row: Vec<i64>) -> Result<Self, Self::Error> {
        let [color, army, rest @ ..] = row.as_slice() else {
            return Err(WireError::ShortLeaderboardRow(row.len()));
        };
        let color = Color::try_from(*color).map_err(|_| WireError::LeaderboardOutOfRange(*color))?;
        let total_army =
            u64::try_from(*army).map_err(|_| WireError::LeaderboardOutOfRange(*army))?;
        let land = match rest.first() {
            Some(&land) => {
                Some(u64::try_from(land).map_err(|_| WireError::LeaderboardOutOfRange(land))?)
            }
            None => None,
        };
        Ok(Self {
            color,
            total_army,
            land,
        })
    }
}

/// A sighted enemy General.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyGeneral {
    /// Where the General was seen.
    pub position: Position,
    /// Color of its owner.
    pub color: Color,
}

/// Known General positions: our own and the enemies'.
///
/// At most one sighting is kept per color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generals {
    /// Our own General, once seen.
    own: Option<Position>,
    /// Enemy Generals in order of first sighting.
    enemies: Vec<EnemyGeneral>,
}

impl Generals {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Our own General position.
    #[must_use]
    pub const fn own(&self) -> Option<Position> {
        self.own
    }

    /// Enemy General sightings in order of discovery.
    #[must_use]
    pub fn enemies(&self) -> &[EnemyGeneral] {
        &self.enemies
    }

    /// Check if a sighting for `color` exists.
    #[must_use]
    pub fn has_sighting(&self, color: Color) -> bool {
        self.enemies.iter().any(|g| g.color == color)
    }

    /// Forget everything (a new game started).
    pub fn reset(&mut self) {
        self.own = None;
        self.enemies.clear();
    }

    /// Fold a freshly replaced frame into the record.
    ///
    /// Existing sightings survive only while the frame still agrees with
    /// them: the tile is in fog, or it is still held by the sighted color.
    /// Generals visible in the frame are then recorded, ours as `own` and
    /// foreign ones as new sightings for colors not yet known.
    pub fn observe(&mut self, map: &Map, me: Color) {
        let before = self.enemies.len();
        self.enemies.retain(|sighting| {
            map.get(sighting.position).is_some_and(|tile| {
                tile.tile_type == TileType::Fog || tile.is_owned_by(sighting.color)
            })
        });
        if self.enemies.len() != before {
            debug!(dropped = before - self.enemies.len(), "pruned stale General sightings");
        }

        for (position, tile) in map.iter() {
            if tile.tile_type != TileType::General {
                continue;
            }
            let Some(owner) = tile.owner else { continue };
            if owner == me {
                self.own = Some(position);
            } else if !self.has_sighting(owner) {
                debug!(color = owner, x = position.x, y = position.y, "enemy General sighted");
                self.enemies.push(EnemyGeneral {
                    position,
                    color: owner,
                });
            }
        }
    }
}
