//! Sparse frame diffs as sent by the game server.
//!
//! A diff is a flat JSON array alternating an absolute cell index and a tile
//! tuple: `[12, [1, 2, 5], 40, [0, null, null], ...]`. Cells not named by
//! the diff are in fog for this frame.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::WireError;
use crate::game::{Map, Tile};

/// A decoded frame diff: `(cell index, tile)` pairs in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct MapDiff {
    entries: Vec<(usize, Tile)>,
}

impl MapDiff {
    /// Build a diff from explicit entries.
    #[must_use]
    pub fn new(entries: Vec<(usize, Tile)>) -> Self {
        Self { entries }
    }

    /// Build the diff that reproduces `map`'s current frame exactly.
    ///
    /// Fog tiles are left out since an absent cell decodes as fog.
    #[must_use]
    pub fn from_map(map: &Map) -> Self {
        let entries = map
            .tiles()
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile != Tile::fog())
            .map(|(idx, tile)| (idx, *tile))
            .collect();
        Self { entries }
    }

    /// The `(index, tile)` pairs in wire order.
    #[must_use]
    pub fn entries(&self) -> &[(usize, Tile)] {
        &self.entries
    }

    /// Expand into a dense frame of `len` tiles.
    ///
    /// Later entries for the same index win. Indices past the end of the
    /// frame are skipped.
    #[must_use]
    pub fn expand(&self, len: usize) -> Vec<Tile> {
        let mut frame = vec![Tile::fog(); len];
        for &(idx, tile) in &self.entries {
            if let Some(slot) = frame.get_mut(idx) {
                *slot = tile;
            } else {
                warn!(index = idx, len, "diff index outside the map, skipped");
            }
        }
        frame
    }
}

impl TryFrom<Vec<Value>> for MapDiff {
    type Error = WireError;

    fn try_from(values: Vec<Value>) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(values.len() / 2);
        let mut iter = values.into_iter().enumerate();
        while let Some((position, index)) = iter.next() {
            let Some(raw) = index.as_u64() else {
                return Err(WireError::BadIndex {
                    position,
                    found: index.to_string(),
                });
            };
            let Some((position, tile)) = iter.next() else {
                return Err(WireError::DanglingIndex(raw));
            };
            let index = usize::try_from(raw).map_err(|_| WireError::BadIndex {
                position: position - 1,
                found: raw.to_string(),
            })?;
            let tile = serde_json::from_value::<Tile>(tile).map_err(|e| WireError::BadTile {
                position,
                reason: e.to_string(),
            })?;
            entries.push((index, tile));
        }
        Ok(Self { entries })
    }
}
