//! Map and tile types.

use serde::{Deserialize, Serialize};

use crate::error::WireError;
use crate::game::Color;

/// Orthogonal step offsets, in the order neighbors are explored.
const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Largest accepted map side, in tiles.
pub const MAX_SIDE: u16 = 1024;

/// Diagonal step offsets, appended to [`DIRECTIONS`] for the 8-neighborhood.
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Step by a signed offset, staying inside a `width` x `height` grid.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, width: u16, height: u16) -> Option<Self> {
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        if x < 0 || y < 0 || x >= i32::from(width) || y >= i32::from(height) {
            return None;
        }
        Some(Self::new(u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    /// Get adjacent positions (left, down, right, up).
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid positions in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(&self, width: u16, height: u16) -> ([Position; 4], u8) {
        let mut result = [*self; 4];
        let mut count = 0u8;
        for (dx, dy) in DIRECTIONS {
            if let Some(pos) = self.offset(dx, dy, width, height) {
                result[usize::from(count)] = pos;
                count += 1;
            }
        }
        (result, count)
    }

    /// Iterate over the 8-neighborhood: the four adjacent positions first,
    /// then the diagonals.
    pub fn surrounding(self, width: u16, height: u16) -> impl Iterator<Item = Position> {
        DIRECTIONS
            .into_iter()
            .chain(DIAGONALS)
            .filter_map(move |(dx, dy)| self.offset(dx, dy, width, height))
    }

    /// Manhattan distance to another position.
    #[must_use]
    pub fn distance(self, other: Position) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

/// Type of terrain on a tile, as far as the observer can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileType {
    /// Not currently observed; the terrain is unknown.
    Fog = 0,
    /// Open land.
    Plain = 1,
    /// Impassable terrain.
    Mountain = 2,
    /// An unobserved tile known to be a Mountain or a City.
    Obstacle = 3,
    /// Army-producing structure; must be captured before routing through it.
    City = 4,
    /// A player's crown tile.
    General = 5,
}

impl TileType {
    /// Check if armies can route through this tile.
    ///
    /// Mountains and unresolved obstacles never are. Cities are excluded
    /// too when `avoid_cities` is set.
    #[must_use]
    pub const fn is_passable(self, avoid_cities: bool) -> bool {
        match self {
            TileType::Mountain | TileType::Obstacle => false,
            TileType::City => !avoid_cities,
            TileType::Fog | TileType::Plain | TileType::General => true,
        }
    }

    /// Check if this tile type reveals the underlying terrain.
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        !matches!(self, TileType::Fog | TileType::Obstacle)
    }
}

impl TryFrom<u8> for TileType {
    type Error = WireError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => TileType::Fog,
            1 => TileType::Plain,
            2 => TileType::Mountain,
            3 => TileType::Obstacle,
            4 => TileType::City,
            5 => TileType::General,
            other => return Err(WireError::UnknownTileType(other)),
        })
    }
}

/// Wire form of a tile: `[type, owner-or-null, army-or-null]`.
type TileTuple = (u8, Option<Color>, Option<u32>);

/// A single observed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TileTuple", into = "TileTuple")]
pub struct Tile {
    /// Type of terrain.
    pub tile_type: TileType,
    /// Owner of this tile (None = neutral or unknown).
    pub owner: Option<Color>,
    /// Army count stationed on this tile, when known.
    pub army: Option<u32>,
}

impl Tile {
    /// Create an unowned tile with the given type and no known army.
    #[must_use]
    pub const fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            owner: None,
            army: None,
        }
    }

    /// Create a fog tile.
    #[must_use]
    pub const fn fog() -> Self {
        Self::new(TileType::Fog)
    }

    /// Create a mountain tile.
    #[must_use]
    pub const fn mountain() -> Self {
        Self::new(TileType::Mountain)
    }

    /// Create a tile with a known army and optional owner.
    #[must_use]
    pub const fn with_army(tile_type: TileType, owner: Option<Color>, army: u32) -> Self {
        Self {
            tile_type,
            owner,
            army: Some(army),
        }
    }

    /// Army count, treating an unknown army as empty.
    #[must_use]
    pub fn army_count(&self) -> i64 {
        i64::from(self.army.unwrap_or(0))
    }

    /// Check if the tile belongs to `color`.
    #[must_use]
    pub fn is_owned_by(&self, color: Color) -> bool {
        self.owner == Some(color)
    }

    /// Check if the tile belongs to a player other than `color`.
    #[must_use]
    pub fn is_foreign_to(&self, color: Color) -> bool {
        self.owner.is_some_and(|owner| owner != color)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::fog()
    }
}

impl TryFrom<TileTuple> for Tile {
    type Error = WireError;

    fn try_from((code, owner, army): TileTuple) -> Result<Self, Self::Error> {
        Ok(Self {
            tile_type: TileType::try_from(code)?,
            owner,
            army,
        })
    }
}

impl From<Tile> for TileTuple {
    fn from(tile: Tile) -> Self {
        (tile.tile_type as u8, tile.owner, tile.army)
    }
}

/// The observed game map.
///
/// Tiles are stored column by column (`x * height + y`), the same layout the
/// server uses for its flattened frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    /// Width of the map in tiles.
    width: u16,
    /// Height of the map in tiles.
    height: u16,
    /// Tiles of the latest frame.
    tiles: Vec<Tile>,
    /// Whether each tile has ever been revealed. Never reset.
    visible: Vec<bool>,
}

impl Map {
    /// Create a new map with every tile in fog and nothing seen yet.
    ///
    /// Returns `None` if width or height is zero or exceeds [`MAX_SIDE`].
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            tiles: vec![Tile::fog(); size],
            visible: vec![false; size],
        })
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of tiles on the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false: a map has at least one tile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get the raw tiles slice in storage order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if a position is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Convert a position to a storage index.
    #[must_use]
    #[inline]
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(usize::from(pos.x) * usize::from(self.height) + usize::from(pos.y))
        } else {
            None
        }
    }

    /// Convert a storage index back to a position.
    ///
    /// Both coordinates are bounded by the `u16` dimensions for any index
    /// below [`Map::len`].
    #[must_use]
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn position_of(&self, index: usize) -> Position {
        let height = usize::from(self.height);
        Position::new((index / height) as u16, (index % height) as u16)
    }

    /// Get a reference to the tile at the given position.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index_of(pos).map(|idx| &self.tiles[idx])
    }

    /// Set the tile at the given position.
    ///
    /// Returns `false` if the position is out of bounds. Visibility is not
    /// touched; it only changes through [`Map::replace_frame`].
    pub fn set(&mut self, pos: Position, tile: Tile) -> bool {
        if let Some(idx) = self.index_of(pos) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// Check if the tile at `pos` has ever been revealed.
    #[must_use]
    pub fn is_visible(&self, pos: Position) -> bool {
        self.index_of(pos).is_some_and(|idx| self.visible[idx])
    }

    /// Check if the tile at `pos` is owned by `color`.
    #[must_use]
    pub fn is_owned_by(&self, pos: Position, color: Color) -> bool {
        self.get(pos).is_some_and(|tile| tile.is_owned_by(color))
    }

    /// Replace every tile with a dense frame and fold it into the visibility record.
    ///
    /// Returns `false` (and changes nothing) if the frame size does not match.
    pub fn replace_frame(&mut self, frame: Vec<Tile>) -> bool {
        if frame.len() != self.tiles.len() {
            return false;
        }
        for (seen, tile) in self.visible.iter_mut().zip(&frame) {
            if !*seen && tile.tile_type.is_revealed() {
                *seen = true;
            }
        }
        self.tiles = frame;
        true
    }

    /// Iterate over all positions and tiles in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, tile)| (self.position_of(idx), tile))
    }

    /// Get all tiles owned by a specific player.
    pub fn tiles_owned_by(&self, color: Color) -> impl Iterator<Item = (Position, &Tile)> {
        self.iter().filter(move |(_, tile)| tile.is_owned_by(color))
    }

    /// Sum total army across all tiles owned by a player.
    #[must_use]
    pub fn total_army(&self, color: Color) -> i64 {
        self.tiles_owned_by(color).map(|(_, tile)| tile.army_count()).sum()
    }
}
