use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Wall,
    Floor,
    Door,
}

impl TileType {
    /// Single character used by ASCII dumps
    pub fn glyph(&self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Door => '+',
        }
    }
}

bitflags! {
    /// Per-tile properties consulted by the search primitives.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileFlags: u8 {
        const WALKABLE = 1;
        const TRANSPARENT = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    pub flags: TileFlags,
}

impl Tile {
    pub fn new(tile_type: TileType, flags: TileFlags) -> Self {
        Self { tile_type, flags }
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall, TileFlags::empty())
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor, TileFlags::WALKABLE | TileFlags::TRANSPARENT)
    }

    /// Doors can be walked through but block sight
    pub fn door() -> Self {
        Self::new(TileType::Door, TileFlags::WALKABLE)
    }

    pub fn is(&self, tile_type: TileType) -> bool {
        self.tile_type == tile_type
    }

    /// True if every flag in `flags` is set on this tile
    pub fn has_flags(&self, flags: TileFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn is_walkable(&self) -> bool {
        self.has_flags(TileFlags::WALKABLE)
    }

    pub fn blocks_vision(&self) -> bool {
        !self.has_flags(TileFlags::TRANSPARENT)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::wall()
    }
}
