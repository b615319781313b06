use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, OutOfBounds};
use crate::pathfinding;
use crate::room::Rect;
use crate::tile::{Tile, TileFlags};

/// Bounded, row-major store of tiles. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

/// Unvalidated wire form of a grid
#[derive(Deserialize)]
struct RawGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TryFrom<RawGrid> for TileGrid {
    type Error = String;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        if raw.width <= 0 || raw.height <= 0 {
            return Err(format!("invalid grid dimensions {}x{}", raw.width, raw.height));
        }
        let expected = raw.width as usize * raw.height as usize;
        if raw.tiles.len() != expected {
            return Err(format!(
                "{}x{} grid needs {} tiles, found {}",
                raw.width,
                raw.height,
                expected,
                raw.tiles.len()
            ));
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            tiles: raw.tiles,
        })
    }
}

impl TileGrid {
    /// Create a grid with every cell set to `fill`.
    pub fn new(width: i32, height: i32, fill: Tile) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tiles: vec![fill; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The whole grid as a rectangle anchored at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, OutOfBounds> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> OutOfBounds {
        OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Fails on empty rectangles as well as ones that leave the grid.
    fn check_rect(&self, rect: &Rect) -> Result<(), OutOfBounds> {
        if rect.fits_within(self.width, self.height) {
            return Ok(());
        }
        if rect.x < 0 || rect.y < 0 || rect.width <= 0 || rect.height <= 0 {
            Err(self.out_of_bounds(rect.x, rect.y))
        } else {
            Err(self.out_of_bounds(rect.x + rect.width - 1, rect.y + rect.height - 1))
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Tile, OutOfBounds> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), OutOfBounds> {
        let idx = self.index(x, y)?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// Walkability lookup that treats out-of-bounds as blocked
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|tile| tile.is_walkable()).unwrap_or(false)
    }

    /// Overwrite every tile in `rect`. Nothing is written unless the whole rectangle fits.
    pub fn fill_rect(&mut self, rect: &Rect, tile: Tile) -> Result<(), OutOfBounds> {
        self.check_rect(rect)?;
        for y in rect.y..rect.y + rect.height {
            let row = y as usize * self.width as usize;
            for x in rect.x..rect.x + rect.width {
                self.tiles[row + x as usize] = tile;
            }
        }
        Ok(())
    }

    /// Overwrite the outermost ring of tiles
    pub fn fill_borders(&mut self, tile: Tile) {
        let (w, h) = (self.width as usize, self.height as usize);
        for x in 0..w {
            self.tiles[x] = tile;
            self.tiles[(h - 1) * w + x] = tile;
        }
        for y in 0..h {
            self.tiles[y * w] = tile;
            self.tiles[y * w + w - 1] = tile;
        }
    }

    /// Copy out a `w` x `h` rectangle starting at (x, y).
    pub fn subgrid(&self, x: i32, y: i32, w: i32, h: i32) -> Result<TileGrid, OutOfBounds> {
        let rect = Rect::new(x, y, w, h);
        self.check_rect(&rect)?;

        let mut tiles = Vec::with_capacity(w as usize * h as usize);
        for row in y..y + h {
            let start = row as usize * self.width as usize + x as usize;
            tiles.extend_from_slice(&self.tiles[start..start + w as usize]);
        }
        Ok(TileGrid {
            width: w,
            height: h,
            tiles,
        })
    }

    /// Paste `other` with its top-left corner at (x, y).
    ///
    /// Either the whole of `other` fits and every tile is written, or an error is
    /// returned and this grid is left untouched.
    pub fn stamp(&mut self, other: &TileGrid, x: i32, y: i32) -> Result<(), OutOfBounds> {
        self.check_rect(&Rect::new(x, y, other.width, other.height))?;

        let src_width = other.width as usize;
        for row in 0..other.height as usize {
            let src = row * src_width;
            let dst = (y as usize + row) * self.width as usize + x as usize;
            self.tiles[dst..dst + src_width].copy_from_slice(&other.tiles[src..src + src_width]);
        }
        Ok(())
    }

    /// Lazily yield the coordinates of tiles matching `predicate`, in row-major order.
    ///
    /// The iterator is `Clone` whenever the predicate is, so a saved copy can be
    /// replayed from the start.
    pub fn find_tiles<P>(&self, predicate: P) -> FindTiles<'_, P>
    where
        P: Fn(&Tile) -> bool,
    {
        FindTiles {
            grid: self,
            predicate,
            next: 0,
        }
    }

    /// Row-major iteration over every tile with its coordinates
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &Tile)> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (((idx % width) as i32, (idx / width) as i32), tile))
    }

    pub fn count_matching<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Tile) -> bool,
    {
        self.tiles.iter().filter(|tile| predicate(tile)).count()
    }

    /// True only if the rectangle is non-empty, fully inside the grid, and every
    /// tile in it is walkable. Partially out-of-bounds regions are simply not walkable.
    pub fn is_region_walkable(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let rect = Rect::new(x, y, w, h);
        if !rect.fits_within(self.width, self.height) {
            return false;
        }
        (y..y + h).all(|ry| {
            let row = ry as usize * self.width as usize;
            (x..x + w).all(|rx| self.tiles[row + rx as usize].is_walkable())
        })
    }

    /// Breadth-first fill from `start` over tiles carrying `flags` (WALKABLE if `None`).
    pub fn flood_fill(&self, start: (i32, i32), flags: Option<TileFlags>) -> HashSet<(i32, i32)> {
        pathfinding::flood_fill(self, start, flags.unwrap_or(TileFlags::WALKABLE))
    }

    /// Shortest walkable path from `start` to `goal`, both included.
    /// `None` means the goal is unreachable, which is not an error.
    pub fn find_path(&self, start: (i32, i32), goal: (i32, i32)) -> Option<Vec<(i32, i32)>> {
        pathfinding::find_path(self, start, goal)
    }

    /// Manhattan distance; ignores what lies between the two points
    pub fn distance(a: (i32, i32), b: (i32, i32)) -> i32 {
        pathfinding::manhattan(a, b)
    }

    /// One line per row using [`TileType::glyph`](crate::tile::TileType::glyph)
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.tiles.chunks(self.width as usize) {
            out.extend(row.iter().map(|tile| tile.tile_type.glyph()));
            out.push('\n');
        }
        out
    }
}

/// Iterator returned by [`TileGrid::find_tiles`]
#[derive(Clone)]
pub struct FindTiles<'a, P> {
    grid: &'a TileGrid,
    predicate: P,
    next: usize,
}

impl<P> Iterator for FindTiles<'_, P>
where
    P: Fn(&Tile) -> bool,
{
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.grid.width as usize;
        while self.next < self.grid.tiles.len() {
            let idx = self.next;
            self.next += 1;
            if (self.predicate)(&self.grid.tiles[idx]) {
                return Some(((idx % width) as i32, (idx / width) as i32));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.grid.tiles.len() - self.next))
    }
}

impl<P> std::iter::FusedIterator for FindTiles<'_, P> where P: Fn(&Tile) -> bool {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileType;

    fn make_grid(width: i32, height: i32, floors: &[(i32, i32)]) -> TileGrid {
        let mut grid = TileGrid::new(width, height, Tile::wall()).unwrap();
        for &(x, y) in floors {
            grid.set(x, y, Tile::floor()).unwrap();
        }
        grid
    }

    #[test]
    fn test_new_rejects_non_positive_dimensions() {
        assert!(TileGrid::new(0, 5, Tile::wall()).is_err());
        assert!(TileGrid::new(5, -1, Tile::wall()).is_err());
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut grid = make_grid(4, 3, &[]);
        grid.set(3, 2, Tile::door()).unwrap();
        assert_eq!(grid.get(3, 2).unwrap(), Tile::door());
        assert_eq!(grid.get(0, 0).unwrap(), Tile::wall());
    }

    #[test]
    fn test_out_of_bounds_access_is_reported() {
        let mut grid = make_grid(4, 3, &[]);
        let err = grid.get(4, 0).unwrap_err();
        assert_eq!(err, OutOfBounds { x: 4, y: 0, width: 4, height: 3 });
        assert!(grid.set(-1, 1, Tile::floor()).is_err());
        assert!(grid.get(0, 3).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let grid = make_grid(3, 3, &[]);
        let mut copy = grid.clone();
        copy.set(1, 1, Tile::floor()).unwrap();
        assert_eq!(grid.get(1, 1).unwrap(), Tile::wall());
    }

    #[test]
    fn test_subgrid_copies_region() {
        let grid = make_grid(5, 5, &[(2, 2), (3, 3)]);
        let sub = grid.subgrid(2, 2, 2, 2).unwrap();
        assert_eq!(sub.width(), 2);
        assert_eq!(sub.get(0, 0).unwrap(), Tile::floor());
        assert_eq!(sub.get(1, 0).unwrap(), Tile::wall());
        assert_eq!(sub.get(1, 1).unwrap(), Tile::floor());
    }

    #[test]
    fn test_subgrid_out_of_bounds() {
        let grid = make_grid(5, 5, &[]);
        assert!(grid.subgrid(3, 3, 3, 1).is_err());
        assert!(grid.subgrid(-1, 0, 2, 2).is_err());
    }

    #[test]
    fn test_stamp_writes_whole_region() {
        let mut grid = make_grid(6, 6, &[]);
        let patch = TileGrid::new(2, 3, Tile::floor()).unwrap();
        grid.stamp(&patch, 4, 3).unwrap();
        assert!(grid.is_region_walkable(4, 3, 2, 3));
        assert_eq!(grid.count_matching(|t| t.is_walkable()), 6);
    }

    #[test]
    fn test_stamp_is_all_or_nothing() {
        let mut grid = make_grid(6, 6, &[]);
        let before = grid.clone();
        let patch = TileGrid::new(3, 3, Tile::floor()).unwrap();
        assert!(grid.stamp(&patch, 4, 4).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_find_tiles_row_major_and_restartable() {
        let grid = make_grid(4, 4, &[(3, 0), (0, 2), (1, 0)]);
        let matches = grid.find_tiles(|t| t.is(TileType::Floor));
        let saved = matches.clone();
        assert_eq!(matches.collect::<Vec<_>>(), vec![(1, 0), (3, 0), (0, 2)]);
        assert_eq!(saved.count(), 3);
    }

    #[test]
    fn test_find_tiles_by_flag() {
        let mut grid = make_grid(3, 1, &[(0, 0)]);
        grid.set(2, 0, Tile::door()).unwrap();
        let walkable: Vec<_> = grid.find_tiles(|t| t.has_flags(TileFlags::WALKABLE)).collect();
        assert_eq!(walkable, vec![(0, 0), (2, 0)]);
        let transparent: Vec<_> = grid.find_tiles(|t| t.has_flags(TileFlags::TRANSPARENT)).collect();
        assert_eq!(transparent, vec![(0, 0)]);
    }

    #[test]
    fn test_region_walkable() {
        let mut grid = make_grid(6, 6, &[]);
        grid.fill_rect(&Rect::new(1, 1, 3, 3), Tile::floor()).unwrap();
        assert!(grid.is_region_walkable(1, 1, 3, 3));
        assert!(!grid.is_region_walkable(0, 0, 3, 3));
    }

    #[test]
    fn test_region_partially_outside_is_not_walkable() {
        let grid = TileGrid::new(5, 5, Tile::floor()).unwrap();
        assert!(grid.is_region_walkable(0, 0, 5, 5));
        assert!(!grid.is_region_walkable(3, 3, 4, 4));
        assert!(!grid.is_region_walkable(-1, 0, 2, 2));
        assert!(!grid.is_region_walkable(1, 1, 0, 2));
    }

    #[test]
    fn test_fill_rect_rejects_partial() {
        let mut grid = make_grid(4, 4, &[]);
        assert!(grid.fill_rect(&Rect::new(2, 2, 3, 1), Tile::floor()).is_err());
        assert_eq!(grid.count_matching(|t| t.is_walkable()), 0);
    }

    #[test]
    fn test_fill_borders() {
        let mut grid = TileGrid::new(4, 3, Tile::floor()).unwrap();
        grid.fill_borders(Tile::wall());
        assert_eq!(grid.count_matching(|t| t.is_walkable()), 2);
        assert!(grid.is_walkable(1, 1));
        assert!(grid.is_walkable(2, 1));
    }

    #[test]
    fn test_render_ascii() {
        let mut grid = make_grid(3, 2, &[(1, 0)]);
        grid.set(2, 1, Tile::door()).unwrap();
        assert_eq!(grid.render_ascii(), "#.#\n##+\n");
    }

    #[test]
    fn test_serde_round_trip() {
        let grid = make_grid(3, 2, &[(0, 1)]);
        let json = serde_json::to_string(&grid).unwrap();
        let back: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_deserialize_rejects_wrong_tile_count() {
        let json = r#"{"width":2,"height":2,"tiles":[]}"#;
        assert!(serde_json::from_str::<TileGrid>(json).is_err());
    }
}
