use super::position::LocalTilePos;
use super::tile::TileId;

/// Default tiles along each axis of a chunk.
pub const DEFAULT_CHUNK_RES: usize = 50;

/// Chunk resolution in tiles. Shared by every chunk of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRes {
    pub x: usize,
    pub y: usize,
}

impl ChunkRes {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub const fn square(side: usize) -> Self {
        Self::new(side, side)
    }

    /// Tiles in one chunk.
    pub const fn area(&self) -> usize {
        self.x * self.y
    }

    pub const fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0
    }
}

impl Default for ChunkRes {
    fn default() -> Self {
        Self::square(DEFAULT_CHUNK_RES)
    }
}

/// A fixed-size, fully populated block of tiles.
///
/// Stored as a flat array in row order (`ly * res.x + lx`). The resolution is
/// fixed at construction; only tile values change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldChunk {
    res: ChunkRes,
    tiles: Box<[TileId]>,
}

impl WorldChunk {
    pub fn new_filled(res: ChunkRes, tile: TileId) -> Self {
        Self {
            res,
            tiles: vec![tile; res.area()].into_boxed_slice(),
        }
    }

    /// Build a chunk from row-ordered tiles. Returns `None` if the tile count
    /// does not match `res`.
    pub fn from_tiles(res: ChunkRes, tiles: Vec<TileId>) -> Option<Self> {
        if tiles.len() != res.area() {
            return None;
        }
        Some(Self {
            res,
            tiles: tiles.into_boxed_slice(),
        })
    }

    #[inline]
    const fn index(&self, pos: LocalTilePos) -> usize {
        pos.y * self.res.x + pos.x
    }

    pub const fn res(&self) -> ChunkRes {
        self.res
    }

    /// Panics if `pos` lies outside the chunk; `WorldGrid` bounds-checks first.
    #[inline]
    pub fn get(&self, pos: LocalTilePos) -> TileId {
        self.tiles[self.index(pos)]
    }

    #[inline]
    pub fn set(&mut self, pos: LocalTilePos, tile: TileId) {
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn fill(&mut self, tile: TileId) {
        self.tiles.fill(tile);
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Does every tile in the chunk hold `tile`?
    pub fn is_uniform(&self, tile: TileId) -> bool {
        self.tiles.iter().all(|t| *t == tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let res = ChunkRes::new(3, 2);
        let mut chunk = WorldChunk::new_filled(res, TileId(0));
        chunk.set(LocalTilePos::new(2, 1), TileId(4));
        assert_eq!(chunk.get(LocalTilePos::new(2, 1)), TileId(4));
        assert_eq!(chunk.get(LocalTilePos::new(1, 1)), TileId(0));
        assert_eq!(chunk.tiles()[5], TileId(4));
        assert!(!chunk.is_uniform(TileId(0)));
    }

    #[test]
    fn from_tiles_checks_length() {
        let res = ChunkRes::square(2);
        assert!(WorldChunk::from_tiles(res, vec![TileId(0); 3]).is_none());
        assert!(WorldChunk::from_tiles(res, vec![TileId(0); 4]).is_some());
    }
}
