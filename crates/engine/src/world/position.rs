use super::chunk::ChunkRes;

/// Absolute tile position in the world (and pixel position in the encoded image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub x: usize,
    pub y: usize,
}

impl TilePos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The chunk this tile belongs to.
    pub const fn chunk(&self, res: ChunkRes) -> ChunkPos {
        ChunkPos {
            x: self.x / res.x,
            y: self.y / res.y,
        }
    }

    /// Position within the chunk (0..res.x, 0..res.y).
    pub const fn local(&self, res: ChunkRes) -> LocalTilePos {
        LocalTilePos {
            x: self.x % res.x,
            y: self.y % res.y,
        }
    }
}

/// Chunk position in the chunk grid (`chunks[x][y]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: usize,
    pub y: usize,
}

impl ChunkPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub const fn tile_origin(&self, res: ChunkRes) -> TilePos {
        TilePos::new(self.x * res.x, self.y * res.y)
    }

    /// Absolute position of a tile inside this chunk.
    pub const fn tile(&self, res: ChunkRes, local: LocalTilePos) -> TilePos {
        TilePos::new(self.x * res.x + local.x, self.y * res.y + local.y)
    }
}

/// Tile position local to a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTilePos {
    pub x: usize,
    pub y: usize,
}

impl LocalTilePos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}
