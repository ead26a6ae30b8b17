pub mod catalog;
pub mod chunk;
pub mod position;
pub mod tile;

use catalog::TileCatalog;
use chunk::{ChunkRes, WorldChunk};
use position::{ChunkPos, LocalTilePos, TilePos};
use thiserror::Error;
use tile::TileId;

/// Addressing outside the grid (or outside its catalog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutOfRange {
    #[error("chunk ({cx}, {cy}) is outside the {chunks_x}x{chunks_y} chunk grid")]
    Chunk {
        cx: usize,
        cy: usize,
        chunks_x: usize,
        chunks_y: usize,
    },
    #[error("tile ({x}, {y}) is outside the {width}x{height} world")]
    Tile {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("tile id {} is not in the catalog ({catalog_len} names)", .id.0)]
    TileId { id: TileId, catalog_len: usize },
}

/// Why a chunk layout cannot be treated as a rectangular world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("world has no chunks or a zero chunk resolution")]
    Empty,
    #[error("chunk column {column} has {found} chunks, expected {expected}")]
    Jagged {
        column: usize,
        expected: usize,
        found: usize,
    },
    #[error("chunk ({cx}, {cy}) does not match the world chunk resolution")]
    ChunkShape { cx: usize, cy: usize },
}

/// The background tile layer of a world: a grid of equally sized chunks,
/// addressed `chunks[x][y]`.
///
/// The grid owns the [`TileCatalog`] its `TileId`s refer to, so a grid is
/// meaningful on its own. Nothing here resizes the grid; `from_columns` takes
/// whatever layout the editor assembled and `shape()` judges it.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    res: ChunkRes,
    catalog: TileCatalog,
    chunks: Vec<Vec<WorldChunk>>,
}

impl WorldGrid {
    /// A rectangular `chunks_x` by `chunks_y` world with every tile set to `fill`.
    pub fn new(chunks_x: usize, chunks_y: usize, res: ChunkRes, fill: &str) -> Self {
        let mut catalog = TileCatalog::new();
        let fill = catalog.intern(fill);
        let column = vec![WorldChunk::new_filled(res, fill); chunks_y];
        Self {
            res,
            catalog,
            chunks: vec![column; chunks_x],
        }
    }

    /// Adopt an editor-built chunk layout as-is. The layout is not validated
    /// here; see [`WorldGrid::shape`].
    pub fn from_columns(res: ChunkRes, catalog: TileCatalog, chunks: Vec<Vec<WorldChunk>>) -> Self {
        Self {
            res,
            catalog,
            chunks,
        }
    }

    pub fn res(&self) -> ChunkRes {
        self.res
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Register a tile name with this world's catalog.
    pub fn intern(&mut self, name: &str) -> TileId {
        self.catalog.intern(name)
    }

    pub fn chunks_x(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk count along y, taken from the first column.
    pub fn chunks_y(&self) -> usize {
        self.chunks.first().map_or(0, Vec::len)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Width of the world in tiles.
    pub fn width(&self) -> usize {
        self.chunks_x() * self.res.x
    }

    /// Height of the world in tiles.
    pub fn height(&self) -> usize {
        self.chunks_y() * self.res.y
    }

    /// Check that the layout is a non-empty rectangle of correctly sized
    /// chunks. Returns `(chunks_x, chunks_y)`.
    pub fn shape(&self) -> Result<(usize, usize), ShapeError> {
        let chunks_x = self.chunks_x();
        let chunks_y = self.chunks_y();
        if chunks_x == 0 || chunks_y == 0 || self.res.is_empty() {
            return Err(ShapeError::Empty);
        }
        for (cx, column) in self.chunks.iter().enumerate() {
            if column.len() != chunks_y {
                return Err(ShapeError::Jagged {
                    column: cx,
                    expected: chunks_y,
                    found: column.len(),
                });
            }
            for (cy, chunk) in column.iter().enumerate() {
                if chunk.res() != self.res {
                    return Err(ShapeError::ChunkShape { cx, cy });
                }
            }
        }
        Ok((chunks_x, chunks_y))
    }

    pub fn chunk_at(&self, cx: usize, cy: usize) -> Result<&WorldChunk, OutOfRange> {
        self.chunks
            .get(cx)
            .and_then(|column| column.get(cy))
            .ok_or(OutOfRange::Chunk {
                cx,
                cy,
                chunks_x: self.chunks_x(),
                chunks_y: self.chunks_y(),
            })
    }

    pub fn chunk_at_mut(&mut self, cx: usize, cy: usize) -> Result<&mut WorldChunk, OutOfRange> {
        let (chunks_x, chunks_y) = (self.chunks_x(), self.chunks_y());
        self.chunks
            .get_mut(cx)
            .and_then(|column| column.get_mut(cy))
            .ok_or(OutOfRange::Chunk {
                cx,
                cy,
                chunks_x,
                chunks_y,
            })
    }

    /// Resolve an absolute tile coordinate to its chunk slot.
    fn locate(&self, x: usize, y: usize) -> Result<(ChunkPos, LocalTilePos), OutOfRange> {
        let out_of_range = OutOfRange::Tile {
            x,
            y,
            width: self.width(),
            height: self.height(),
        };
        if x >= self.width() || y >= self.height() {
            return Err(out_of_range);
        }
        let pos = TilePos::new(x, y);
        let chunk = pos.chunk(self.res);
        // A short column in a jagged layout has no chunk here.
        match self.chunks.get(chunk.x).and_then(|column| column.get(chunk.y)) {
            Some(found) if found.res() == self.res => Ok((chunk, pos.local(self.res))),
            _ => Err(out_of_range),
        }
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Result<TileId, OutOfRange> {
        let (chunk, local) = self.locate(x, y)?;
        Ok(self.chunks[chunk.x][chunk.y].get(local))
    }

    /// Name of the tile at an absolute coordinate.
    pub fn tile_name_at(&self, x: usize, y: usize) -> Result<&str, OutOfRange> {
        let id = self.tile_at(x, y)?;
        self.catalog.name(id).ok_or(OutOfRange::TileId {
            id,
            catalog_len: self.catalog.len(),
        })
    }

    /// Overwrite one tile in place. `tile` must come from this grid's catalog.
    pub fn set_tile(&mut self, x: usize, y: usize, tile: TileId) -> Result<(), OutOfRange> {
        if !self.catalog.contains(tile) {
            return Err(OutOfRange::TileId {
                id: tile,
                catalog_len: self.catalog.len(),
            });
        }
        let (chunk, local) = self.locate(x, y)?;
        self.chunks[chunk.x][chunk.y].set(local, tile);
        Ok(())
    }

    /// Intern `name` and place it at an absolute coordinate.
    pub fn set_tile_named(&mut self, x: usize, y: usize, name: &str) -> Result<TileId, OutOfRange> {
        // Bounds first so a bad coordinate does not grow the catalog.
        self.locate(x, y)?;
        let tile = self.catalog.intern(name);
        self.set_tile(x, y, tile)?;
        Ok(tile)
    }

    /// Iterate over all chunks in `(x, y)` order.
    pub fn iter_chunks(&self) -> impl Iterator<Item = (ChunkPos, &WorldChunk)> {
        self.chunks.iter().enumerate().flat_map(|(cx, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(cy, chunk)| (ChunkPos::new(cx, cy), chunk))
        })
    }

    /// Every tile with its absolute position: chunks in `(cx, cy)` order, then
    /// local tiles in `(lx, ly)` order. Only meaningful once `shape()` passes.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (TilePos, TileId)> {
        let res = self.res;
        self.iter_chunks().flat_map(move |(pos, chunk)| {
            let local_res = chunk.res();
            (0..local_res.x).flat_map(move |lx| {
                (0..local_res.y).map(move |ly| {
                    let local = LocalTilePos::new(lx, ly);
                    (pos.tile(res, local), chunk.get(local))
                })
            })
        })
    }

    /// Tile-for-tile comparison by tile *name*. Two grids built with different
    /// catalogs compare equal when they describe the same world.
    pub fn same_tiles(&self, other: &WorldGrid) -> bool {
        if self.res != other.res || self.chunks.len() != other.chunks.len() {
            return false;
        }
        let columns_match = self
            .chunks
            .iter()
            .zip(&other.chunks)
            .all(|(a, b)| a.len() == b.len());
        if !columns_match {
            return false;
        }
        self.iter_chunks()
            .zip(other.iter_chunks())
            .all(|((_, a), (_, b))| {
                a.res() == b.res()
                    && a.tiles().iter().zip(b.tiles()).all(|(ta, tb)| {
                        let name_a = self.catalog.name(*ta);
                        name_a.is_some() && name_a == other.catalog.name(*tb)
                    })
            })
    }
}

impl PartialEq for WorldGrid {
    fn eq(&self, other: &Self) -> bool {
        self.same_tiles(other)
    }
}
