use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use super::descriptor::{Descriptor, PaletteEntry};
use super::image::ImageBuffer;
use crate::palette::rgb::Rgb;
use crate::palette::{PaletteBuilder, PaletteConfig, PaletteError};
use crate::world::tile::TileId;
use crate::world::{OutOfRange, ShapeError, WorldGrid};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("world has no chunks, no image can be sized")]
    EmptyGrid,
    #[error("chunk column {column} has {found} chunks, expected {expected}")]
    JaggedGrid {
        column: usize,
        expected: usize,
        found: usize,
    },
    #[error("chunk ({cx}, {cy}) does not match the world chunk resolution")]
    ChunkShape { cx: usize, cy: usize },
    #[error("tile id {} at ({x}, {y}) is not in the world catalog", .tile.0)]
    UnknownTile { tile: TileId, x: usize, y: usize },
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
}

impl From<ShapeError> for EncodeError {
    fn from(err: ShapeError) -> Self {
        match err {
            ShapeError::Empty => EncodeError::EmptyGrid,
            ShapeError::Jagged {
                column,
                expected,
                found,
            } => EncodeError::JaggedGrid {
                column,
                expected,
                found,
            },
            ShapeError::ChunkShape { cx, cy } => EncodeError::ChunkShape { cx, cy },
        }
    }
}

/// Turns a [`WorldGrid`] into a background image and its descriptor.
///
/// Encoding runs in two phases. The palette phase walks every tile on one
/// thread (chunks in `(cx, cy)` order, tiles in `(lx, ly)` order) and assigns
/// codes in first-seen order. With the palette frozen, the raster phase fills
/// image rows in parallel.
pub struct WorldEncoder {
    config: PaletteConfig,
    parallel: bool,
}

impl WorldEncoder {
    pub fn new(config: PaletteConfig) -> Self {
        Self {
            config,
            parallel: true,
        }
    }

    /// Fill the raster on the calling thread only.
    pub fn single_threaded(self) -> Self {
        Self {
            parallel: false,
            ..self
        }
    }

    pub fn encode(&self, grid: &WorldGrid) -> Result<(ImageBuffer, Descriptor), EncodeError> {
        let start = Instant::now();
        let (chunks_x, chunks_y) = grid.shape()?;
        let catalog = grid.catalog();

        // ── Palette phase (sequential: assignment order is shared state) ──
        let mut palette = PaletteBuilder::new(&self.config);
        for (pos, tile) in grid.iter_tiles() {
            if !catalog.contains(tile) {
                return Err(EncodeError::UnknownTile {
                    tile,
                    x: pos.x,
                    y: pos.y,
                });
            }
            palette.assign(tile)?;
        }

        // Dense TileId → Rgb table. Every tile in the grid was assigned above,
        // so catalog names that never appear keep the placeholder.
        let mut lut = vec![Rgb::new(0); catalog.len()];
        for (tile, rgb) in palette.entries() {
            lut[tile.index()] = rgb;
        }

        // ── Raster phase ─────────────────────────────────────────────────
        let width = grid.width();
        let mut image = ImageBuffer::new_filled(width, grid.height(), Rgb::new(0));
        let fill_row = |(y, row): (usize, &mut [Rgb])| -> Result<(), EncodeError> {
            for (x, px) in row.iter_mut().enumerate() {
                *px = lut[grid.tile_at(x, y)?.index()];
            }
            Ok(())
        };
        if self.parallel {
            image
                .pixels_mut()
                .par_chunks_mut(width)
                .enumerate()
                .try_for_each(fill_row)?;
        } else {
            image
                .pixels_mut()
                .chunks_mut(width)
                .enumerate()
                .try_for_each(fill_row)?;
        }

        let entries = palette
            .entries()
            .map(|(tile, rgb)| {
                catalog
                    .name(tile)
                    .map(|name| PaletteEntry {
                        tile: name.to_owned(),
                        rgb,
                    })
                    .ok_or(OutOfRange::TileId {
                        id: tile,
                        catalog_len: catalog.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let descriptor = Descriptor::new(grid.res(), chunks_x, chunks_y, entries);

        tracing::debug!(
            "Encoded {}x{} world: {} chunks, {} palette colors{} ({:.2?})",
            image.width(),
            image.height(),
            chunks_x * chunks_y,
            palette.len(),
            if palette.is_sequential() { ", sequential codes" } else { "" },
            start.elapsed(),
        );
        Ok((image, descriptor))
    }
}

impl Default for WorldEncoder {
    fn default() -> Self {
        Self::new(PaletteConfig::default())
    }
}
