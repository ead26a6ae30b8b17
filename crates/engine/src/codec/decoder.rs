use std::time::Instant;

use thiserror::Error;

use super::descriptor::{DESCRIPTOR_FORMAT, DESCRIPTOR_VERSION, Descriptor};
use super::image::ImageBuffer;
use crate::palette::rgb::Rgb;
use crate::palette::PaletteBuilder;
use crate::world::WorldGrid;
use crate::world::catalog::TileCatalog;
use crate::world::chunk::WorldChunk;
use crate::world::position::{ChunkPos, LocalTilePos};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(
        "unsupported descriptor {format:?} v{version}, expected {:?} v{}",
        DESCRIPTOR_FORMAT,
        DESCRIPTOR_VERSION
    )]
    UnsupportedFormat { format: String, version: u32 },
    #[error("descriptor describes an empty world")]
    EmptyDescriptor,
    #[error(
        "descriptor extent {chunks_x}x{chunks_y} chunks of {chunk_res_x}x{chunk_res_y} tiles is too large"
    )]
    ExtentOverflow {
        chunks_x: usize,
        chunks_y: usize,
        chunk_res_x: usize,
        chunk_res_y: usize,
    },
    #[error("image is {}x{}, descriptor expects {}x{}", .found.0, .found.1, .expected.0, .expected.1)]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("palette color {0} is listed more than once")]
    DuplicatePaletteColor(Rgb),
    #[error("palette tile {0:?} is listed more than once")]
    DuplicatePaletteTile(String),
    #[error("pixel ({x}, {y}) has color {rgb}, which is not in the palette")]
    UnknownColor { x: usize, y: usize, rgb: Rgb },
}

/// Rebuilds a [`WorldGrid`] from a descriptor and its background image.
///
/// The grid is assembled off to the side and only returned once every pixel
/// resolved, so a failed decode never hands out a partial world.
#[derive(Debug, Default)]
pub struct WorldDecoder;

impl WorldDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, descriptor: &Descriptor, image: &ImageBuffer) -> Result<WorldGrid, DecodeError> {
        let start = Instant::now();
        if !descriptor.is_current_format() {
            return Err(DecodeError::UnsupportedFormat {
                format: descriptor.format.clone(),
                version: descriptor.version,
            });
        }
        let res = descriptor.res();
        if res.is_empty() || descriptor.chunks_x == 0 || descriptor.chunks_y == 0 {
            return Err(DecodeError::EmptyDescriptor);
        }
        let (Some(width), Some(height)) = (descriptor.width(), descriptor.height()) else {
            return Err(DecodeError::ExtentOverflow {
                chunks_x: descriptor.chunks_x,
                chunks_y: descriptor.chunks_y,
                chunk_res_x: descriptor.chunk_res_x,
                chunk_res_y: descriptor.chunk_res_y,
            });
        };
        let expected = (width, height);
        let found = (image.width(), image.height());
        if expected != found {
            return Err(DecodeError::DimensionMismatch { expected, found });
        }

        // Inverse palette. The catalog is rebuilt in palette order, so tile
        // ids of the decoded world follow the descriptor.
        let mut catalog = TileCatalog::new();
        let mut palette = PaletteBuilder::sequential();
        for entry in &descriptor.palette {
            if catalog.get(&entry.tile).is_some() {
                return Err(DecodeError::DuplicatePaletteTile(entry.tile.clone()));
            }
            let tile = catalog.intern(&entry.tile);
            // Tiles are unique by now, so a conflict can only be the color.
            palette
                .insert(tile, entry.rgb)
                .map_err(|_| DecodeError::DuplicatePaletteColor(entry.rgb))?;
        }

        // Resolve every pixel before building chunks: the first unknown color
        // in row order is the one reported.
        let mut tiles = Vec::with_capacity(image.pixels().len());
        for (pos, rgb) in image.iter() {
            let tile = palette.lookup(rgb).ok_or(DecodeError::UnknownColor {
                x: pos.x,
                y: pos.y,
                rgb,
            })?;
            tiles.push(tile);
        }

        let chunks = (0..descriptor.chunks_x)
            .map(|cx| {
                (0..descriptor.chunks_y)
                    .map(|cy| {
                        let origin = ChunkPos::new(cx, cy);
                        let mut chunk_tiles = Vec::with_capacity(res.area());
                        for ly in 0..res.y {
                            for lx in 0..res.x {
                                let pos = origin.tile(res, LocalTilePos::new(lx, ly));
                                chunk_tiles.push(tiles[pos.y * width + pos.x]);
                            }
                        }
                        WorldChunk::from_tiles(res, chunk_tiles)
                    })
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(DecodeError::DimensionMismatch { expected, found })?;

        let grid = WorldGrid::from_columns(res, catalog, chunks);
        tracing::debug!(
            "Decoded {}x{} world: {} chunks, {} palette colors ({:.2?})",
            width,
            height,
            grid.chunk_count(),
            descriptor.palette.len(),
            start.elapsed(),
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::descriptor::PaletteEntry;
    use crate::world::chunk::ChunkRes;
    use crate::world::position::TilePos;

    fn entry(tile: &str, code: u32) -> PaletteEntry {
        PaletteEntry {
            tile: tile.into(),
            rgb: Rgb::new(code),
        }
    }

    fn two_by_two() -> (Descriptor, ImageBuffer) {
        let descriptor = Descriptor::new(
            ChunkRes::square(1),
            2,
            2,
            vec![entry("grass", 0x00ff00), entry("dirt", 0x804000)],
        );
        let mut image = ImageBuffer::new_filled(2, 2, Rgb::new(0x00ff00));
        image.set(TilePos::new(1, 0), Rgb::new(0x804000));
        (descriptor, image)
    }

    #[test]
    fn decodes_pixels_into_tiles() {
        let (descriptor, image) = two_by_two();
        let grid = WorldDecoder::new().decode(&descriptor, &image).unwrap();
        assert_eq!(grid.tile_name_at(1, 0), Ok("dirt"));
        assert_eq!(grid.tile_name_at(0, 1), Ok("grass"));
        assert_eq!(grid.chunk_count(), 4);
    }

    #[test]
    fn unknown_color_fails() {
        let (descriptor, mut image) = two_by_two();
        image.set(TilePos::new(0, 1), Rgb::new(0x123456));
        assert_eq!(
            WorldDecoder::new().decode(&descriptor, &image),
            Err(DecodeError::UnknownColor {
                x: 0,
                y: 1,
                rgb: Rgb::new(0x123456)
            })
        );
    }

    #[test]
    fn duplicate_palette_entries_fail() {
        let (mut descriptor, image) = two_by_two();
        descriptor.palette.push(entry("stone", 0x00ff00));
        assert_eq!(
            WorldDecoder::new().decode(&descriptor, &image),
            Err(DecodeError::DuplicatePaletteColor(Rgb::new(0x00ff00)))
        );

        let (mut descriptor, image) = two_by_two();
        descriptor.palette.push(entry("dirt", 0x0000ff));
        assert_eq!(
            WorldDecoder::new().decode(&descriptor, &image),
            Err(DecodeError::DuplicatePaletteTile("dirt".into()))
        );
    }

    #[test]
    fn dimension_mismatch_fails() {
        let (descriptor, _) = two_by_two();
        let image = ImageBuffer::new_filled(3, 2, Rgb::new(0x00ff00));
        assert_eq!(
            WorldDecoder::new().decode(&descriptor, &image),
            Err(DecodeError::DimensionMismatch {
                expected: (2, 2),
                found: (3, 2)
            })
        );
    }

    #[test]
    fn overflowing_extent_fails() {
        // 3 * chunks_x wraps to 1 in 64-bit arithmetic.
        let descriptor = Descriptor::new(
            ChunkRes::new(3, 1),
            0xAAAA_AAAA_AAAA_AAAB,
            1,
            vec![entry("grass", 0x000001)],
        );
        let image = ImageBuffer::new_filled(1, 1, Rgb::new(0x000001));
        assert_eq!(
            WorldDecoder::new().decode(&descriptor, &image),
            Err(DecodeError::ExtentOverflow {
                chunks_x: 0xAAAA_AAAA_AAAA_AAAB,
                chunks_y: 1,
                chunk_res_x: 3,
                chunk_res_y: 1,
            })
        );
    }

    #[test]
    fn rejects_foreign_or_empty_descriptors() {
        let (mut descriptor, image) = two_by_two();
        descriptor.version = 9;
        assert!(matches!(
            WorldDecoder::new().decode(&descriptor, &image),
            Err(DecodeError::UnsupportedFormat { version: 9, .. })
        ));

        let empty = Descriptor::new(ChunkRes::square(1), 0, 2, vec![]);
        let image = ImageBuffer::new_filled(0, 2, Rgb::new(0));
        assert_eq!(
            WorldDecoder::new().decode(&empty, &image),
            Err(DecodeError::EmptyDescriptor)
        );
    }
}
