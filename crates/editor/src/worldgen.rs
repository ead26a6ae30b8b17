//! Starter world for new saves and the demo: a grass meadow with a dirt road,
//! a pond ringed by sand, and scattered stones.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tileworld_engine::world::WorldGrid;
use tileworld_engine::world::chunk::ChunkRes;

use crate::tiles;

/// Fraction of grass tiles replaced by stone.
const STONE_DENSITY: f64 = 0.01;

pub fn generate_meadow(chunks_x: usize, chunks_y: usize, res: ChunkRes, seed: u64) -> WorldGrid {
    let mut grid = WorldGrid::new(chunks_x, chunks_y, res, tiles::GRASS);
    let (width, height) = (grid.width(), grid.height());
    if width == 0 || height == 0 {
        return grid;
    }

    let dirt = grid.intern(tiles::DIRT);
    let stone = grid.intern(tiles::STONE);
    let sand = grid.intern(tiles::SAND);
    let water = grid.intern(tiles::WATER);
    let mut rng = StdRng::seed_from_u64(seed);

    let road_y = height / 2;
    let (pond_x, pond_y) = (width as f64 * 0.7, height as f64 * 0.3);
    let pond_r = (width.min(height) as f64 / 6.0).max(1.0);

    for x in 0..width {
        for y in 0..height {
            let dist = ((x as f64 - pond_x).powi(2) + (y as f64 - pond_y).powi(2)).sqrt();
            let tile = if dist < pond_r {
                water
            } else if dist < pond_r + 1.5 {
                sand
            } else if y == road_y || y == road_y + 1 {
                dirt
            } else if rng.random_bool(STONE_DENSITY) {
                stone
            } else {
                continue;
            };
            // In bounds by construction.
            let _ = grid.set_tile(x, y, tile);
        }
    }

    tracing::debug!(
        "Generated {}x{} meadow ({} chunks, seed {})",
        width,
        height,
        grid.chunk_count(),
        seed
    );
    grid
}
