//! Tile → color palette for the background image.
//!
//! A [`PaletteBuilder`] hands every distinct [`TileId`] a unique 24-bit code
//! the first time the tile is seen. Codes are drawn at random (rejection
//! sampled against the codes already in use) until the palette grows past a
//! threshold, or a single tile collides too often, after which a sequential
//! counter takes over. The counter only
//! moves forward and skips used codes, so a session never retries a code
//! twice and the whole 2^24 space is visited at most once.

pub mod rgb;

use std::collections::HashMap;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::world::tile::TileId;
use rgb::{RGB_SPACE, Rgb};

/// Palette size at which random allocation gives way to sequential allocation.
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 1 << 20;

/// Default for [`PaletteConfig::max_draws`].
pub const MAX_DRAWS_PER_ASSIGN: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("all {} color codes are in use", RGB_SPACE)]
    Exhausted,
    #[error("color {rgb} already belongs to tile {}", .owner.0)]
    ColorTaken { rgb: Rgb, owner: TileId },
    #[error("tile {} already has color {existing}", .tile.0)]
    TileTaken { tile: TileId, existing: Rgb },
}

/// How a [`PaletteBuilder`] allocates codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteConfig {
    /// Once more than this many codes are in use, allocation turns sequential.
    pub fallback_threshold: usize,
    /// Random candidates drawn for a single tile before the builder gives up
    /// on random allocation for good.
    pub max_draws: u32,
    /// Seed for the random source. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Allocate sequentially from the start (byte-stable output across runs).
    pub sequential: bool,
}

impl PaletteConfig {
    pub fn new() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            max_draws: MAX_DRAWS_PER_ASSIGN,
            seed: None,
            sequential: false,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new()
        }
    }

    pub fn sequential() -> Self {
        Self {
            sequential: true,
            ..Self::new()
        }
    }

    pub fn with_fallback_threshold(self, fallback_threshold: usize) -> Self {
        Self {
            fallback_threshold,
            ..self
        }
    }

    pub fn with_max_draws(self, max_draws: u32) -> Self {
        Self { max_draws, ..self }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Bijective `TileId ↔ Rgb` mapping for one encode or decode session.
pub struct PaletteBuilder {
    /// Tile → code, in first-seen order.
    codes: IndexMap<TileId, Rgb>,
    /// Code → tile; doubles as the used-code set.
    tiles: HashMap<Rgb, TileId>,
    rng: StdRng,
    fallback_threshold: usize,
    max_draws: u32,
    sequential: bool,
    next_code: u32,
}

impl PaletteBuilder {
    pub fn new(config: &PaletteConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            codes: IndexMap::new(),
            tiles: HashMap::new(),
            rng,
            fallback_threshold: config.fallback_threshold,
            max_draws: config.max_draws,
            sequential: config.sequential,
            next_code: 0,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(&PaletteConfig::seeded(seed))
    }

    pub fn sequential() -> Self {
        Self::new(&PaletteConfig::sequential())
    }

    /// The code for `tile`, allocating one if the tile is new. Idempotent.
    pub fn assign(&mut self, tile: TileId) -> Result<Rgb, PaletteError> {
        if let Some(&rgb) = self.codes.get(&tile) {
            return Ok(rgb);
        }

        if !self.sequential && self.tiles.len() > self.fallback_threshold {
            tracing::warn!(
                "Palette reached {} colors, switching to sequential allocation",
                self.tiles.len()
            );
            self.sequential = true;
        }

        let rgb = if self.sequential {
            self.next_sequential()?
        } else {
            match self.draw_random() {
                Some(rgb) => rgb,
                None => {
                    tracing::warn!(
                        "{} random draws collided at {} colors, switching to sequential allocation",
                        self.max_draws,
                        self.tiles.len()
                    );
                    self.sequential = true;
                    self.next_sequential()?
                }
            }
        };

        self.codes.insert(tile, rgb);
        self.tiles.insert(rgb, tile);
        Ok(rgb)
    }

    /// Record a known `(tile, rgb)` pair, as read back from a descriptor.
    /// Fails if either side is already mapped.
    pub fn insert(&mut self, tile: TileId, rgb: Rgb) -> Result<(), PaletteError> {
        if let Some(&owner) = self.tiles.get(&rgb) {
            return Err(PaletteError::ColorTaken { rgb, owner });
        }
        if let Some(&existing) = self.codes.get(&tile) {
            return Err(PaletteError::TileTaken { tile, existing });
        }
        self.codes.insert(tile, rgb);
        self.tiles.insert(rgb, tile);
        Ok(())
    }

    /// Inverse query: which tile owns `rgb`?
    pub fn lookup(&self, rgb: Rgb) -> Option<TileId> {
        self.tiles.get(&rgb).copied()
    }

    pub fn code_of(&self, tile: TileId) -> Option<Rgb> {
        self.codes.get(&tile).copied()
    }

    /// All assignments in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (TileId, Rgb)> {
        self.codes.iter().map(|(&tile, &rgb)| (tile, rgb))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Has allocation switched to (or started in) sequential mode?
    pub fn is_sequential(&self) -> bool {
        self.sequential
    }

    fn draw_random(&mut self) -> Option<Rgb> {
        (0..self.max_draws)
            .map(|_| Rgb::new(self.rng.random_range(0..RGB_SPACE)))
            .find(|candidate| !self.tiles.contains_key(candidate))
    }

    fn next_sequential(&mut self) -> Result<Rgb, PaletteError> {
        while self.next_code < RGB_SPACE {
            let candidate = Rgb::new(self.next_code);
            self.next_code += 1;
            if !self.tiles.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(PaletteError::Exhausted)
    }
}
