//! Palette-image world codec.
//!
//! A world's background layer is stored as two artifacts: an [`ImageBuffer`]
//! with one pixel per tile, and a [`Descriptor`] holding the grid parameters
//! and the palette that maps pixel colors back to tile names. Nothing in this
//! module touches storage; writing the artifacts is up to the caller.

pub mod decoder;
pub mod descriptor;
pub mod encoder;
pub mod image;

use crate::palette::PaletteConfig;
use crate::world::WorldGrid;

pub use decoder::{DecodeError, WorldDecoder};
pub use descriptor::{Descriptor, PaletteEntry};
pub use encoder::{EncodeError, WorldEncoder};
pub use image::ImageBuffer;

/// Encode `grid` into its image and descriptor.
pub fn save(grid: &WorldGrid, config: &PaletteConfig) -> Result<(ImageBuffer, Descriptor), EncodeError> {
    WorldEncoder::new(config.clone()).encode(grid)
}

/// Rebuild a world from a descriptor and its image.
pub fn load(descriptor: &Descriptor, image: &ImageBuffer) -> Result<WorldGrid, DecodeError> {
    WorldDecoder::new().decode(descriptor, image)
}
