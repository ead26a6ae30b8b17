//! Chunked 2D tile worlds and their palette-image encoding.
//!
//! [`world`] holds the tile grid, [`palette`] the tile ↔ color bijection, and
//! [`codec`] the encoder/decoder pair that turns a grid into an image plus a
//! descriptor and back. The crate never performs I/O.

pub mod codec;
pub mod palette;
pub mod world;
