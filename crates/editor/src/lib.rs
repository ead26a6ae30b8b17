//! World editor persistence on top of `tileworld-engine`.
//!
//! The engine turns a world into an image and a descriptor; this crate gives
//! those a byte format (PNG and JSON), publishes them to disk as one unit and
//! reads them back.

pub mod config;
pub mod persistence;
pub mod raster;
pub mod tiles;
pub mod worldgen;
