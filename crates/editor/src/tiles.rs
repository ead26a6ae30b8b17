//! Background tile names used by the editor.
//!
//! The engine treats tile names as opaque keys; these are the ones the editor
//! paints with and that end up in saved palettes.

pub const GRASS: &str = "grass";
pub const DIRT: &str = "dirt";
pub const STONE: &str = "stone";
pub const SAND: &str = "sand";
pub const WATER: &str = "water";

/// Every tile the editor knows, in palette-picker order.
pub const ALL: [&str; 5] = [GRASS, DIRT, STONE, SAND, WATER];
