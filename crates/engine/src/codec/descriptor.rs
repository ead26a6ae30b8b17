use serde::{Deserialize, Serialize};

use crate::palette::rgb::Rgb;
use crate::world::chunk::ChunkRes;

/// Format tag written into every descriptor.
pub const DESCRIPTOR_FORMAT: &str = "tileworld";
/// Descriptor layout version.
pub const DESCRIPTOR_VERSION: u32 = 1;

/// One palette row: a tile name and the color that stands for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub tile: String,
    pub rgb: Rgb,
}

/// Sidecar record for a background image: grid parameters plus the palette.
///
/// Everything needed to turn the image back into a world; no other context
/// is consulted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub format: String,
    pub version: u32,
    pub chunk_res_x: usize,
    pub chunk_res_y: usize,
    pub chunks_x: usize,
    pub chunks_y: usize,
    pub palette: Vec<PaletteEntry>,
}

impl Descriptor {
    pub fn new(res: ChunkRes, chunks_x: usize, chunks_y: usize, palette: Vec<PaletteEntry>) -> Self {
        Self {
            format: DESCRIPTOR_FORMAT.to_owned(),
            version: DESCRIPTOR_VERSION,
            chunk_res_x: res.x,
            chunk_res_y: res.y,
            chunks_x,
            chunks_y,
            palette,
        }
    }

    pub fn res(&self) -> ChunkRes {
        ChunkRes::new(self.chunk_res_x, self.chunk_res_y)
    }

    /// Expected image width in pixels, `None` if it does not fit a `usize`.
    pub fn width(&self) -> Option<usize> {
        self.chunks_x.checked_mul(self.chunk_res_x)
    }

    /// Expected image height in pixels, `None` if it does not fit a `usize`.
    pub fn height(&self) -> Option<usize> {
        self.chunks_y.checked_mul(self.chunk_res_y)
    }

    pub fn is_current_format(&self) -> bool {
        self.format == DESCRIPTOR_FORMAT && self.version == DESCRIPTOR_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_layout() {
        let descriptor = Descriptor::new(
            ChunkRes::new(4, 2),
            3,
            1,
            vec![PaletteEntry {
                tile: "grass".into(),
                rgb: Rgb::new(0x3a7f12),
            }],
        );
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["format"], "tileworld");
        assert_eq!(json["chunk_res_x"], 4);
        assert_eq!(json["palette"][0]["tile"], "grass");
        assert_eq!(json["palette"][0]["rgb"], "#3a7f12");
        assert_eq!((descriptor.width(), descriptor.height()), (Some(12), Some(2)));
    }

    #[test]
    fn extent_overflow_is_none() {
        let descriptor = Descriptor::new(ChunkRes::new(3, 1), usize::MAX / 2, 1, vec![]);
        assert_eq!(descriptor.width(), None);
        assert_eq!(descriptor.height(), Some(1));
    }

    #[test]
    fn rejects_malformed_color() {
        let text = r#"{"format":"tileworld","version":1,"chunk_res_x":1,"chunk_res_y":1,
            "chunks_x":1,"chunks_y":1,"palette":[{"tile":"grass","rgb":"green"}]}"#;
        assert!(serde_json::from_str::<Descriptor>(text).is_err());
    }
}
