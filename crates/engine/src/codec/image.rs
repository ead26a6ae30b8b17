use crate::palette::rgb::Rgb;
use crate::world::position::TilePos;

/// Row-major raster of 24-bit codes, one pixel per tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl ImageBuffer {
    pub fn new_filled(width: usize, height: usize, rgb: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; width * height],
        }
    }

    /// Wrap row-major pixels. Returns `None` if the count is not `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Unpack tightly packed 8-bit RGB triples (the layout PNG decoders hand back).
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width * height * 3 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|px| Rgb::from_bytes([px[0], px[1], px[2]]))
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Tightly packed 8-bit RGB triples, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|rgb| rgb.to_bytes()).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, pos: TilePos) -> Option<Rgb> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some(self.pixels[pos.y * self.width + pos.x])
    }

    pub fn set(&mut self, pos: TilePos, rgb: Rgb) -> bool {
        if pos.x >= self.width || pos.y >= self.height {
            return false;
        }
        self.pixels[pos.y * self.width + pos.x] = rgb;
        true
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Pixels with their positions, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, Rgb)> {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, &rgb)| (TilePos::new(i % width, i / width), rgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_layout_is_row_major() {
        let mut image = ImageBuffer::new_filled(2, 2, Rgb::new(0));
        assert!(image.set(TilePos::new(1, 0), Rgb::new(0x010203)));
        assert!(!image.set(TilePos::new(2, 0), Rgb::new(0x010203)));
        let bytes = image.to_rgb8();
        assert_eq!(&bytes[3..6], &[1, 2, 3]);
        let back = ImageBuffer::from_rgb8(2, 2, &bytes).unwrap();
        assert_eq!(back, image);
        assert!(ImageBuffer::from_rgb8(2, 2, &bytes[..9]).is_none());
    }

    #[test]
    fn iter_reports_positions() {
        let image = ImageBuffer::new_filled(3, 2, Rgb::new(5));
        let last = image.iter().last().unwrap();
        assert_eq!(last, (TilePos::new(2, 1), Rgb::new(5)));
        assert_eq!(image.get(TilePos::new(0, 2)), None);
    }
}
