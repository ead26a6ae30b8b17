/// Opaque tile identifier. The engine stores these without interpreting them.
///
/// A `TileId` is an index into the [`TileCatalog`](super::catalog::TileCatalog)
/// of the grid that issued it; the catalog maps it back to a tile name
/// ("grass", "dirt", ...). Ids from two different catalogs are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
