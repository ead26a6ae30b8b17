use indexmap::IndexSet;

use super::tile::TileId;

/// Interns tile names into [`TileId`]s.
///
/// Ids are handed out densely in insertion order, so `TileId(n)` is the n-th
/// distinct name ever interned. Names are never removed.
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    names: IndexSet<String>,
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, registering it first if it is new.
    pub fn intern(&mut self, name: &str) -> TileId {
        if let Some(idx) = self.names.get_index_of(name) {
            return TileId(idx as u32);
        }
        let (idx, _) = self.names.insert_full(name.to_owned());
        TileId(idx as u32)
    }

    /// Look up an already-interned name.
    pub fn get(&self, name: &str) -> Option<TileId> {
        self.names.get_index_of(name).map(|idx| TileId(idx as u32))
    }

    pub fn name(&self, id: TileId) -> Option<&str> {
        self.names.get_index(id.index()).map(String::as_str)
    }

    pub fn contains(&self, id: TileId) -> bool {
        id.index() < self.names.len()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (TileId(idx as u32), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut catalog = TileCatalog::new();
        let grass = catalog.intern("grass");
        let dirt = catalog.intern("dirt");
        assert_ne!(grass, dirt);
        assert_eq!(catalog.intern("grass"), grass);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn names_resolve_both_ways() {
        let mut catalog = TileCatalog::new();
        let water = catalog.intern("water");
        assert_eq!(catalog.name(water), Some("water"));
        assert_eq!(catalog.get("water"), Some(water));
        assert_eq!(catalog.get("lava"), None);
        assert_eq!(catalog.name(TileId(7)), None);
        assert!(!catalog.contains(TileId(1)));
    }
}
