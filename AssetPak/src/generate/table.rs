//! Name-keyed asset table

use indexmap::IndexMap;

use crate::discovery::Asset;

/// Discovered assets keyed by logical name.
///
/// Duplicate names are last-write-wins: a later asset replaces the earlier
/// one but keeps the slot where the name first appeared, so rendering order
/// stays tied to discovery order.
#[derive(Debug, Default, Clone)]
pub struct AssetTable {
    assets: IndexMap<String, Asset>,
    hash_names: IndexMap<String, String>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset, returning the one it shadowed, if any.
    pub fn insert(&mut self, asset: Asset) -> Option<Asset> {
        if let Some(original) = &asset.original_name {
            self.hash_names.insert(original.clone(), asset.name.clone());
        }
        let shadowed = self.assets.insert(asset.name.clone(), asset);
        if let Some(old) = &shadowed {
            tracing::warn!("Duplicate asset name {:?}; {:?} replaces it", old.name, old.path);
        }
        shadowed
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    /// Hashed name for an original name.
    pub fn hashed_name(&self, original: &str) -> Option<&str> {
        self.hash_names.get(original).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// `(original, hashed)` pairs in first-seen order.
    pub fn hash_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hash_names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<Asset> for AssetTable {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut table = Self::new();
        for asset in iter {
            table.insert(asset);
        }
        table
    }
}
