//! # Catalog Lookup
//!
//! The collaborator a draft asks when the user picks an inventory item for a
//! row. A lookup returns `{id, name, unit_price}`; a miss leaves the row as
//! it was.
//!
//! The SQLite-backed lookup lives in `bizdesk-db` and is async; callers there
//! fetch the item first and hand it to `DocumentDraft::apply_catalog_item`.
//! This trait covers synchronous sources (preloaded lists, tests).

use std::collections::HashMap;

use crate::types::CatalogItem;

/// Synchronous catalog lookup by id.
pub trait Catalog {
    fn lookup(&self, id: &str) -> Option<CatalogItem>;
}

/// A catalog held in memory, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: HashMap<String, CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an item.
    pub fn insert(&mut self, item: CatalogItem) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<CatalogItem> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        let mut catalog = InMemoryCatalog::new();
        for item in iter {
            catalog.insert(item);
        }
        catalog
    }
}

impl Catalog for InMemoryCatalog {
    fn lookup(&self, id: &str) -> Option<CatalogItem> {
        self.items.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_lookup_hit_and_miss() {
        let catalog: InMemoryCatalog = vec![CatalogItem {
            id: "sku-1".to_string(),
            name: "Steel bolt M8".to_string(),
            unit_price: Money::from_cents(1_250),
        }]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.lookup("sku-1").map(|i| i.unit_price),
            Some(Money::from_cents(1_250))
        );
        assert!(catalog.lookup("sku-2").is_none());
    }
}
