//! # Catalog Store
//!
//! Owns the single mutable [`Catalog`] and keeps `catalog.json` in step with it.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item("Drinks", "Soda", 15)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Catalog::add_item ──── Err ──► StoreError::Core, nothing changed       │
//! │       │ Ok                                                              │
//! │       ▼                                                                 │
//! │  save_json(catalog.json) ── Err ──► StoreError::Persist                 │
//! │       │ Ok                          (in-memory change stays applied)    │
//! │       ▼                                                                 │
//! │  Ok(())                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers get `&Catalog`, so the only way to change it is through this type.

use std::path::{Path, PathBuf};

use tilly_core::{Catalog, CoreResult, IntoPrice, UnitPrice};
use tracing::{debug, error, info, warn};

use crate::error::StoreResult;
use crate::json_file::{load_json_if_exists, save_json};

/// Menu written on first start.
pub const DEFAULT_MENU: &[(&str, &[(&str, i32)])] = &[
    (
        "Appetizers",
        &[
            ("Spring Rolls (Small)", 25),
            ("Spring Rolls (Medium)", 38),
            ("Spring Rolls (Large)", 53),
            ("Samosas (3 pieces)", 20),
            ("Kelete (Plantain Chips)", 15),
            ("Chicken Wings (6 pieces)", 38),
            ("Pepper Soup (small)", 33),
            ("Asanka Local Salad", 28),
        ],
    ),
    (
        "Main Courses",
        &[
            ("Banku & Tilapia", 50),
            ("Tilapia", 30),
            ("Banku", 20),
            ("Fufu & Groundnut Soup", 65),
            ("Fufu & Light Soup", 60),
            ("Jollof Rice with Fish", 58),
            ("Jollof Rice with Chicken", 55),
            ("Fried Rice with Chicken", 53),
            ("Waakye", 40),
            ("Kenkey & Fried Fish and Pepper Sauce", 45),
            ("Pounded Fufu & Goat Light Soup", 75),
            ("Pizza (Small)", 65),
            ("Pizza (Medium)", 100),
            ("Pizza (Large)", 150),
            ("Burger (Single)", 50),
            ("Burger (Double)", 70),
            ("Spaghetti", 40),
        ],
    ),
    (
        "Desserts",
        &[
            ("Fruit Salad", 28),
            ("Ice Cream (scoop)", 20),
            ("Cake Slice", 28),
            ("Waffles", 40),
            ("Assorted jollof", 50),
        ],
    ),
    (
        "Drinks",
        &[
            ("Soft Drinks (Coca-Cola, Fanta, Sprite)", 20),
            ("Juices (Mango, Pineapple, Orange)", 28),
            ("Water (Bottled)", 13),
            ("Beer (Local)", 25),
            ("Beer (Imported)", 40),
            ("Local Gin (small)", 20),
            ("Local Gin (large)", 40),
            ("Palm wine (small)", 15),
            ("Palm wine (large)", 25),
        ],
    ),
    (
        "Other",
        &[("Tissues (per pack)", 8), ("Takeaway Containers", 8)],
    ),
];

/// Builds a catalog from [`DEFAULT_MENU`].
pub fn default_catalog() -> CoreResult<Catalog> {
    let mut catalog = Catalog::new();
    for (category, items) in DEFAULT_MENU {
        catalog.add_category(category)?;
        for (item, price) in items.iter() {
            catalog.add_item(category, item, *price)?;
        }
    }
    Ok(catalog)
}

/// The catalog plus the file it is persisted to.
#[derive(Debug)]
pub struct CatalogStore {
    catalog: Catalog,
    path: PathBuf,
}

impl CatalogStore {
    /// Wraps an in-memory catalog without touching the disk.
    pub fn new(catalog: Catalog, path: impl Into<PathBuf>) -> Self {
        CatalogStore {
            catalog,
            path: path.into(),
        }
    }

    /// Loads `path`. A missing file is replaced by the default menu, which
    /// is written out immediately. A malformed file is an error and is left
    /// as it is.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        match load_json_if_exists::<Catalog>(&path)? {
            Some(catalog) => {
                info!(
                    ?path,
                    categories = catalog.len(),
                    items = catalog.item_count(),
                    "Catalog loaded"
                );
                Ok(CatalogStore::new(catalog, path))
            }
            None => {
                warn!(?path, "Catalog file not found, writing default menu");
                let store = CatalogStore::new(default_catalog()?, path);
                store.save()?;
                Ok(store)
            }
        }
    }

    /// Re-reads the catalog file, discarding the in-memory copy.
    pub fn reload(&mut self) -> StoreResult<()> {
        let catalog = crate::json_file::load_json::<Catalog>(&self.path)?;
        debug!(path = ?self.path, "Catalog reloaded");
        self.catalog = catalog;
        Ok(())
    }

    /// Writes the complete catalog.
    pub fn save(&self) -> StoreResult<()> {
        save_json(&self.path, &self.catalog).map_err(|e| {
            error!(path = ?self.path, error = %e, "Catalog save failed");
            e
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read-only view of the whole catalog.
    pub fn get_catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current price of an item.
    pub fn price_of(&self, category: &str, item: &str) -> StoreResult<UnitPrice> {
        Ok(self.catalog.price_of(category, item)?)
    }

    // =========================================================================
    // Mutations (each one persists on success)
    // =========================================================================

    pub fn add_category(&mut self, name: &str) -> StoreResult<()> {
        self.catalog.add_category(name)?;
        info!(category = %name.trim(), "Category added");
        self.save()
    }

    /// Removes a category and every item in it. Returns the item count.
    pub fn remove_category(&mut self, name: &str) -> StoreResult<usize> {
        let removed = self.catalog.remove_category(name)?;
        info!(category = %name.trim(), items = removed, "Category removed");
        self.save()?;
        Ok(removed)
    }

    pub fn add_item(&mut self, category: &str, name: &str, price: impl IntoPrice) -> StoreResult<()> {
        let price = self.catalog.add_item(category, name, price)?;
        info!(category = %category.trim(), item = %name.trim(), %price, "Item added");
        self.save()
    }

    pub fn remove_item(&mut self, category: &str, name: &str) -> StoreResult<()> {
        self.catalog.remove_item(category, name)?;
        info!(category = %category.trim(), item = %name.trim(), "Item removed");
        self.save()
    }

    pub fn update_price(
        &mut self,
        category: &str,
        item: &str,
        price: impl IntoPrice,
    ) -> StoreResult<()> {
        let old = self.catalog.update_price(category, item, price)?;
        let new = self.catalog.price_of(category, item)?;
        info!(category = %category.trim(), item = %item.trim(), %old, %new, "Price updated");
        self.save()
    }

    /// Renames and reprices an item in one step.
    pub fn rename_or_reprice(
        &mut self,
        category: &str,
        old_name: &str,
        new_name: &str,
        new_price: impl IntoPrice,
    ) -> StoreResult<()> {
        self.catalog
            .rename_or_reprice(category, old_name, new_name, new_price)?;
        info!(
            category = %category.trim(),
            from = %old_name.trim(),
            to = %new_name.trim(),
            "Item updated"
        );
        self.save()
    }
}
