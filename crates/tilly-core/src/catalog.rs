//! # Catalog
//!
//! The category → item → unit price structure offered for sale.
//!
//! ## Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every mutation runs the same three steps, and changes nothing unless   │
//! │  all of them pass:                                                      │
//! │                                                                         │
//! │   1. validate input    names trimmed & non-empty, price via IntoPrice   │
//! │   2. check existence   category / item must (or must not) exist         │
//! │   3. apply             one map operation                                │
//! │                                                                         │
//! │  remove_category drops the whole inner map in one step, so its items    │
//! │  can never outlive it.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Catalog` is a plain value. Durability lives in `tilly-store`, which owns
//! the only mutable instance and hands out `&Catalog` for reading.
//!
//! ## Usage
//! ```rust
//! use tilly_core::Catalog;
//!
//! let mut catalog = Catalog::new();
//! catalog.add_category("Drinks").unwrap();
//! catalog.add_item("Drinks", "Water", 10.0).unwrap();
//!
//! assert!(catalog.add_item("Drinks", "Water", 12).is_err());
//! assert_eq!(catalog.price_of("Drinks", "Water").unwrap().to_string(), "10.00");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{IntoPrice, UnitPrice};
use crate::validation::validate_name;

/// Items of one category, sorted by name.
pub type CategoryItems = BTreeMap<String, UnitPrice>;

/// Raw on-disk shape: `{ "<category>": { "<item>": <price> } }`.
type CatalogMap = BTreeMap<String, CategoryItems>;

/// The full catalog.
///
/// Serializes to the catalog file format directly. Deserializing trims every
/// name and rejects blank names and names that collide once trimmed; prices
/// are checked by [`UnitPrice`]'s own deserializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogMap", into = "CatalogMap")]
pub struct Catalog {
    categories: CatalogMap,
}

impl TryFrom<CatalogMap> for Catalog {
    type Error = ValidationError;

    fn try_from(raw: CatalogMap) -> Result<Self, Self::Error> {
        let mut categories = CatalogMap::new();

        for (category, raw_items) in &raw {
            let category = validate_name("category name", category)?;

            let mut items = CategoryItems::new();
            for (item, price) in raw_items {
                let item = validate_name("item name", item)?;
                insert_unique(&mut items, "item", item, *price)?;
            }

            insert_unique(&mut categories, "category", category, items)?;
        }

        Ok(Catalog { categories })
    }
}

fn insert_unique<V>(
    map: &mut BTreeMap<String, V>,
    field: &str,
    key: &str,
    value: V,
) -> Result<(), ValidationError> {
    match map.entry(key.to_string()) {
        Entry::Occupied(_) => Err(ValidationError::Duplicate {
            field: field.to_string(),
            value: key.to_string(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

impl From<Catalog> for CatalogMap {
    fn from(catalog: Catalog) -> Self {
        catalog.categories
    }
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Category names in display order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// All categories with their items.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryItems)> {
        self.categories.iter().map(|(name, items)| (name.as_str(), items))
    }

    /// Items of one category.
    pub fn items(&self, category: &str) -> CoreResult<&CategoryItems> {
        self.categories
            .get(category.trim())
            .ok_or_else(|| CoreError::CategoryNotFound(category.trim().to_string()))
    }

    /// Current price of an item.
    pub fn price_of(&self, category: &str, item: &str) -> CoreResult<UnitPrice> {
        self.items(category)?
            .get(item.trim())
            .copied()
            .ok_or_else(|| item_not_found(category, item))
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category.trim())
    }

    pub fn contains_item(&self, category: &str, item: &str) -> bool {
        self.categories
            .get(category.trim())
            .is_some_and(|items| items.contains_key(item.trim()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds an empty category.
    ///
    /// ## Errors
    /// - `Validation(Required)` if the name is blank
    /// - `Validation(Duplicate)` if the category exists
    pub fn add_category(&mut self, name: &str) -> CoreResult<()> {
        let name = validate_name("category name", name)?;

        if self.categories.contains_key(name) {
            return Err(ValidationError::Duplicate {
                field: "category".to_string(),
                value: name.to_string(),
            }
            .into());
        }

        self.categories.insert(name.to_string(), CategoryItems::new());
        Ok(())
    }

    /// Removes a category together with all of its items.
    ///
    /// Returns how many items went with it.
    pub fn remove_category(&mut self, name: &str) -> CoreResult<usize> {
        let name = validate_name("category name", name)?;

        self.categories
            .remove(name)
            .map(|items| items.len())
            .ok_or_else(|| CoreError::CategoryNotFound(name.to_string()))
    }

    /// Adds an item to an existing category.
    ///
    /// ## Errors
    /// - `CategoryNotFound` if the category is missing
    /// - `Validation(Required | Duplicate)` for a blank or taken item name
    /// - `Validation(..)` for a price that is not a non-negative number
    pub fn add_item(
        &mut self,
        category: &str,
        name: &str,
        price: impl IntoPrice,
    ) -> CoreResult<UnitPrice> {
        let category = validate_name("category name", category)?;
        let items = self
            .categories
            .get_mut(category)
            .ok_or_else(|| CoreError::CategoryNotFound(category.to_string()))?;

        let name = validate_name("item name", name)?;
        if items.contains_key(name) {
            return Err(ValidationError::Duplicate {
                field: "item".to_string(),
                value: name.to_string(),
            }
            .into());
        }

        let price = price.into_price()?;
        items.insert(name.to_string(), price);
        Ok(price)
    }

    /// Removes one item. Returns its last price.
    pub fn remove_item(&mut self, category: &str, name: &str) -> CoreResult<UnitPrice> {
        self.items_mut(category)?
            .remove(name.trim())
            .ok_or_else(|| item_not_found(category, name))
    }

    /// Sets a new price on an existing item. Returns the old price.
    pub fn update_price(
        &mut self,
        category: &str,
        item: &str,
        price: impl IntoPrice,
    ) -> CoreResult<UnitPrice> {
        let slot = self
            .items_mut(category)?
            .get_mut(item.trim())
            .ok_or_else(|| item_not_found(category, item))?;

        let price = price.into_price()?;
        Ok(std::mem::replace(slot, price))
    }

    /// Renames an item and sets its price in one step.
    ///
    /// ## Behavior
    /// - `new_name == old_name`: only the price changes
    /// - `new_name` taken by another item: fails, nothing changes
    /// - Otherwise the old entry is replaced by the new one
    ///
    /// All inputs are validated before the map is touched.
    pub fn rename_or_reprice(
        &mut self,
        category: &str,
        old_name: &str,
        new_name: &str,
        new_price: impl IntoPrice,
    ) -> CoreResult<()> {
        let old_name = old_name.trim();
        let items = self.items_mut(category)?;
        if !items.contains_key(old_name) {
            return Err(item_not_found(category, old_name));
        }

        let new_name = validate_name("item name", new_name)?;
        if new_name != old_name && items.contains_key(new_name) {
            return Err(ValidationError::Duplicate {
                field: "item".to_string(),
                value: new_name.to_string(),
            }
            .into());
        }

        let price = new_price.into_price()?;

        items.remove(old_name);
        items.insert(new_name.to_string(), price);
        Ok(())
    }

    fn items_mut(&mut self, category: &str) -> CoreResult<&mut CategoryItems> {
        let category = category.trim();
        self.categories
            .get_mut(category)
            .ok_or_else(|| CoreError::CategoryNotFound(category.to_string()))
    }
}

fn item_not_found(category: &str, item: &str) -> CoreError {
    CoreError::ItemNotFound {
        category: category.trim().to_string(),
        item: item.trim().to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
