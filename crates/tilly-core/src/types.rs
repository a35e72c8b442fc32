//! # Domain Types
//!
//! Plain data handed to the caller: roles, order lines and order snapshots.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderSnapshot  │   │    OrderLine    │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  created_at     │──►│  category       │   │  Admin          │       │
//! │  │  status         │   │  item           │   │  Cashier        │       │
//! │  │  lines          │   │  quantity       │   └─────────────────┘       │
//! │  │  total          │   │  unit_price     │                             │
//! │  └─────────────────┘   │  line_total     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, UnitPrice};
use crate::validation::{quantity_too_large, validate_quantity, ValidationResult};

// =============================================================================
// Role
// =============================================================================

/// Authorization level returned by credential validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May edit the catalog and the invoice template.
    Admin,
    /// May take orders only.
    Cashier,
}

impl Role {
    /// Whether this role may run catalog and template mutations.
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Cashier => write!(f, "cashier"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "cashier" => Ok(Role::Cashier),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "cashier".to_string()],
            }),
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One (category, item) entry of an order.
///
/// Uses the snapshot pattern: `unit_price` is frozen at the first add, so
/// editing the catalog afterwards never changes a line already on the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub category: String,
    pub item: String,
    /// Always > 0.
    pub quantity: i64,
    /// Price captured when the line was created.
    #[ts(type = "number")]
    pub unit_price: UnitPrice,
    /// `quantity × unit_price`, rounded to the cent.
    pub line_total: Money,
}

impl OrderLine {
    pub(crate) fn new(
        category: &str,
        item: &str,
        quantity: i64,
        unit_price: UnitPrice,
    ) -> ValidationResult<Self> {
        Ok(OrderLine {
            category: category.to_string(),
            item: item.to_string(),
            quantity,
            unit_price,
            line_total: checked_line_total(unit_price, quantity)?,
        })
    }

    /// Whether this line is keyed by `(category, item)`.
    #[inline]
    pub fn matches(&self, category: &str, item: &str) -> bool {
        self.category == category && self.item == item
    }

    /// Sets the quantity and recomputes the total from the pinned price.
    ///
    /// On error the line is left as it was.
    pub(crate) fn set_quantity(&mut self, quantity: i64) -> ValidationResult<()> {
        self.line_total = checked_line_total(self.unit_price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

fn checked_line_total(unit_price: UnitPrice, quantity: i64) -> ValidationResult<Money> {
    validate_quantity(quantity)?;
    unit_price.line_total(quantity).ok_or_else(quantity_too_large)
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its lifecycle.
///
/// ```text
/// Open ──checkout()──► Invoiced
///  ▲                      │
///  └── new order ◄────────┘ (frozen; never mutated again)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Lines can be added and removed.
    #[default]
    Open,
    /// Handed to the invoice renderer; frozen.
    Invoiced,
}

// =============================================================================
// Order Snapshot
// =============================================================================

/// Read-only copy of an order, in the shape the invoice renderer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSnapshot {
    #[ts(as = "String")]
    pub created_at: DateTime<Local>,
    pub status: OrderStatus,
    /// Lines in first-add order.
    pub lines: Vec<OrderLine>,
    pub total: Money,
}

impl OrderSnapshot {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("cashier".parse::<Role>().unwrap(), Role::Cashier);
        assert!("Admin".parse::<Role>().is_err());
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_json() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"cashier\"").unwrap();
        assert_eq!(role, Role::Cashier);
        assert!(!role.is_admin());
    }

    #[test]
    fn test_order_line_recomputes_from_pinned_price() {
        let price = UnitPrice::from_cents(999).unwrap();
        let mut line = OrderLine::new("Drinks", "Water", 2, price).unwrap();
        assert_eq!(line.line_total.cents(), 1998);

        line.set_quantity(5).unwrap();
        assert_eq!(line.line_total.cents(), 4995);
        assert_eq!(line.unit_price, price);
    }

    #[test]
    fn test_order_line_rejects_out_of_range_quantity() {
        let price = UnitPrice::from_cents(999).unwrap();
        assert!(OrderLine::new("Drinks", "Water", 0, price).is_err());
        assert!(OrderLine::new("Drinks", "Water", i64::MAX, price).is_err());

        let mut line = OrderLine::new("Drinks", "Water", 2, price).unwrap();
        assert!(matches!(
            line.set_quantity(i64::MAX),
            Err(ValidationError::TooLarge { .. })
        ));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total.cents(), 1998);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Open);
    }
}
