//! # Order Aggregator
//!
//! Accumulates one in-progress order from repeated add/remove calls.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations                                     │
//! │                                                                         │
//! │  UI Action              Call                    Effect                  │
//! │  ─────────              ────                    ──────                  │
//! │                                                                         │
//! │  Tap menu item ───────► add(cat, item, n, p) ─► new line, or qty += n   │
//! │                                                 (price stays pinned)    │
//! │                                                                         │
//! │  Tap "−" ─────────────► decrement(cat, item) ─► qty -= 1, drop at 0     │
//! │                                                                         │
//! │  Clear Order ─────────► clear() ──────────────► no lines                │
//! │                                                                         │
//! │  Generate Invoice ────► checkout() ───────────► frozen snapshot         │
//! │                                                                         │
//! │  After checkout every mutation returns OrderFrozen.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Each line total is rounded to the cent when it is computed. [`total`]
//! adds those rounded cents, so three lines of 0.005 come to 0.03 rather
//! than the 0.02 a single rounding of 0.015 would give.
//!
//! [`total`]: OrderAggregator::total

use chrono::{DateTime, Local};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{IntoPrice, Money};
use crate::types::{OrderLine, OrderSnapshot, OrderStatus};
use crate::validation::{quantity_too_large, validate_name, validate_quantity};

/// One order being built at the terminal.
///
/// ## Invariants
/// - Lines are unique by `(category, item)` and kept in first-add order
/// - Every line has `0 < quantity <= MAX_QUANTITY`
/// - Names on a line are trimmed
/// - The order total fits in `i64` cents
/// - `created_at` never changes
/// - Once `Invoiced`, the lines never change
#[derive(Debug, Clone)]
pub struct OrderAggregator {
    lines: Vec<OrderLine>,
    created_at: DateTime<Local>,
    status: OrderStatus,
}

impl OrderAggregator {
    /// Starts an empty order stamped with the current local time.
    pub fn new() -> Self {
        Self::with_created_at(Local::now())
    }

    /// Starts an empty order with a given timestamp.
    pub fn with_created_at(created_at: DateTime<Local>) -> Self {
        OrderAggregator {
            lines: Vec::new(),
            created_at,
            status: OrderStatus::Open,
        }
    }

    /// Adds `qty` of an item.
    ///
    /// ## Behavior
    /// - Names are trimmed, so `" Water "` lands on the `Water` line
    /// - `qty <= 0`: validation error, order unchanged
    /// - Item already on the order: quantity accumulates and the line total
    ///   is recomputed from the price captured at the first add. The
    ///   `unit_price` passed now is still validated but otherwise ignored.
    /// - Otherwise a new line is appended
    /// - A quantity above `MAX_QUANTITY`, or a total that no longer fits,
    ///   is a validation error and the order is unchanged
    pub fn add(
        &mut self,
        category: &str,
        item: &str,
        qty: i64,
        unit_price: impl IntoPrice,
    ) -> CoreResult<()> {
        self.ensure_open()?;
        let category = validate_name("category name", category)?;
        let item = validate_name("item name", item)?;
        validate_quantity(qty)?;
        let unit_price = unit_price.into_price()?;

        let index = self.position(category, item);
        let line = match index {
            Some(index) => {
                let mut line = self.lines[index].clone();
                let quantity = line
                    .quantity
                    .checked_add(qty)
                    .ok_or_else(quantity_too_large)?;
                line.set_quantity(quantity)?;
                line
            }
            None => OrderLine::new(category, item, qty, unit_price)?,
        };

        self.ensure_total_fits(index, &line)?;

        match index {
            Some(index) => self.lines[index] = line,
            None => self.lines.push(line),
        }

        Ok(())
    }

    /// Takes one unit of an item off the order.
    ///
    /// Drops the line when its quantity reaches zero. Returns `false` when
    /// the item was not on the order.
    pub fn decrement(&mut self, category: &str, item: &str) -> CoreResult<bool> {
        self.ensure_open()?;

        let Some(index) = self.position(category, item) else {
            return Ok(false);
        };

        let line = &mut self.lines[index];
        if line.quantity > 1 {
            let quantity = line.quantity - 1;
            line.set_quantity(quantity)?;
        } else {
            self.lines.remove(index);
        }

        Ok(true)
    }

    /// Same as [`decrement`](Self::decrement); the order screen's "remove" button.
    pub fn remove(&mut self, category: &str, item: &str) -> CoreResult<bool> {
        self.decrement(category, item)
    }

    /// Drops a whole line regardless of quantity.
    pub fn remove_line(&mut self, category: &str, item: &str) -> CoreResult<Option<OrderLine>> {
        self.ensure_open()?;
        Ok(self
            .position(category, item)
            .map(|index| self.lines.remove(index)))
    }

    /// Removes every line. `created_at` is kept.
    pub fn clear(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.lines.clear();
        Ok(())
    }

    /// Freezes the order and returns what the invoice renderer needs.
    ///
    /// ## Errors
    /// - `EmptyOrder` if there is nothing to invoice (order stays open)
    /// - `OrderFrozen` if already checked out
    pub fn checkout(&mut self) -> CoreResult<OrderSnapshot> {
        self.ensure_open()?;
        if self.lines.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        self.status = OrderStatus::Invoiced;
        Ok(self.snapshot())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Copy of the current order.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            created_at: self.created_at,
            status: self.status,
            lines: self.lines.clone(),
            total: self.total(),
        }
    }

    /// Current lines in first-add order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sum of the already-rounded line totals.
    ///
    /// Line totals are whole cents, so the sum is already rounded to two
    /// decimals; no second rounding step can change it.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|line| line.line_total).sum()
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity of one item, zero when absent.
    pub fn quantity_of(&self, category: &str, item: &str) -> i64 {
        self.position(category, item)
            .map_or(0, |index| self.lines[index].quantity)
    }

    fn ensure_open(&self) -> CoreResult<()> {
        match self.status {
            OrderStatus::Open => Ok(()),
            OrderStatus::Invoiced => Err(CoreError::OrderFrozen),
        }
    }

    fn position(&self, category: &str, item: &str) -> Option<usize> {
        let (category, item) = (category.trim(), item.trim());
        self.lines
            .iter()
            .position(|line| line.matches(category, item))
    }

    /// Checks the order total with `line` in place of the line at `replacing`
    /// (or appended when `None`).
    fn ensure_total_fits(&self, replacing: Option<usize>, line: &OrderLine) -> CoreResult<()> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replacing)
            .try_fold(line.line_total, |total, (_, other)| total.checked_add(other.line_total))
            .map(|_| ())
            .ok_or_else(|| {
                ValidationError::TooLarge {
                    field: "order total".to_string(),
                    max: Money::from_cents(i64::MAX).to_string(),
                }
                .into()
            })
    }
}

impl Default for OrderAggregator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
