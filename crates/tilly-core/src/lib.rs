//! # tilly-core: Pure Domain Logic for Tilly POS
//!
//! The catalog, the order being built, credential checks and invoice
//! rendering. Nothing in this crate touches the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tilly POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Screens (out of scope)                      │   │
//! │  │    Login ──► Menu ──► Order ──► Invoice ──► Admin editors       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               tilly-store (Register facade)                     │   │
//! │  │    JSON files, config, accounts, authorization                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tilly-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   order   │  │  invoice  │  │   money   │  │   │
//! │  │   │  Catalog  │  │ Aggregator│  │ Renderer  │  │ UnitPrice │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO FILE I/O • NO NETWORK • DETERMINISTIC                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Category → item → price map
//! - [`order`] - Order aggregator with price pinning
//! - [`invoice`] - Template parsing and rendering
//! - [`money`] - Fixed-point prices and cent totals
//! - [`types`] - Roles, order lines, snapshots
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules shared by the mutations
//!
//! ## Example Usage
//!
//! ```rust
//! use tilly_core::{Catalog, InvoiceRenderer, OrderAggregator};
//!
//! let mut catalog = Catalog::new();
//! catalog.add_category("Drinks").unwrap();
//! catalog.add_item("Drinks", "Water", 10.0).unwrap();
//!
//! let mut order = OrderAggregator::new();
//! let price = catalog.price_of("Drinks", "Water").unwrap();
//! order.add("Drinks", "Water", 3, price).unwrap();
//!
//! let snapshot = order.checkout().unwrap();
//! let invoice = InvoiceRenderer::new("GHS").render(&snapshot, "{items}\nTotal: {total}");
//!
//! assert_eq!(invoice.text, "Water x 3 @ GHS 10.00 = GHS 30.00\nTotal: 30.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod invoice;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CategoryItems};
pub use error::{CoreError, CoreResult, TemplateError, ValidationError};
pub use invoice::{InvoiceRenderer, InvoiceTemplate, RenderedInvoice, DEFAULT_INVOICE_TEMPLATE};
pub use money::{IntoPrice, Money, UnitPrice};
pub use order::OrderAggregator;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "GHS";
