//! # tilly-store: Durable State for Tilly POS
//!
//! Everything that touches the disk, plus the [`Register`] facade the
//! screens call.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          tilly-store                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Register                                │   │
//! │  │   login/logout • admin gate • current order • checkout          │   │
//! │  └──────┬───────────────────┬───────────────────┬──────────────────┘   │
//! │         │                   │                   │                       │
//! │  ┌──────▼───────┐   ┌───────▼──────┐   ┌────────▼─────┐                │
//! │  │ CatalogStore │   │ AccountTable │   │  AppConfig   │                │
//! │  │ catalog.json │   │accounts.json │   │ config.json  │                │
//! │  └──────┬───────┘   └───────┬──────┘   └────────┬─────┘                │
//! │         └───────────────────┼───────────────────┘                       │
//! │                     ┌───────▼──────┐                                    │
//! │                     │  json_file   │  temp file + rename                │
//! │                     └──────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use tilly_store::{DataDir, Register};
//!
//! let mut register = Register::open(DataDir::new("./pos-data"))?;
//! register.add_to_order("Drinks", "Water (Bottled)", 2)?;
//! let invoice = register.checkout_invoice()?;
//! println!("{}", invoice.text);
//! # Ok::<(), tilly_store::StoreError>(())
//! ```

pub mod accounts;
pub mod catalog_store;
pub mod config;
pub mod error;
pub mod json_file;
pub mod paths;
pub mod register;

pub use accounts::{AccountTable, CredentialValidator, UserAccount};
pub use catalog_store::CatalogStore;
pub use config::AppConfig;
pub use error::{FileError, StoreError, StoreResult};
pub use paths::DataDir;
pub use register::{Register, Session};
