//! # Seed Data Generator
//!
//! Writes the default menu, the starter accounts and the default config.
//!
//! ## Usage
//! ```bash
//! # Seed the platform data directory (or $TILLY_DATA_DIR)
//! cargo run -p tilly-store --bin seed
//!
//! # Seed a specific directory
//! cargo run -p tilly-store --bin seed -- --dir ./pos-data
//!
//! # Overwrite existing files
//! cargo run -p tilly-store --bin seed -- --force
//! ```
//!
//! ## Accounts
//! - `admin` / `admin123` (admin)
//! - `cashier` / `cashier123` (cashier)

use std::env;
use std::path::Path;

use tilly_core::Role;
use tilly_store::catalog_store::{default_catalog, CatalogStore};
use tilly_store::{AccountTable, AppConfig, DataDir, StoreResult};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Starter accounts.
const ACCOUNTS: &[(&str, &str, Role)] = &[
    ("admin", "admin123", Role::Admin),
    ("cashier", "cashier123", Role::Cashier),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut dir: Option<String> = None;
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    dir = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Tilly POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --dir <PATH>   Data directory (default: $TILLY_DATA_DIR or platform dir)");
                println!("  -f, --force        Overwrite existing files");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let data_dir = match dir {
        Some(dir) => DataDir::new(dir),
        None => DataDir::resolve()?,
    };
    data_dir.ensure_exists()?;
    info!(dir = ?data_dir.root(), "Seeding data directory");

    let catalog_path = data_dir.catalog_path();
    if should_write(&catalog_path, force) {
        let catalog = CatalogStore::new(default_catalog()?, catalog_path);
        catalog.save()?;
        info!(
            categories = catalog.get_catalog().len(),
            items = catalog.get_catalog().item_count(),
            "Catalog written"
        );
    }

    let accounts_path = data_dir.accounts_path();
    if should_write(&accounts_path, force) {
        seed_accounts(&accounts_path)?;
    }

    let config_path = data_dir.config_path();
    if should_write(&config_path, force) {
        AppConfig::default().save(&config_path)?;
    }

    println!("✓ Seeded {}", data_dir.root().display());
    Ok(())
}

fn seed_accounts(path: &Path) -> StoreResult<()> {
    let mut accounts = AccountTable::new();
    for (username, password, role) in ACCOUNTS {
        accounts.insert(username, password, *role)?;
    }
    accounts.save(path)
}

fn should_write(path: &Path, force: bool) -> bool {
    if path.exists() && !force {
        warn!(?path, "Already exists, skipping (use --force to overwrite)");
        return false;
    }
    true
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,tilly=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tilly=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
