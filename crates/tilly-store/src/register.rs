//! # Register
//!
//! The single-terminal facade the screens drive. It wires the catalog store,
//! account table, config and the current order together and enforces the
//! admin gate that the lower layers leave to their caller.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Order screen (no login)          Admin panel (admin login)            │
//! │   ──────────────────────           ─────────────────────────            │
//! │   add_to_order                     login("admin", ..)                   │
//! │   remove_from_order                add_category / add_item / ...        │
//! │   checkout_invoice ──► frozen      set_invoice_template                 │
//! │   new_order                        logout                               │
//! │                                                                         │
//! │   Admin operations without an admin session ──► NotAuthorized          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tilly_core::{
    Catalog, IntoPrice, InvoiceTemplate, Money, OrderAggregator, RenderedInvoice, Role,
};
use tracing::{debug, info, warn};

use crate::accounts::{AccountTable, CredentialValidator};
use crate::catalog_store::CatalogStore;
use crate::config::AppConfig;
use crate::error::{StoreError, StoreResult};
use crate::paths::DataDir;

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// Catalog, accounts, config and the order in progress for one terminal.
#[derive(Debug)]
pub struct Register {
    data_dir: DataDir,
    catalog: CatalogStore,
    accounts: AccountTable,
    config: AppConfig,
    order: OrderAggregator,
    session: Option<Session>,
}

impl Register {
    /// Opens every state file under `data_dir`, creating defaults as needed.
    pub fn open(data_dir: DataDir) -> StoreResult<Self> {
        data_dir.ensure_exists()?;

        let catalog = CatalogStore::open(data_dir.catalog_path())?;
        let accounts = AccountTable::load(&data_dir.accounts_path())?;
        let config = AppConfig::load_or_default(&data_dir.config_path());

        info!(dir = ?data_dir.root(), "Register opened");
        Ok(Register {
            data_dir,
            catalog,
            accounts,
            config,
            order: OrderAggregator::new(),
            session: None,
        })
    }

    /// Opens the register in the resolved data directory.
    pub fn open_default() -> StoreResult<Self> {
        Register::open(DataDir::resolve()?)
    }

    pub fn data_dir(&self) -> &DataDir {
        &self.data_dir
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog.get_catalog()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Checks credentials and starts a session with the returned role.
    ///
    /// A failed attempt ends any existing session.
    pub fn login(&mut self, username: &str, password: &str) -> StoreResult<Role> {
        match self.accounts.validate(username, password) {
            Ok(role) => {
                info!(username = %username, %role, "Login");
                self.session = Some(Session {
                    username: username.to_string(),
                    role,
                });
                Ok(role)
            }
            Err(e) => {
                warn!(username = %username, "Login failed");
                self.session = None;
                Err(e.into())
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(username = %session.username, "Logout");
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Fails unless an admin is logged in.
    pub fn require_admin(&self) -> StoreResult<()> {
        match &self.session {
            Some(session) if session.role.is_admin() => Ok(()),
            _ => Err(StoreError::NotAuthorized {
                required: Role::Admin,
            }),
        }
    }

    // =========================================================================
    // Order
    // =========================================================================

    pub fn order(&self) -> &OrderAggregator {
        &self.order
    }

    pub fn order_total(&self) -> Money {
        self.order.total()
    }

    /// Drops the current order and starts an empty one.
    pub fn new_order(&mut self) {
        debug!(lines = self.order.lines().len(), "New order");
        self.order = OrderAggregator::new();
    }

    /// Adds `qty` of a catalog item at its current catalog price.
    pub fn add_to_order(&mut self, category: &str, item: &str, qty: i64) -> StoreResult<()> {
        let price = self.catalog.price_of(category, item)?;
        self.order.add(category, item, qty, price)?;
        debug!(category = %category, item = %item, qty, total = %self.order.total(), "Added to order");
        Ok(())
    }

    /// Takes one off a line. `false` if the item was not on the order.
    pub fn remove_from_order(&mut self, category: &str, item: &str) -> StoreResult<bool> {
        Ok(self.order.decrement(category, item)?)
    }

    /// Drops a whole line. `false` if the item was not on the order.
    pub fn remove_line(&mut self, category: &str, item: &str) -> StoreResult<bool> {
        Ok(self.order.remove_line(category, item)?.is_some())
    }

    pub fn clear_order(&mut self) -> StoreResult<()> {
        Ok(self.order.clear()?)
    }

    /// Freezes the current order and renders its invoice with the stored
    /// template.
    ///
    /// ## Errors
    /// - `EmptyOrder` when nothing has been added
    /// - `OrderFrozen` when this order was already invoiced
    ///
    /// A broken template is not an error: the fallback layout is used and
    /// the problem is reported in [`RenderedInvoice::template_error`].
    pub fn checkout_invoice(&mut self) -> StoreResult<RenderedInvoice> {
        let snapshot = self.order.checkout()?;
        let invoice = self
            .config
            .renderer()
            .render(&snapshot, &self.config.invoice_template);

        if let Some(err) = &invoice.template_error {
            warn!(error = %err, "Invoice template rejected, used fallback layout");
        }
        info!(lines = snapshot.lines.len(), total = %snapshot.total, "Invoice generated");
        Ok(invoice)
    }

    // =========================================================================
    // Admin: invoice template
    // =========================================================================

    pub fn invoice_template(&self) -> &str {
        &self.config.invoice_template
    }

    /// Validates and stores a new invoice template.
    pub fn set_invoice_template(&mut self, template: &str) -> StoreResult<()> {
        self.require_admin()?;
        InvoiceTemplate::parse(template)?;

        self.config.invoice_template = template.to_string();
        info!("Invoice template updated");
        self.config.save(&self.data_dir.config_path())
    }

    // =========================================================================
    // Admin: catalog
    // =========================================================================

    pub fn add_category(&mut self, name: &str) -> StoreResult<()> {
        self.require_admin()?;
        self.catalog.add_category(name)
    }

    pub fn remove_category(&mut self, name: &str) -> StoreResult<usize> {
        self.require_admin()?;
        self.catalog.remove_category(name)
    }

    pub fn add_item(&mut self, category: &str, name: &str, price: impl IntoPrice) -> StoreResult<()> {
        self.require_admin()?;
        self.catalog.add_item(category, name, price)
    }

    pub fn remove_item(&mut self, category: &str, name: &str) -> StoreResult<()> {
        self.require_admin()?;
        self.catalog.remove_item(category, name)
    }

    pub fn update_price(&mut self, category: &str, item: &str, price: impl IntoPrice) -> StoreResult<()> {
        self.require_admin()?;
        self.catalog.update_price(category, item, price)
    }

    pub fn rename_or_reprice(
        &mut self,
        category: &str,
        old_name: &str,
        new_name: &str,
        new_price: impl IntoPrice,
    ) -> StoreResult<()> {
        self.require_admin()?;
        self.catalog
            .rename_or_reprice(category, old_name, new_name, new_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tilly_core::{CoreError, OrderStatus, TemplateError, ValidationError};

    fn open_register(dir: &tempfile::TempDir) -> Register {
        Register::open(DataDir::new(dir.path())).unwrap()
    }

    #[test]
    fn test_open_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let register = open_register(&dir);

        assert!(dir.path().join("catalog.json").exists());
        assert!(register.catalog().contains_category("Drinks"));
        assert_eq!(register.config().currency_symbol, "GHS");
    }

    #[test]
    fn test_admin_gate() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);

        assert!(matches!(
            register.add_category("Snacks"),
            Err(StoreError::NotAuthorized { required: Role::Admin })
        ));

        assert_eq!(register.login("admin", "admin123").unwrap(), Role::Admin);
        register.add_category("Snacks").unwrap();

        register.logout();
        assert!(register.session().is_none());
        assert!(register.remove_category("Snacks").is_err());
    }

    #[test]
    fn test_failed_login_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);

        register.login("admin", "admin123").unwrap();
        let err = register.login("admin", "nope").unwrap_err();

        assert!(matches!(err, StoreError::Core(CoreError::InvalidPassword { .. })));
        assert!(register.require_admin().is_err());
    }

    #[test]
    fn test_order_uses_catalog_price() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);

        register.add_to_order("Main Courses", "Waakye", 2).unwrap();
        assert_eq!(register.order_total().cents(), 8000);

        assert!(matches!(
            register.add_to_order("Main Courses", "Sushi", 1),
            Err(StoreError::Core(CoreError::ItemNotFound { .. }))
        ));
    }

    #[test]
    fn test_price_pinned_after_catalog_edit() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);

        register.add_to_order("Main Courses", "Waakye", 1).unwrap();
        register.login("admin", "admin123").unwrap();
        register.update_price("Main Courses", "Waakye", 45).unwrap();
        register.add_to_order("Main Courses", "Waakye", 1).unwrap();

        assert_eq!(register.order_total().cents(), 8000);
    }

    #[test]
    fn test_checkout_freezes_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);

        assert!(matches!(
            register.checkout_invoice(),
            Err(StoreError::Core(CoreError::EmptyOrder))
        ));

        register.add_to_order("Drinks", "Beer (Local)", 2).unwrap();
        let invoice = register.checkout_invoice().unwrap();
        assert!(invoice.is_ok());
        assert!(invoice.text.contains("Beer (Local) x 2 @ GHS 25.00 = GHS 50.00"));
        assert!(invoice.text.contains("Total: GHS 50.00"));
        assert_eq!(register.order().status(), OrderStatus::Invoiced);

        assert!(matches!(
            register.add_to_order("Drinks", "Beer (Local)", 1),
            Err(StoreError::Core(CoreError::OrderFrozen))
        ));

        register.new_order();
        register.add_to_order("Drinks", "Beer (Local)", 1).unwrap();
    }

    #[test]
    fn test_set_invoice_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);
        register.login("admin", "admin123").unwrap();

        assert!(matches!(
            register.set_invoice_template("   "),
            Err(StoreError::Template(TemplateError::Empty))
        ));
        assert!(matches!(
            register.set_invoice_template("{items}"),
            Err(StoreError::Template(TemplateError::MissingPlaceholder(_)))
        ));

        register
            .set_invoice_template("{store_name}\n{items}\n{currency}{total}")
            .unwrap();
        drop(register);

        let mut reopened = open_register(&dir);
        assert_eq!(
            reopened.invoice_template(),
            "{store_name}\n{items}\n{currency}{total}"
        );

        reopened.add_to_order("Other", "Takeaway Containers", 1).unwrap();
        let invoice = reopened.checkout_invoice().unwrap();
        assert_eq!(
            invoice.text,
            "Tilly POS\nTakeaway Containers x 1 @ GHS 8.00 = GHS 8.00\nGHS8.00"
        );
    }

    #[test]
    fn test_cashier_cannot_edit_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = open_register(&dir);
        let mut accounts = AccountTable::new();
        accounts.insert("cashier", "cashier123", Role::Cashier).unwrap();
        accounts.save(&register.data_dir().accounts_path()).unwrap();
        register = Register::open(register.data_dir().clone()).unwrap();

        assert_eq!(register.login("cashier", "cashier123").unwrap(), Role::Cashier);
        assert!(matches!(
            register.set_invoice_template("{items}{total}"),
            Err(StoreError::NotAuthorized { .. })
        ));
    }

    // =========================================================================
    // End-to-end flows
    // =========================================================================

    fn water_only(dir: &tempfile::TempDir) -> DataDir {
        fs::write(dir.path().join("catalog.json"), r#"{"Drinks": {"Water": 10.0}}"#).unwrap();
        DataDir::new(dir.path())
    }

    #[test]
    fn test_water_and_soda_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = Register::open(water_only(&dir)).unwrap();
        register.login("admin", "admin123").unwrap();

        let err = register.add_item("Drinks", "Water", 12).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert_eq!(
            register.catalog().price_of("Drinks", "Water").unwrap().to_string(),
            "10.00"
        );

        register.add_item("Drinks", "Soda", 15).unwrap();
        assert_eq!(
            register.catalog().price_of("Drinks", "Soda").unwrap().to_string(),
            "15.00"
        );

        register.add_to_order("Drinks", "Water", 2).unwrap();
        register.add_to_order("Drinks", "Water", 1).unwrap();

        let lines = register.order().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].line_total.to_string(), "30.00");
        assert_eq!(register.order_total().to_string(), "30.00");

        let invoice = register.checkout_invoice().unwrap();
        assert!(invoice.is_ok());
        assert!(invoice.text.starts_with("Invoice\n"));
        assert!(invoice
            .text
            .ends_with("Water x 3 @ GHS 10.00 = GHS 30.00\nTotal: GHS 30.00\n"));
    }

    #[test]
    fn test_catalog_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut register = Register::open(water_only(&dir)).unwrap();
            register.login("admin", "admin123").unwrap();
            register.add_category("Snacks").unwrap();
            register.add_item("Snacks", "Kelewele", "12.50").unwrap();
            register
                .rename_or_reprice("Drinks", "Water", "Water (Bottled)", 13)
                .unwrap();
            assert_eq!(register.remove_category("Snacks").unwrap(), 1);
        }

        let register = Register::open(DataDir::new(dir.path())).unwrap();
        let catalog = register.catalog();
        assert!(!catalog.contains_category("Snacks"));
        assert!(!catalog.contains_item("Drinks", "Water"));
        assert_eq!(
            catalog.price_of("Drinks", "Water (Bottled)").unwrap().to_string(),
            "13.00"
        );
    }

    #[test]
    fn test_rename_collision_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = Register::open(water_only(&dir)).unwrap();
        register.login("admin", "admin123").unwrap();
        register.add_item("Drinks", "Soda", 15).unwrap();

        assert!(register
            .rename_or_reprice("Drinks", "Soda", "Water", 99)
            .is_err());
        assert_eq!(
            register.catalog().price_of("Drinks", "Water").unwrap().to_string(),
            "10.00"
        );
        assert_eq!(
            register.catalog().price_of("Drinks", "Soda").unwrap().to_string(),
            "15.00"
        );
    }

    #[test]
    fn test_non_positive_quantity_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = Register::open(water_only(&dir)).unwrap();

        register.add_to_order("Drinks", "Water", 1).unwrap();
        assert!(register.add_to_order("Drinks", "Water", 0).is_err());
        assert!(register.add_to_order("Drinks", "Water", -2).is_err());

        assert_eq!(register.order().lines().len(), 1);
        assert_eq!(register.order_total().to_string(), "10.00");
    }

    #[test]
    fn test_huge_quantity_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = Register::open(water_only(&dir)).unwrap();

        register.add_to_order("Drinks", "Water", 1).unwrap();
        assert!(matches!(
            register.add_to_order("Drinks", "Water", i64::MAX),
            Err(StoreError::Core(CoreError::Validation(ValidationError::TooLarge { .. })))
        ));

        assert_eq!(register.order().lines().len(), 1);
        assert_eq!(register.order_total().to_string(), "10.00");
    }

    #[test]
    fn test_padded_names_share_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = Register::open(water_only(&dir)).unwrap();

        register.add_to_order("Drinks", "Water", 1).unwrap();
        register.add_to_order("Drinks", " Water ", 1).unwrap();

        let lines = register.order().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item, "Water");
        assert_eq!(lines[0].quantity, 2);

        assert!(register.remove_from_order(" Drinks", "Water").unwrap());
        assert_eq!(register.order().quantity_of("Drinks", "Water"), 1);
    }

    #[test]
    fn test_broken_template_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = water_only(&dir);
        fs::write(
            data_dir.config_path(),
            r#"{"invoice_template": "Invoice\n{items}\n{tax}"}"#,
        )
        .unwrap();

        let mut register = Register::open(data_dir).unwrap();
        register.add_to_order("Drinks", "Water", 2).unwrap();
        let invoice = register.checkout_invoice().unwrap();

        assert!(!invoice.is_ok());
        assert_eq!(
            invoice.text,
            "Water x 2 @ GHS 10.00 = GHS 20.00\nTotal: GHS 20.00"
        );
    }

    #[test]
    fn test_persist_failure_keeps_memory_change() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let mut store = CatalogStore::open(data.join("catalog.json")).unwrap();

        // Swap the data directory for a plain file so the next save cannot land.
        fs::remove_dir_all(&data).unwrap();
        fs::write(&data, "").unwrap();

        let err = store.add_category("Specials").unwrap_err();
        assert!(err.is_persist());
        assert!(store.get_catalog().contains_category("Specials"));
    }
}
