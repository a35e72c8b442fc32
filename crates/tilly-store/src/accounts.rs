//! # Accounts
//!
//! The account table and credential checks.
//!
//! ## Account File
//! ```json
//! {
//!   "admin":   { "password_hash": "$argon2id$v=19$...", "role": "admin" },
//!   "cashier": { "password_hash": "$argon2id$v=19$...", "role": "cashier" }
//! }
//! ```
//!
//! ## Legacy Files
//! ```text
//! { "admin": { "password": "admin123", "role": "admin" } }
//!                  │
//!                  ▼  load
//! hashed in memory, warning logged; the plaintext is never kept
//! ```
//! Saving the table afterwards rewrites the file with hashes only.
//!
//! Without an account file a single `admin` / `admin123` account is used.

use std::collections::HashMap;
use std::path::Path;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use serde::{Deserialize, Serialize};
use tilly_core::validation::validate_username;
use tilly_core::{CoreError, CoreResult, Role};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::json_file::{load_json_if_exists, save_json};

/// Username of the account synthesized when no account file exists.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the synthesized administrator.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

// =============================================================================
// Hashing
// =============================================================================

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a PHC string. A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Records
// =============================================================================

/// One account as kept in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// One account as written in the account file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,

    /// Legacy plaintext; read but never written.
    #[serde(default, skip_serializing)]
    password: Option<String>,

    role: Role,
}

// =============================================================================
// Credential Validation
// =============================================================================

/// Turns a username/password pair into a role.
///
/// Implementations hold no session state: every call is a fresh check, and
/// the caller decides what the returned role may do.
pub trait CredentialValidator {
    /// ## Errors
    /// - `UserNotFound` for an unknown username (matched case-sensitively)
    /// - `InvalidPassword` when the password does not verify
    fn validate(&self, username: &str, password: &str) -> CoreResult<Role>;
}

// =============================================================================
// Account Table
// =============================================================================

/// Username → account.
#[derive(Debug, Clone, Default)]
pub struct AccountTable {
    accounts: HashMap<String, UserAccount>,
}

impl AccountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only the default administrator.
    pub fn with_default_admin() -> StoreResult<Self> {
        let mut table = AccountTable::new();
        table.insert(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD, Role::Admin)?;
        Ok(table)
    }

    /// Loads the account file, or synthesizes the default administrator if
    /// there is none.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let records: HashMap<String, StoredAccount> = match load_json_if_exists(path)? {
            Some(records) => records,
            None => {
                warn!(?path, "Account file not found, using default admin account");
                return AccountTable::with_default_admin();
            }
        };

        let mut table = AccountTable::new();
        for (username, record) in records {
            let password_hash = match (record.password_hash, record.password) {
                (Some(hash), _) => hash,
                (None, Some(plaintext)) => {
                    warn!(username = %username, "Plaintext password in account file; hashing in memory");
                    hash_password(&plaintext)?
                }
                (None, None) => {
                    warn!(username = %username, "Account has no password; skipped");
                    continue;
                }
            };

            table.accounts.insert(
                username.clone(),
                UserAccount {
                    username,
                    password_hash,
                    role: record.role,
                },
            );
        }

        info!(?path, accounts = table.len(), "Accounts loaded");
        Ok(table)
    }

    /// Writes the table with hashed passwords only.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let records: HashMap<&str, StoredAccount> = self
            .accounts
            .values()
            .map(|account| {
                (
                    account.username.as_str(),
                    StoredAccount {
                        password_hash: Some(account.password_hash.clone()),
                        password: None,
                        role: account.role,
                    },
                )
            })
            .collect();

        save_json(path, &records)?;
        info!(?path, accounts = records.len(), "Accounts saved");
        Ok(())
    }

    /// Adds or replaces an account, hashing the password.
    pub fn insert(&mut self, username: &str, password: &str, role: Role) -> StoreResult<()> {
        validate_username(username)?;
        let password_hash = hash_password(password)?;

        debug!(username = %username, %role, "Account set");
        self.accounts.insert(
            username.to_string(),
            UserAccount {
                username: username.to_string(),
                password_hash,
                role,
            },
        );
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<&UserAccount> {
        self.accounts.get(username)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl CredentialValidator for AccountTable {
    fn validate(&self, username: &str, password: &str) -> CoreResult<Role> {
        let account = self
            .accounts
            .get(username)
            .ok_or_else(|| CoreError::UserNotFound(username.to_string()))?;

        if !verify_password(password, &account.password_hash) {
            return Err(CoreError::InvalidPassword {
                username: username.to_string(),
            });
        }

        Ok(account.role)
    }
}
