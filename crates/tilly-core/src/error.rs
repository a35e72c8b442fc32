//! # Error Types
//!
//! Domain-specific error types for tilly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tilly-core errors (this file)                                         │
//! │  ├── CoreError        - Not found, order lifecycle, credentials        │
//! │  ├── ValidationError  - Bad names, prices, quantities                  │
//! │  └── TemplateError    - Broken invoice template (recovered locally)    │
//! │                                                                         │
//! │  tilly-store errors (separate crate)                                   │
//! │  └── StoreError       - File load/save failures, authorization         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → UI message           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (category, item, field)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every catalog, order and credential operation returns one of these on
/// failure. None of them are fatal; the caller shows the message and carries on.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Category does not exist in the catalog.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Item does not exist in the given category.
    ///
    /// ## When This Occurs
    /// - Admin edits an item another screen already removed
    /// - Order screen references an item renamed since the menu was drawn
    #[error("Item '{item}' not found in category '{category}'")]
    ItemNotFound { category: String, item: String },

    /// No account with this username.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Account exists but the password did not verify.
    #[error("Invalid password for user '{username}'")]
    InvalidPassword { username: String },

    /// The order was already handed to the invoice renderer.
    ///
    /// ## User Workflow
    /// ```text
    /// Generate Invoice ──► order frozen
    ///      │
    ///      ▼
    /// Back to order screen, tap "Add"
    ///      │
    ///      ▼
    /// OrderFrozen ──► UI offers "Start new order"
    /// ```
    #[error("Order has already been invoiced; start a new order")]
    OrderFrozen,

    /// Checkout was requested on an order with no lines.
    #[error("No items to invoice")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the mutation boundary before any state changes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or whitespace-only.
    #[error("{field} is required")]
    Required { field: String },

    /// Input could not be read as a number.
    #[error("{field} is not a valid number: '{input}'")]
    InvalidNumber { field: String, input: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is above the largest one accepted.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate item name in a category).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Template Error
// =============================================================================

/// Invoice template problems.
///
/// Never returned as an `Err` from rendering: the renderer falls back to a
/// fixed layout and hands this back next to the text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `{name}` where `name` is not a known placeholder.
    #[error("Unknown placeholder: {{{0}}}")]
    UnknownPlaceholder(String),

    /// A `{` with no matching `}`.
    #[error("Unclosed '{{' at position {position}")]
    UnclosedBrace { position: usize },

    /// A lone `}` outside a placeholder.
    #[error("Unmatched '}}' at position {position}")]
    UnmatchedBrace { position: usize },

    /// Format spec the placeholder does not support.
    #[error("Unsupported format '{spec}' for {{{placeholder}}}")]
    InvalidFormatSpec { placeholder: String, spec: String },

    /// A placeholder the invoice cannot do without.
    #[error("Template is missing required placeholder {{{0}}}")]
    MissingPlaceholder(String),

    /// Template is empty or whitespace-only.
    #[error("Template is empty")]
    Empty,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
