//! # Validation Module
//!
//! Input validation for names and quantities. Prices are validated in
//! [`crate::money`] through [`crate::money::IntoPrice`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI                                                           │
//! │  └── Empty-field checks, immediate feedback                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + IntoPrice                                      │
//! │  └── Trimmed, non-empty names; positive quantities; valid prices       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog / OrderAggregator                                    │
//! │  └── Existence and uniqueness checks                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tilly_core::validation::{validate_name, validate_quantity};
//!
//! assert_eq!(validate_name("category name", "  Drinks ").unwrap(), "Drinks");
//! assert!(validate_name("category name", "   ").is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog name and returns it trimmed.
///
/// ## Rules
/// - Leading and trailing whitespace is dropped
/// - What remains must not be empty
///
/// `field` names the input in the error message ("category name",
/// "item name").
pub fn validate_name<'a>(field: &str, name: &'a str) -> ValidationResult<&'a str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(name)
}

/// Validates a username for the account table.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Largest quantity a single order line may hold.
///
/// With prices capped at [`crate::money::MAX_UNIT_PRICE`] this keeps every
/// line total, and any realistic order total, inside `i64` cents.
pub const MAX_QUANTITY: i64 = 10_000;

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_QUANTITY`]
///
/// ## User Workflow
/// ```text
/// Tap "+" on a menu item
///      │
///      ▼
/// validate_quantity(qty) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → Error, order untouched
///      │
///      ├── qty > MAX_QUANTITY? → Error, order untouched
///      │
///      └── OK → OrderAggregator::add
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(quantity_too_large());
    }

    Ok(())
}

pub(crate) fn quantity_too_large() -> ValidationError {
    ValidationError::TooLarge {
        field: "quantity".to_string(),
        max: MAX_QUANTITY.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("item name", "Water").unwrap(), "Water");
        assert_eq!(validate_name("item name", "\tWater \n").unwrap(), "Water");

        assert!(validate_name("item name", "").is_err());
        assert!(validate_name("item name", "   ").is_err());
    }

    #[test]
    fn test_validate_name_reports_field() {
        let err = validate_name("category name", "").unwrap_err();
        assert_eq!(err.to_string(), "category name is required");
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username(" ").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());

        assert!(validate_quantity(MAX_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(matches!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validate_quantity(i64::MAX).is_err());
    }
}
