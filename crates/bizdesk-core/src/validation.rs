//! # Validation Module
//!
//! Strict input validation for the draft editing paths.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Bad Input Goes                               │
//! │                                                                         │
//! │  Loose store record ──► normalize ──► zero fallback, never an error    │
//! │                                                                         │
//! │  Typed form edit ─────► THIS MODULE ──► ValidationError to the form    │
//! │                                                                         │
//! │  compute_line / compute_totals ──► never see an error                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizdesk_core::validation::{validate_quantity, validate_rate};
//! use bizdesk_core::types::{Percent, Quantity};
//!
//! assert!(validate_quantity(Quantity::from(3)).is_ok());
//! assert!(validate_rate("tax_rate", Percent::from(120)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, LineTax, Percent, Quantity};
use crate::{MAX_AMOUNT, MAX_DESCRIPTION_LEN, MAX_PERCENT, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line description for submission.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most `MAX_DESCRIPTION_LEN` characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (placeholder rows)
/// - At most `MAX_QUANTITY`
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if qty.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    if qty.value() > Decimal::from(MAX_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a currency amount (unit price, fixed discount).
///
/// ## Rules
/// - Must be non-negative
/// - At most `MAX_AMOUNT`
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if amount.amount() > Decimal::from(MAX_AMOUNT) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a tax rate percentage.
///
/// ## Rules
/// - Must be between 0 and 100
pub fn validate_rate(field: &str, rate: Percent) -> ValidationResult<()> {
    if rate.value() < Decimal::ZERO || rate.value() > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Must not be negative
/// - Values above 100 are accepted; they produce a negative line total
/// - At most `MAX_PERCENT`
pub fn validate_discount_percent(percent: Percent) -> ValidationResult<()> {
    if percent.value() < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "discount_percent".to_string(),
        });
    }

    if percent.value() > Decimal::from(MAX_PERCENT) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: MAX_PERCENT,
        });
    }

    Ok(())
}

/// Validates a line tax representation.
pub fn validate_line_tax(tax: &LineTax) -> ValidationResult<()> {
    match tax {
        LineTax::None => Ok(()),
        LineTax::Single { rate } => validate_rate("tax_rate", *rate),
        LineTax::Gst {
            cgst_rate,
            sgst_rate,
        } => {
            validate_rate("cgst_rate", *cgst_rate)?;
            validate_rate("sgst_rate", *sgst_rate)
        }
    }
}

/// Validates every numeric field of a line item.
///
/// Description is not checked here; a blank description is legal while
/// editing and only rejected on submission.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_amount("unit_price", item.unit_price)?;
    validate_line_tax(&item.tax)?;

    if let Some(percent) = item.discount.percent() {
        validate_discount_percent(percent)?;
    }
    if let Some(amount) = item.discount.fixed_amount() {
        validate_amount("discount_amount", amount)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use bizdesk_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
