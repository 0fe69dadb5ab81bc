//! # Error Types
//!
//! Domain-specific error types for bizdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizdesk-core errors (this file)                                       │
//! │  ├── CoreError        - Draft editing and submission errors            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bizdesk-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → form layer message                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Never Errors
//! `compute_line` and `compute_totals` are total over their input domain.
//! Bad numbers are normalized to zero and oversized ones capped at the
//! `MAX_*` bounds before they reach the math, so the errors below only come
//! from strict editing paths and submission checks.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while editing or submitting a draft document.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A strict field setter rejected its input.
    ///
    /// ## When This Occurs
    /// - Negative quantity or unit price typed into a row
    /// - Tax rate outside 0-100
    /// - Quantity, amount or discount percent above its `MAX_*` bound
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Row index does not exist in the draft.
    #[error("Line {index} does not exist (document has {len} lines)")]
    LineIndexOutOfRange { index: usize, len: usize },

    /// Draft already holds the maximum number of rows.
    #[error("Document cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// The edit uses a tax representation the document type does not accept.
    ///
    /// ## When This Occurs
    /// - Setting a blended `tax_rate` on a GST invoice
    /// - Setting CGST/SGST rates on a single-rate document
    #[error("{document} documents use {expected} tax rates")]
    TaxModelMismatch {
        document: String,
        expected: String,
    },

    /// Submission attempted with no rows.
    #[error("Document has no line items")]
    EmptyDocument,

    /// Submission attempted with a row that has no description.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Save invoice"
    ///      │
    ///      ▼
    /// validate_for_submit()
    ///      │
    ///      ▼
    /// MissingDescription { line: 2 }
    ///      │
    ///      ▼
    /// Form shows: "Please add a description to line 3"
    /// ```
    #[error("Line {line} has no description")]
    MissingDescription { line: usize },

    /// Catalog lookup found nothing for the id.
    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
