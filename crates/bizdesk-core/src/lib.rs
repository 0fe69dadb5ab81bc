//! # bizdesk-core: Pure Billing Logic for Bizdesk
//!
//! This crate is the only place invoice and order totals are produced.
//! Every screen that shows money (invoice form, print view, order form,
//! email/PDF export) goes through the same functions here so the figures
//! never drift between call sites.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizdesk Billing Flow                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Invoice / Order forms, print view, exports            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ every edit                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ bizdesk-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   │   │
//! │  │   │  draft   │──►│  totals  │──►│   line   │──►│   tax    │   │   │
//! │  │   │ editing  │   │ folding  │   │ per-row  │   │ CGST/SGST│   │   │
//! │  │   └──────────┘   └──────────┘   └──────────┘   └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   normalize (loose records in) • record (persisted shape out)  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ DocumentRecord                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bizdesk-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Decimal `Money` type
//! - [`types`] - `Percent`, `Quantity`, `LineItem`, `Discount`, `LineTax`
//! - [`line`] - Line Aggregator
//! - [`totals`] - Document Totalizer
//! - [`tax`] - GST specialization and tax-basis policy
//! - [`draft`] - In-memory invoice/order editing model
//! - [`normalize`] - Strict parsing boundary for store records
//! - [`record`] - Persisted document shape
//! - [`catalog`] - Catalog lookup collaborator
//! - [`config`] - Billing configuration
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bizdesk_core::line::compute_line;
//! use bizdesk_core::types::{LineItem, Percent, Quantity};
//! use bizdesk_core::Money;
//! use rust_decimal::Decimal;
//!
//! let item = LineItem::new("Consulting", Quantity::from(2), Money::from_cents(50_000))
//!     .with_gst(Percent::from(9), Percent::from(9));
//!
//! let line = compute_line(&item);
//! assert_eq!(line.base_amount, Money::from_cents(100_000));
//! assert_eq!(line.cgst_amount, Money::from_cents(9_000));
//! assert_eq!(line.line_total.amount(), Decimal::from(1180));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod draft;
pub mod error;
pub mod line;
pub mod money;
pub mod normalize;
pub mod record;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::BillingConfig;
pub use draft::DocumentDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use line::{compute_line, compute_line_with, LineBreakdown};
pub use money::Money;
pub use record::{DocumentRecord, LineRecord};
pub use tax::{CalcPolicy, GstRates, NegativeTotalPolicy, TaxBasis};
pub use totals::{compute_totals, compute_totals_with, DocumentTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed on a single invoice or order.
///
/// ## Business Reason
/// Documents are typically a few dozen rows. The cap stops a runaway paste
/// from producing a document the print view cannot lay out.
pub const MAX_LINE_ITEMS: usize = 500;

/// Maximum length of a line description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Largest quantity a line accepts.
///
/// ## Input Bounds
/// ```text
/// quantity   ≤ 1e9
/// amount     ≤ 1e9   (unit price, fixed discount)
/// percent    ≤ 1000  (tax rates, discount percent)
///
/// worst line ≈ 1e18 base + 2e19 tax + 1e19 discount
/// ```
/// Keeps every line and any realistic number of summed lines far below
/// `Decimal::MAX` (≈ 7.9e28), so the aggregator cannot overflow. Loose
/// input is clamped to these bounds by `normalize`; strict edits beyond
/// them are rejected by `validation`.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price or fixed discount a line or document accepts.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// Largest percentage (tax rate or discount) the aggregator applies.
pub const MAX_PERCENT: i64 = 1_000;
