//! # Line Aggregator
//!
//! Computes one line's monetary contributions from its raw fields.
//!
//! ## Per-Line Math
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity × unit_price ─────────────────────────────► base_amount       │
//! │                                                            │            │
//! │          ┌─────────────────────────────┬───────────────────┤            │
//! │          ▼                             ▼                   │            │
//! │  tax on base (default)         discount:                   │            │
//! │  or base − discount            percent → base × p / 100    │            │
//! │  (TaxBasis::PostDiscount)      amount  → as-is             │            │
//! │          │                             │                   │            │
//! │          ▼                             ▼                   ▼            │
//! │     tax_amount            −      discount_amount   +   base_amount     │
//! │                                                                         │
//! │                         = line_total                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Pure: no I/O, no hidden state, same input gives same output
//! - Total: never fails or panics. Negative inputs count as zero and
//!   oversized ones as `MAX_QUANTITY` / `MAX_AMOUNT` / `MAX_PERCENT`
//!   (strict callers reject both earlier with `validation`)

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::tax::{CalcPolicy, TaxBasis, TaxComponents};
use crate::types::LineItem;

/// Derived amounts for one line. Never authoritative; recomputed every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineBreakdown {
    /// `quantity × unit_price`.
    pub base_amount: Money,
    /// CGST component (zero for non-GST lines).
    pub cgst_amount: Money,
    /// SGST component (zero for non-GST lines).
    pub sgst_amount: Money,
    /// Unified tax: blended tax, or CGST + SGST.
    pub tax_amount: Money,
    /// Effective discount for this line.
    pub discount_amount: Money,
    /// `base_amount + tax_amount − discount_amount`.
    pub line_total: Money,
}

/// Computes a line with the default policy (pre-discount tax, no clamping).
///
/// ## Example
/// ```rust
/// use bizdesk_core::line::compute_line;
/// use bizdesk_core::types::{LineItem, Percent, Quantity};
/// use bizdesk_core::Money;
///
/// let item = LineItem::new("Widget", Quantity::from(10), Money::from_cents(10_000))
///     .with_tax_rate(Percent::from(18))
///     .with_discount_percent(Percent::from(10));
///
/// let line = compute_line(&item);
/// assert_eq!(line.base_amount, Money::from_cents(100_000));
/// assert_eq!(line.tax_amount, Money::from_cents(18_000));
/// assert_eq!(line.discount_amount, Money::from_cents(10_000));
/// assert_eq!(line.line_total, Money::from_cents(108_000));
/// ```
pub fn compute_line(item: &LineItem) -> LineBreakdown {
    compute_line_with(item, &CalcPolicy::default())
}

/// Computes a line under an explicit policy.
pub fn compute_line_with(item: &LineItem, policy: &CalcPolicy) -> LineBreakdown {
    let quantity = item.quantity.clamp_input();
    let unit_price = item.unit_price.clamp_input();
    let discount = item.discount.clamp_input();

    let base_amount = unit_price.multiply_quantity(quantity);
    let discount_amount = discount.amount_on(base_amount);

    let taxable = match policy.tax_basis {
        TaxBasis::PreDiscount => base_amount,
        TaxBasis::PostDiscount => base_amount - discount_amount,
    };
    let tax = TaxComponents::compute(&item.tax.clamp_input(), taxable);
    let tax_amount = tax.total();

    let line_total = policy
        .negative_totals
        .apply(base_amount + tax_amount - discount_amount);

    trace!(
        base = %base_amount,
        tax = %tax_amount,
        discount = %discount_amount,
        total = %line_total,
        "Computed line"
    );

    LineBreakdown {
        base_amount,
        cgst_amount: tax.cgst,
        sgst_amount: tax.sgst,
        tax_amount,
        discount_amount,
        line_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
