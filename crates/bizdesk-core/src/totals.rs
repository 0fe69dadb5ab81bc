//! # Document Totalizer
//!
//! Folds an ordered sequence of line items into document totals and applies
//! the document-level discount. This is the only place totals are produced.
//!
//! ## Fold
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items[0] ──► compute_line ──┐                                          │
//! │  items[1] ──► compute_line ──┼──► Σ base  = subtotal                    │
//! │  items[n] ──► compute_line ──┘    Σ cgst  = cgst_total                  │
//! │                                   Σ sgst  = sgst_total                  │
//! │                                   Σ tax   = tax_total                   │
//! │                                                                         │
//! │  document discount (percent of subtotal, or fixed) = discount_total    │
//! │                                                                         │
//! │  grand_total = subtotal + tax_total − discount_total                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line vs Document Discounts
//! Line discounts live in each line's `line_total` and are reported in
//! `line_discount_total` for display. They are not subtracted again from
//! `grand_total`; only the document-level discount is.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::line::{compute_line_with, LineBreakdown};
use crate::money::Money;
use crate::tax::CalcPolicy;
use crate::types::{Discount, LineItem};

/// Aggregate figures for one invoice or order.
///
/// A pure function of the line items plus the document discount. Never
/// updated incrementally and never the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentTotals {
    /// Σ base amount.
    pub subtotal: Money,
    /// Σ CGST (GST documents).
    pub cgst_total: Money,
    /// Σ SGST (GST documents).
    pub sgst_total: Money,
    /// Σ tax amount, equal to `cgst_total + sgst_total` on GST documents.
    pub tax_total: Money,
    /// Σ line discounts, informational.
    pub line_discount_total: Money,
    /// Document-level discount.
    pub discount_total: Money,
    /// `subtotal + tax_total − discount_total`.
    pub grand_total: Money,
}

impl DocumentTotals {
    /// Σ line totals, the figure a print view shows under the line table.
    pub fn lines_total(&self) -> Money {
        self.subtotal + self.tax_total - self.line_discount_total
    }
}

/// Computes totals with the default policy.
///
/// ## Example
/// ```rust
/// use bizdesk_core::totals::compute_totals;
/// use bizdesk_core::types::{Discount, LineItem, Percent, Quantity};
/// use bizdesk_core::Money;
///
/// let items = vec![
///     LineItem::new("A", Quantity::from(1), Money::from_cents(100_000))
///         .with_tax_rate(Percent::from(18)),
///     LineItem::new("B", Quantity::from(1), Money::from_cents(50_000))
///         .with_discount_amount(Money::from_cents(5_000)),
/// ];
///
/// let totals = compute_totals(&items, &Discount::Percent(Percent::from(5)));
/// assert_eq!(totals.subtotal, Money::from_cents(150_000));
/// assert_eq!(totals.discount_total, Money::from_cents(7_500));
/// assert_eq!(totals.grand_total, Money::from_cents(160_500));
/// ```
pub fn compute_totals(items: &[LineItem], doc_discount: &Discount) -> DocumentTotals {
    compute_totals_with(items, doc_discount, &CalcPolicy::default())
}

/// Computes totals under an explicit policy.
///
/// Traversal is front to back; the input is never mutated.
pub fn compute_totals_with(
    items: &[LineItem],
    doc_discount: &Discount,
    policy: &CalcPolicy,
) -> DocumentTotals {
    let breakdowns: Vec<LineBreakdown> = items
        .iter()
        .map(|item| compute_line_with(item, policy))
        .collect();

    fold_breakdowns(&breakdowns, doc_discount, policy)
}

/// Folds already computed breakdowns into totals.
///
/// Split out so a draft can show per-line figures and totals from one pass.
pub fn fold_breakdowns(
    breakdowns: &[LineBreakdown],
    doc_discount: &Discount,
    policy: &CalcPolicy,
) -> DocumentTotals {
    let mut totals = DocumentTotals::default();

    for line in breakdowns {
        totals.subtotal += line.base_amount;
        totals.cgst_total += line.cgst_amount;
        totals.sgst_total += line.sgst_amount;
        totals.tax_total += line.tax_amount;
        totals.line_discount_total += line.discount_amount;
    }

    // Percent applies to the subtotal, never to subtotal + tax
    totals.discount_total = doc_discount.clamp_input().amount_on(totals.subtotal);
    totals.grand_total = policy
        .negative_totals
        .apply(totals.subtotal + totals.tax_total - totals.discount_total);

    debug!(
        lines = breakdowns.len(),
        subtotal = %totals.subtotal,
        tax = %totals.tax_total,
        discount = %totals.discount_total,
        grand_total = %totals.grand_total,
        "Computed document totals"
    );

    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::compute_line;
    use crate::tax::{NegativeTotalPolicy, TaxBasis};
    use crate::types::{Percent, Quantity};
    use rust_decimal_macros::dec;

    fn money(v: i64) -> Money {
        Money::new(v.into())
    }

    fn two_line_document() -> Vec<LineItem> {
        vec![
            LineItem::new("A", Quantity::from(1), money(1000)).with_tax_rate(Percent::from(18)),
            LineItem::new("B", Quantity::from(1), money(500)).with_discount_amount(money(50)),
        ]
    }

    #[test]
    fn test_document_level_discount() {
        let totals = compute_totals(&two_line_document(), &Discount::Percent(Percent::from(5)));

        assert_eq!(totals.subtotal, money(1500));
        assert_eq!(totals.tax_total, money(180));
        assert_eq!(totals.discount_total, money(75));
        assert_eq!(totals.line_discount_total, money(50));
        assert_eq!(totals.grand_total, money(1605));
        assert_eq!(totals.lines_total(), money(1630));
    }

    #[test]
    fn test_empty_document_is_all_zero() {
        let totals = compute_totals(&[], &Discount::Percent(Percent::from(10)));
        assert_eq!(totals, DocumentTotals::default());
    }

    #[test]
    fn test_fixed_document_discount() {
        let totals = compute_totals(&two_line_document(), &Discount::Amount(money(100)));
        assert_eq!(totals.discount_total, money(100));
        assert_eq!(totals.grand_total, money(1580));
    }

    #[test]
    fn test_gst_totals_stay_separate() {
        let items = vec![
            LineItem::new("A", Quantity::from(2), money(500))
                .with_gst(Percent::from(9), Percent::from(9)),
            LineItem::new("B", Quantity::from(1), money(200))
                .with_gst(Percent::from(6), Percent::from(6)),
        ];

        let totals = compute_totals(&items, &Discount::None);
        assert_eq!(totals.cgst_total, money(102));
        assert_eq!(totals.sgst_total, money(102));
        assert_eq!(totals.tax_total, money(204));
        assert_eq!(totals.grand_total, money(1404));
    }

    #[test]
    fn test_subtotal_is_sum_of_bases() {
        let items = vec![
            LineItem::new("A", Quantity::new(dec!(1.25)), Money::new(dec!(19.99))),
            LineItem::new("B", Quantity::new(dec!(3)), Money::new(dec!(0.33))),
            LineItem::new("C", Quantity::new(dec!(0.5)), Money::new(dec!(7.01))),
        ];

        let expected: Money = items.iter().map(|i| compute_line(i).base_amount).sum();
        assert_eq!(compute_totals(&items, &Discount::None).subtotal, expected);
    }

    #[test]
    fn test_idempotent() {
        let items = two_line_document();
        let discount = Discount::Percent(Percent::from(5));

        assert_eq!(compute_totals(&items, &discount), compute_totals(&items, &discount));
    }

    #[test]
    fn test_negative_grand_total_allowed_by_default() {
        let items = vec![LineItem::new("A", Quantity::from(1), money(100))];
        let totals = compute_totals(&items, &Discount::Amount(money(250)));
        assert_eq!(totals.grand_total, money(-150));
    }

    #[test]
    fn test_clamp_policy_floors_grand_total() {
        let items = vec![LineItem::new("A", Quantity::from(1), money(100))];
        let policy = CalcPolicy {
            negative_totals: NegativeTotalPolicy::ClampToZero,
            ..CalcPolicy::default()
        };

        let totals = compute_totals_with(&items, &Discount::Amount(money(250)), &policy);
        assert_eq!(totals.grand_total, Money::ZERO);
    }

    #[test]
    fn test_post_discount_basis_changes_tax_total() {
        let items = vec![LineItem::new("A", Quantity::from(10), money(100))
            .with_tax_rate(Percent::from(18))
            .with_discount_percent(Percent::from(10))];
        let policy = CalcPolicy {
            tax_basis: TaxBasis::PostDiscount,
            ..CalcPolicy::default()
        };

        assert_eq!(compute_totals(&items, &Discount::None).tax_total, money(180));
        assert_eq!(
            compute_totals_with(&items, &Discount::None, &policy).tax_total,
            money(162)
        );
    }

    #[test]
    fn test_full_document_of_maximal_lines_does_not_overflow() {
        let max = rust_decimal::Decimal::MAX;
        let item = LineItem::new("Max", Quantity::new(max), Money::new(max))
            .with_gst(Percent::new(max), Percent::new(max))
            .with_discount_percent(Percent::new(max));
        let items = vec![item; crate::MAX_LINE_ITEMS];

        let totals = compute_totals(&items, &Discount::Percent(Percent::new(max)));
        assert_eq!(totals.cgst_total + totals.sgst_total, totals.tax_total);
        assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.tax_total - totals.discount_total
        );
    }
}
