//! Property tests for the line aggregator and document totalizer.
//!
//! Properties tested:
//! 1. subtotal = Σ base_amount over all lines
//! 2. tax_total = Σ tax_amount; on GST lines tax = cgst + sgst
//! 3. grand_total = subtotal + tax_total − discount_total
//! 4. Totals are idempotent and independent of line order
//! 5. Zero quantity or zero price contributes nothing to the base
//! 6. Any representable decimal input computes without overflow, as if
//!    clamped to the MAX_* input bounds

use bizdesk_core::line::compute_line;
use bizdesk_core::totals::compute_totals;
use bizdesk_core::types::{Discount, LineItem, LineTax, Percent, Quantity};
use bizdesk_core::{Money, MAX_AMOUNT, MAX_LINE_ITEMS, MAX_PERCENT, MAX_QUANTITY};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Strategies
// =============================================================================

fn money_strategy() -> impl Strategy<Value = Money> {
    (0i64..=10_000_000).prop_map(Money::from_cents)
}

fn quantity_strategy() -> impl Strategy<Value = Quantity> {
    // Up to three decimal places for weight/volume units
    (0i64..=100_000).prop_map(|milli| Quantity::new(Decimal::new(milli, 3)))
}

fn rate_strategy() -> impl Strategy<Value = Percent> {
    (0i64..=2_800).prop_map(|bps| Percent::new(Decimal::new(bps, 2)))
}

fn discount_strategy() -> impl Strategy<Value = Discount> {
    prop_oneof![
        Just(Discount::None),
        rate_strategy().prop_map(Discount::Percent),
        (0i64..=50_000).prop_map(|c| Discount::Amount(Money::from_cents(c))),
    ]
}

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (
        quantity_strategy(),
        money_strategy(),
        prop::option::of(rate_strategy()),
        prop::option::of((rate_strategy(), rate_strategy())),
        discount_strategy(),
    )
        .prop_map(|(qty, price, single, gst, discount)| {
            let mut item = LineItem::new("item", qty, price);
            if let Some((cgst, sgst)) = gst {
                item = item.with_gst(cgst, sgst);
            } else if let Some(rate) = single {
                item = item.with_tax_rate(rate);
            }
            item.discount = discount;
            item
        })
}

fn document_strategy() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_strategy(), 0..20)
}

/// Any representable decimal, biased toward the ends of the range.
fn extreme_decimal_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::MAX),
        Just(Decimal::MIN),
        (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
            .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale)),
    ]
}

fn extreme_line_strategy() -> impl Strategy<Value = LineItem> {
    (
        extreme_decimal_strategy(),
        extreme_decimal_strategy(),
        extreme_decimal_strategy(),
        extreme_decimal_strategy(),
        prop_oneof![Just(0u8), Just(1u8), Just(2u8)],
        any::<bool>(),
    )
        .prop_map(|(qty, price, rate, discount, tax_kind, percent_discount)| {
            let mut item = LineItem::new("item", Quantity::new(qty), Money::new(price));
            item.tax = match tax_kind {
                0 => LineTax::None,
                1 => LineTax::Single { rate: Percent::new(rate) },
                _ => LineTax::Gst {
                    cgst_rate: Percent::new(rate),
                    sgst_rate: Percent::new(discount),
                },
            };
            item.discount = if percent_discount {
                Discount::Percent(Percent::new(discount))
            } else {
                Discount::Amount(Money::new(discount))
            };
            item
        })
}

fn clamped(item: &LineItem) -> LineItem {
    LineItem {
        quantity: item.quantity.clamp_input(),
        unit_price: item.unit_price.clamp_input(),
        tax: item.tax.clamp_input(),
        discount: item.discount.clamp_input(),
        ..item.clone()
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Property: subtotal and tax_total are plain sums of per-line figures
    #[test]
    fn prop_totals_are_sums_of_lines(items in document_strategy(), discount in discount_strategy()) {
        let totals = compute_totals(&items, &discount);
        let lines: Vec<_> = items.iter().map(compute_line).collect();

        let subtotal: Money = lines.iter().map(|l| l.base_amount).sum();
        let tax: Money = lines.iter().map(|l| l.tax_amount).sum();
        let cgst: Money = lines.iter().map(|l| l.cgst_amount).sum();
        let sgst: Money = lines.iter().map(|l| l.sgst_amount).sum();

        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(totals.tax_total, tax);
        prop_assert_eq!(totals.cgst_total, cgst);
        prop_assert_eq!(totals.sgst_total, sgst);
    }

    /// Property: grand_total = subtotal + tax_total − discount_total
    #[test]
    fn prop_grand_total_identity(items in document_strategy(), discount in discount_strategy()) {
        let totals = compute_totals(&items, &discount);
        prop_assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.tax_total - totals.discount_total
        );
    }

    /// Property: each line total is base + tax − discount
    #[test]
    fn prop_line_total_identity(item in line_strategy()) {
        let line = compute_line(&item);
        prop_assert_eq!(
            line.line_total,
            line.base_amount + line.tax_amount - line.discount_amount
        );
        prop_assert_eq!(line.cgst_amount + line.sgst_amount + single_tax(&item, &line), line.tax_amount);
    }

    /// Property: same input, same output
    #[test]
    fn prop_idempotent(items in document_strategy(), discount in discount_strategy()) {
        prop_assert_eq!(compute_totals(&items, &discount), compute_totals(&items, &discount));
    }

    /// Property: line order does not change the totals
    #[test]
    fn prop_order_independent(items in document_strategy(), discount in discount_strategy()) {
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(compute_totals(&items, &discount), compute_totals(&reversed, &discount));
    }

    /// Property: zero quantity or zero price gives a zero base and zero tax
    #[test]
    fn prop_zero_base_line(item in line_strategy(), zero_qty in any::<bool>()) {
        let mut item = item;
        if zero_qty {
            item.quantity = Quantity::ZERO;
        } else {
            item.unit_price = Money::ZERO;
        }

        let line = compute_line(&item);
        prop_assert_eq!(line.base_amount, Money::ZERO);
        prop_assert_eq!(line.tax_amount, Money::ZERO);
        prop_assert_eq!(line.line_total, -line.discount_amount);
    }

    /// Property: a document discount never touches the subtotal or tax
    #[test]
    fn prop_document_discount_only_moves_grand_total(items in document_strategy(), discount in discount_strategy()) {
        let plain = compute_totals(&items, &Discount::None);
        let discounted = compute_totals(&items, &discount);

        prop_assert_eq!(plain.subtotal, discounted.subtotal);
        prop_assert_eq!(plain.tax_total, discounted.tax_total);
        prop_assert_eq!(plain.grand_total - discounted.grand_total, discounted.discount_total);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: extreme inputs compute like their clamped counterparts
    #[test]
    fn prop_extreme_line_matches_clamped(item in extreme_line_strategy()) {
        let line = compute_line(&item);
        prop_assert_eq!(line, compute_line(&clamped(&item)));
        prop_assert_eq!(
            line.line_total,
            line.base_amount + line.tax_amount - line.discount_amount
        );

        let max_base = Decimal::from(MAX_AMOUNT) * Decimal::from(MAX_QUANTITY);
        let max_percent = Decimal::from(MAX_PERCENT) / Decimal::ONE_HUNDRED;
        prop_assert!(line.base_amount.amount() <= max_base);
        prop_assert!(line.tax_amount.amount().abs() <= max_base * max_percent * Decimal::TWO);
    }

    /// Property: a full document of extreme lines totals without overflow
    #[test]
    fn prop_extreme_document_totals(
        items in prop::collection::vec(extreme_line_strategy(), 0..=MAX_LINE_ITEMS),
        discount in extreme_decimal_strategy(),
    ) {
        let discount = Discount::Percent(Percent::new(discount));
        let totals = compute_totals(&items, &discount);
        prop_assert_eq!(
            totals.grand_total,
            totals.subtotal + totals.tax_total - totals.discount_total
        );
    }
}

/// Tax from the blended rate, zero for GST and untaxed lines.
fn single_tax(item: &LineItem, line: &bizdesk_core::LineBreakdown) -> Money {
    match item.tax.tax_rate() {
        Some(rate) => rate.of(line.base_amount),
        None => Money::ZERO,
    }
}
