//! # Domain Types
//!
//! Core domain types shared by the aggregator, the totalizer and the draft
//! editing model.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │     LineTax     │   │    Discount     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  description    │   │  None           │   │  None           │       │
//! │  │  quantity       │   │  Single{rate}   │   │  Percent(p)     │       │
//! │  │  unit_price     │   │  Gst{cgst,sgst} │   │  Amount(m)      │       │
//! │  │  tax, discount  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Percent      │   │  DocumentKind   │   │    TaxModel     │       │
//! │  │  9 = 9%         │   │  Invoice        │   │  Single         │       │
//! │  │    Quantity     │   │  Order          │   │  Gst            │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exclusivity By Construction
//! A line's tax is one `LineTax` variant and its discount is one `Discount`
//! variant. Holding a blended rate and a CGST/SGST pair at once, or a percent
//! and an amount at once, is not representable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::{MAX_PERCENT, MAX_QUANTITY};

// =============================================================================
// Percent
// =============================================================================

/// A percentage, stored as the human number (`9` means 9%).
///
/// Used for tax rates (blended, CGST, SGST) and discount percentages.
/// Values above 100 are representable. The aggregator applies at most
/// `MAX_PERCENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Returns the percentage as a number (`9` for 9%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies this percentage to an amount: `base * pct / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    /// use bizdesk_core::types::Percent;
    ///
    /// let tax = Percent::from(18).of(Money::from_cents(100_000));
    /// assert_eq!(tax, Money::from_cents(18_000));
    /// ```
    #[inline]
    pub fn of(&self, base: Money) -> Money {
        Money::new(base.amount() * (self.0 / Decimal::ONE_HUNDRED))
    }

    /// Clamps into `0..=MAX_PERCENT`.
    #[inline]
    pub fn clamp_input(self) -> Self {
        Percent(self.0.clamp(Decimal::ZERO, Decimal::from(MAX_PERCENT)))
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::ZERO
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

impl From<i32> for Percent {
    fn from(value: i32) -> Self {
        Percent(Decimal::from(value))
    }
}

impl From<i64> for Percent {
    fn from(value: i64) -> Self {
        Percent(Decimal::from(value))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Quantity of a line. Fractional values are allowed for weight/volume units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(#[ts(type = "string")] Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);
    pub const ONE: Quantity = Quantity(Decimal::ONE);

    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Quantity(value)
    }

    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Clamps into `0..=MAX_QUANTITY`.
    #[inline]
    pub fn clamp_input(self) -> Self {
        Quantity(self.0.clamp(Decimal::ZERO, Decimal::from(MAX_QUANTITY)))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ONE
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity(value)
    }
}

impl From<i32> for Quantity {
    fn from(value: i32) -> Self {
        Quantity(Decimal::from(value))
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity(Decimal::from(value))
    }
}

// =============================================================================
// Line Tax
// =============================================================================

/// How a single line is taxed.
///
/// ## Variants
/// - `None`: no tax (absence of any rate)
/// - `Single`: one blended rate, used by the inventory-linked invoice form
///   and by orders
/// - `Gst`: CGST + SGST pair, used by the formal printable invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LineTax {
    #[default]
    None,
    Single {
        rate: Percent,
    },
    Gst {
        cgst_rate: Percent,
        sgst_rate: Percent,
    },
}

impl LineTax {
    /// Builds the tax representation from the loose store columns.
    ///
    /// ## Resolution
    /// - Either CGST or SGST present → `Gst` (a missing half counts as 0)
    /// - Otherwise a blended rate present → `Single`
    /// - Otherwise → `None`
    pub fn from_rates(
        tax_rate: Option<Percent>,
        cgst_rate: Option<Percent>,
        sgst_rate: Option<Percent>,
    ) -> Self {
        match (cgst_rate, sgst_rate, tax_rate) {
            (None, None, Some(rate)) => LineTax::Single { rate },
            (None, None, None) => LineTax::None,
            (cgst, sgst, _) => LineTax::Gst {
                cgst_rate: cgst.unwrap_or_default(),
                sgst_rate: sgst.unwrap_or_default(),
            },
        }
    }

    /// The same representation with every rate clamped into range.
    pub fn clamp_input(self) -> Self {
        match self {
            LineTax::None => LineTax::None,
            LineTax::Single { rate } => LineTax::Single {
                rate: rate.clamp_input(),
            },
            LineTax::Gst {
                cgst_rate,
                sgst_rate,
            } => LineTax::Gst {
                cgst_rate: cgst_rate.clamp_input(),
                sgst_rate: sgst_rate.clamp_input(),
            },
        }
    }

    /// The blended rate, if this line uses one.
    pub fn tax_rate(&self) -> Option<Percent> {
        match self {
            LineTax::Single { rate } => Some(*rate),
            _ => None,
        }
    }

    /// The CGST rate, if this line uses the GST pair.
    pub fn cgst_rate(&self) -> Option<Percent> {
        match self {
            LineTax::Gst { cgst_rate, .. } => Some(*cgst_rate),
            _ => None,
        }
    }

    /// The SGST rate, if this line uses the GST pair.
    pub fn sgst_rate(&self) -> Option<Percent> {
        match self {
            LineTax::Gst { sgst_rate, .. } => Some(*sgst_rate),
            _ => None,
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount held by a line or by a whole document.
///
/// ## Percent vs Amount
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  State          Edit                      Result                       │
/// │  ─────────────  ────────────────────────  ───────────────────────────  │
/// │  Amount(50)     with_percent(10)          Percent(10)  (amount gone)   │
/// │  Percent(10)    with_amount(50)           Amount(50)   (percent gone)  │
/// │  Amount(50)     with_percent(0)           Amount(50)   (zero % inert)  │
/// │  Percent(10)    with_percent(0)           None                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
/// The two are never summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    Percent(Percent),
    Amount(Money),
}

impl Discount {
    /// Resolves the two raw discount fields into one authoritative discount.
    ///
    /// A nonzero percent wins and the amount is ignored. Otherwise a nonzero
    /// amount is used as-is.
    pub fn resolve(percent: Option<Percent>, amount: Option<Money>) -> Self {
        match (percent, amount) {
            (Some(p), _) if !p.is_zero() => Discount::Percent(p),
            (_, Some(a)) if !a.is_zero() => Discount::Amount(a),
            _ => Discount::None,
        }
    }

    /// Applies an edit to the percent field.
    ///
    /// A nonzero percent replaces whatever was held. A zero percent clears a
    /// held percent and leaves a held amount alone.
    pub fn with_percent(self, percent: Percent) -> Self {
        if !percent.is_zero() {
            return Discount::Percent(percent);
        }
        match self {
            Discount::Percent(_) => Discount::None,
            other => other,
        }
    }

    /// Applies an edit to the amount field.
    ///
    /// A nonzero amount replaces whatever was held. A zero amount clears a
    /// held amount and leaves a held percent alone.
    pub fn with_amount(self, amount: Money) -> Self {
        if !amount.is_zero() {
            return Discount::Amount(amount);
        }
        match self {
            Discount::Amount(_) => Discount::None,
            other => other,
        }
    }

    /// The same discount with its input clamped into range.
    pub fn clamp_input(self) -> Self {
        match self {
            Discount::None => Discount::None,
            Discount::Percent(p) => Discount::Percent(p.clamp_input()),
            Discount::Amount(a) => Discount::Amount(a.clamp_input()),
        }
    }

    /// Monetary value of this discount against `base`.
    pub fn amount_on(&self, base: Money) -> Money {
        match self {
            Discount::None => Money::ZERO,
            Discount::Percent(p) => p.of(base),
            Discount::Amount(a) => *a,
        }
    }

    /// The percent input, if the discount is percent-based.
    pub fn percent(&self) -> Option<Percent> {
        match self {
            Discount::Percent(p) => Some(*p),
            _ => None,
        }
    }

    /// The absolute input, if the discount is amount-based.
    pub fn fixed_amount(&self) -> Option<Money> {
        match self {
            Discount::Amount(a) => Some(*a),
            _ => None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Discount::None)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced row of an invoice or order.
///
/// ## Lifecycle
/// - Created with defaults (quantity 1, price 0, no tax, no discount) when
///   the user adds a row
/// - Mutated in place on every field edit
/// - Removed by index
/// - Only the raw fields below are authoritative; every amount is derived
///   by [`crate::line::compute_line`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Free-text description shown on the document.
    pub description: String,

    /// Catalog item this row was filled from, if any.
    pub catalog_id: Option<String>,

    pub quantity: Quantity,

    pub unit_price: Money,

    pub tax: LineTax,

    pub discount: Discount,
}

impl LineItem {
    /// Creates an untaxed, undiscounted line.
    pub fn new(description: impl Into<String>, quantity: Quantity, unit_price: Money) -> Self {
        LineItem {
            description: description.into(),
            catalog_id: None,
            quantity,
            unit_price,
            tax: LineTax::None,
            discount: Discount::None,
        }
    }

    /// Sets a blended tax rate.
    pub fn with_tax_rate(mut self, rate: Percent) -> Self {
        self.tax = LineTax::Single { rate };
        self
    }

    /// Sets a CGST/SGST pair.
    pub fn with_gst(mut self, cgst_rate: Percent, sgst_rate: Percent) -> Self {
        self.tax = LineTax::Gst {
            cgst_rate,
            sgst_rate,
        };
        self
    }

    /// Sets the discount percent, superseding any discount amount.
    pub fn with_discount_percent(mut self, percent: Percent) -> Self {
        self.discount = self.discount.with_percent(percent);
        self
    }

    /// Sets the discount amount, superseding any discount percent.
    pub fn with_discount_amount(mut self, amount: Money) -> Self {
        self.discount = self.discount.with_amount(amount);
        self
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::new(String::new(), Quantity::ONE, Money::ZERO)
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// An inventory/catalog entry a row can be filled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
}

// =============================================================================
// Document Kind
// =============================================================================

/// The kind of document a draft or record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Order,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Order => "order",
        }
    }

    /// Prefix used for human-readable document numbers.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INV",
            DocumentKind::Order => "ORD",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(DocumentKind::Invoice),
            "order" => Ok(DocumentKind::Order),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

// =============================================================================
// Tax Model
// =============================================================================

/// Which tax representation a document's lines use.
///
/// ## Call Sites
/// - `Single`: invoice form against inventory items, order creation
/// - `Gst`: printable / emailable invoice with CGST and SGST columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxModel {
    #[default]
    Single,
    Gst,
}

impl TaxModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxModel::Single => "single",
            TaxModel::Gst => "gst",
        }
    }

    /// Whether a line's tax representation is allowed under this model.
    ///
    /// `LineTax::None` is always allowed.
    pub fn accepts(&self, tax: &LineTax) -> bool {
        matches!(
            (self, tax),
            (_, LineTax::None)
                | (TaxModel::Single, LineTax::Single { .. })
                | (TaxModel::Gst, LineTax::Gst { .. })
        )
    }

    /// Label used in error messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            TaxModel::Single => "single-rate",
            TaxModel::Gst => "CGST/SGST",
        }
    }
}

impl FromStr for TaxModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(TaxModel::Single),
            "gst" => Ok(TaxModel::Gst),
            other => Err(format!("unknown tax model '{}'", other)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        let base = Money::from_cents(100_000);
        assert_eq!(Percent::from(18).of(base), Money::from_cents(18_000));
        assert_eq!(Percent::new(dec!(2.5)).of(base), Money::from_cents(2_500));
        assert_eq!(Percent::ZERO.of(base), Money::ZERO);
    }

    #[test]
    fn test_inputs_clamp_into_range() {
        assert_eq!(Quantity::from(-3).clamp_input(), Quantity::ZERO);
        assert_eq!(
            Quantity::new(Decimal::MAX).clamp_input(),
            Quantity::from(MAX_QUANTITY)
        );
        assert_eq!(Percent::from(18).clamp_input(), Percent::from(18));
        assert_eq!(
            Percent::new(Decimal::MAX).clamp_input(),
            Percent::from(MAX_PERCENT)
        );

        let tax = LineTax::Gst {
            cgst_rate: Percent::new(Decimal::MAX),
            sgst_rate: Percent::from(-9),
        };
        assert_eq!(
            tax.clamp_input(),
            LineTax::Gst {
                cgst_rate: Percent::from(MAX_PERCENT),
                sgst_rate: Percent::ZERO
            }
        );
        assert_eq!(
            Discount::Amount(Money::new(Decimal::MAX)).clamp_input(),
            Discount::Amount(Money::new(Decimal::from(crate::MAX_AMOUNT)))
        );
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::from(9).to_string(), "9%");
        assert_eq!(Percent::new(dec!(8.250)).to_string(), "8.25%");
    }

    #[test]
    fn test_line_item_defaults() {
        let item = LineItem::default();
        assert_eq!(item.quantity, Quantity::ONE);
        assert_eq!(item.unit_price, Money::ZERO);
        assert_eq!(item.tax, LineTax::None);
        assert_eq!(item.discount, Discount::None);
    }

    #[test]
    fn test_discount_percent_supersedes_amount() {
        let d = Discount::Amount(Money::from_cents(5_000)).with_percent(Percent::from(10));
        assert_eq!(d, Discount::Percent(Percent::from(10)));
        assert_eq!(d.fixed_amount(), None);
    }

    #[test]
    fn test_discount_amount_supersedes_percent() {
        let d = Discount::Percent(Percent::from(10)).with_amount(Money::from_cents(5_000));
        assert_eq!(d, Discount::Amount(Money::from_cents(5_000)));
        assert_eq!(d.percent(), None);
    }

    #[test]
    fn test_zero_percent_edit_keeps_amount() {
        let d = Discount::Amount(Money::from_cents(5_000)).with_percent(Percent::ZERO);
        assert_eq!(d, Discount::Amount(Money::from_cents(5_000)));

        let d = Discount::Percent(Percent::from(5)).with_percent(Percent::ZERO);
        assert!(d.is_none());
    }

    #[test]
    fn test_discount_resolve() {
        let pct = Some(Percent::from(10));
        let amt = Some(Money::from_cents(5_000));

        assert_eq!(Discount::resolve(pct, amt), Discount::Percent(Percent::from(10)));
        assert_eq!(
            Discount::resolve(Some(Percent::ZERO), amt),
            Discount::Amount(Money::from_cents(5_000))
        );
        assert_eq!(Discount::resolve(None, Some(Money::ZERO)), Discount::None);
        assert_eq!(Discount::resolve(None, None), Discount::None);
    }

    #[test]
    fn test_discount_amount_on() {
        let base = Money::from_cents(100_000);
        assert_eq!(
            Discount::Percent(Percent::from(10)).amount_on(base),
            Money::from_cents(10_000)
        );
        assert_eq!(
            Discount::Amount(Money::from_cents(5_000)).amount_on(base),
            Money::from_cents(5_000)
        );
        assert_eq!(Discount::None.amount_on(base), Money::ZERO);
    }

    #[test]
    fn test_line_tax_from_rates() {
        let nine = Some(Percent::from(9));
        assert_eq!(
            LineTax::from_rates(None, nine, nine),
            LineTax::Gst {
                cgst_rate: Percent::from(9),
                sgst_rate: Percent::from(9)
            }
        );
        assert_eq!(
            LineTax::from_rates(Some(Percent::from(18)), None, None),
            LineTax::Single {
                rate: Percent::from(18)
            }
        );
        assert_eq!(
            LineTax::from_rates(None, nine, None),
            LineTax::Gst {
                cgst_rate: Percent::from(9),
                sgst_rate: Percent::ZERO
            }
        );
        assert_eq!(LineTax::from_rates(None, None, None), LineTax::None);
    }

    #[test]
    fn test_tax_model_accepts() {
        let gst = LineTax::Gst {
            cgst_rate: Percent::from(9),
            sgst_rate: Percent::from(9),
        };
        let single = LineTax::Single {
            rate: Percent::from(18),
        };

        assert!(TaxModel::Gst.accepts(&gst));
        assert!(!TaxModel::Gst.accepts(&single));
        assert!(TaxModel::Single.accepts(&single));
        assert!(!TaxModel::Single.accepts(&gst));
        assert!(TaxModel::Single.accepts(&LineTax::None));
    }

    #[test]
    fn test_document_kind_round_trip() {
        assert_eq!("invoice".parse::<DocumentKind>().unwrap(), DocumentKind::Invoice);
        assert_eq!(" Order ".parse::<DocumentKind>().unwrap(), DocumentKind::Order);
        assert!("quote".parse::<DocumentKind>().is_err());
        assert_eq!(DocumentKind::Invoice.number_prefix(), "INV");
    }

    #[test]
    fn test_discount_serde_shape() {
        let json = serde_json::to_value(Discount::Percent(Percent::from(5))).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "percent", "value": "5" }));
    }
}
