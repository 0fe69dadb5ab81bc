//! # Parsing Boundary
//!
//! Turns loosely typed records from the hosted store (nullable columns,
//! numbers sent as strings, blank form text) into strongly typed
//! [`LineItem`]s. Every record is normalized once, here, and nothing
//! partially validated reaches the aggregator.
//!
//! ## Zero Fallback
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw value              Normalized                                      │
//! │  ─────────────────────  ──────────                                      │
//! │  12.5  /  "12.5"        12.5                                            │
//! │  " 7 "                  7                                               │
//! │  "1e3"                  1000                                            │
//! │  "abc" / "" / true      0   (logged at debug)                           │
//! │  null / missing         0   (rates: absent, i.e. no tax)                │
//! │  -4                     0   (negative inputs are clamped)               │
//! │  1e20                   1e9 (quantity, price; percents cap at 1000)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A parse failure is never an error at this layer; surfacing it to the user
//! is the form's job.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crate::config::BillingConfig;
use crate::draft::DocumentDraft;
use crate::money::Money;
use crate::types::{Discount, DocumentKind, LineItem, LineTax, Percent, Quantity, TaxModel};

// =============================================================================
// Raw Shapes
// =============================================================================

/// A line item as the external store or a form submits it.
///
/// Field names follow the store's snake_case columns; camelCase aliases
/// accept what the web forms post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLineItem {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "catalogId", alias = "item_id", alias = "itemId")]
    pub catalog_id: Option<String>,

    #[serde(default)]
    pub quantity: Value,

    #[serde(default, alias = "unitPrice", alias = "price")]
    pub unit_price: Value,

    #[serde(default, alias = "taxRate")]
    pub tax_rate: Value,

    #[serde(default, alias = "cgstRate")]
    pub cgst_rate: Value,

    #[serde(default, alias = "sgstRate")]
    pub sgst_rate: Value,

    #[serde(default, alias = "discountPercent")]
    pub discount_percent: Value,

    #[serde(default, alias = "discountAmount")]
    pub discount_amount: Value,
}

/// A whole invoice/order as the store returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default, alias = "taxModel")]
    pub tax_model: Option<String>,

    #[serde(default, alias = "lineItems", alias = "line_items")]
    pub items: Vec<RawLineItem>,

    #[serde(default, alias = "discountPercent")]
    pub discount_percent: Value,

    #[serde(default, alias = "discountAmount")]
    pub discount_amount: Value,
}

// =============================================================================
// Number Parsing
// =============================================================================

/// Parses a loose JSON value into a non-negative decimal, defaulting to 0.
pub fn parse_number(value: &Value) -> Decimal {
    parse_optional(value).unwrap_or(Decimal::ZERO)
}

/// Parses form text into a non-negative decimal, defaulting to 0.
///
/// ## Example
/// ```rust
/// use bizdesk_core::normalize::parse_number_text;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_number_text(" 12.50 "), Decimal::new(125, 1));
/// assert_eq!(parse_number_text("twelve"), Decimal::ZERO);
/// assert_eq!(parse_number_text("-3"), Decimal::ZERO);
/// ```
pub fn parse_number_text(text: &str) -> Decimal {
    match parse_decimal_str(text) {
        Some(d) => clamp_non_negative(d),
        None => {
            if !text.trim().is_empty() {
                debug!(raw = %text, "Non-numeric input normalized to zero");
            }
            Decimal::ZERO
        }
    }
}

/// Parses a loose JSON value, keeping "absent" distinct from zero.
///
/// `null` and missing fields give `None`. Anything present but unparseable
/// gives `Some(0)`.
fn parse_optional(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    };

    match parsed {
        Some(d) => Some(clamp_non_negative(d)),
        None => {
            debug!(raw = %value, "Non-numeric value normalized to zero");
            Some(Decimal::ZERO)
        }
    }
}

fn parse_decimal_str(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn clamp_non_negative(d: Decimal) -> Decimal {
    if d < Decimal::ZERO {
        debug!(value = %d, "Negative input clamped to zero");
        Decimal::ZERO
    } else {
        d
    }
}

// =============================================================================
// Normalization
// =============================================================================

impl RawLineItem {
    /// Normalizes this record into a typed line item.
    ///
    /// ## Field Rules
    /// - quantity, unit price: zero fallback
    /// - tax: CGST/SGST present → GST pair; else blended rate present →
    ///   single; else untaxed
    /// - discount: nonzero percent wins over amount
    /// - every numeric field is clamped to the `MAX_*` input bounds
    pub fn normalize(&self) -> LineItem {
        let tax = LineTax::from_rates(
            parse_optional(&self.tax_rate).map(Percent::new),
            parse_optional(&self.cgst_rate).map(Percent::new),
            parse_optional(&self.sgst_rate).map(Percent::new),
        );

        let discount = Discount::resolve(
            parse_optional(&self.discount_percent).map(Percent::new),
            parse_optional(&self.discount_amount).map(Money::new),
        );

        LineItem {
            description: self.description.clone().unwrap_or_default(),
            catalog_id: self.catalog_id.clone().filter(|id| !id.trim().is_empty()),
            quantity: Quantity::new(parse_number(&self.quantity)).clamp_input(),
            unit_price: Money::new(parse_number(&self.unit_price)).clamp_input(),
            tax: tax.clamp_input(),
            discount: discount.clamp_input(),
        }
    }
}

impl RawDocument {
    /// Parses a raw JSON document.
    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Document-level discount after exclusivity resolution.
    pub fn discount(&self) -> Discount {
        Discount::resolve(
            parse_optional(&self.discount_percent).map(Percent::new),
            parse_optional(&self.discount_amount).map(Money::new),
        )
        .clamp_input()
    }

    /// Normalizes into an editable draft.
    ///
    /// ## Defaults
    /// - Unknown or missing kind → invoice
    /// - Unknown or missing tax model → inferred from the lines (any GST
    ///   line makes it a GST document), else single-rate
    pub fn into_draft(self, config: &BillingConfig) -> DocumentDraft {
        let items: Vec<LineItem> = self.items.iter().map(RawLineItem::normalize).collect();

        let kind = self
            .kind
            .as_deref()
            .and_then(|k| k.parse::<DocumentKind>().ok())
            .unwrap_or(DocumentKind::Invoice);

        let tax_model = self
            .tax_model
            .as_deref()
            .and_then(|m| m.parse::<TaxModel>().ok())
            .unwrap_or_else(|| infer_tax_model(&items));

        let discount = self.discount();

        DocumentDraft::from_parts(kind, tax_model, items, discount, config)
    }
}

fn infer_tax_model(items: &[LineItem]) -> TaxModel {
    if items.iter().any(|i| matches!(i.tax, LineTax::Gst { .. })) {
        TaxModel::Gst
    } else {
        TaxModel::Single
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
