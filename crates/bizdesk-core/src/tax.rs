//! # Tax Policy
//!
//! The GST specialization (CGST + SGST) and the calculation switches the
//! aggregator and totalizer consume.
//!
//! ## Two Tax Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice form (inventory)        Printable GST invoice                  │
//! │  ────────────────────────        ─────────────────────                  │
//! │  tax_rate = 18%                  cgst_rate = 9%   sgst_rate = 9%        │
//! │        │                               │               │                │
//! │        ▼                               ▼               ▼                │
//! │  tax = base × 18 / 100           cgst = base×9/100  sgst = base×9/100   │
//! │                                        │               │                │
//! │                                        └──── tax ──────┘                │
//! │                                                                         │
//! │  Both shapes feed the same aggregator; only the GST path keeps the     │
//! │  two components apart all the way to the persisted record.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Jurisdiction
//! A different two-component (or single-component) regime replaces this
//! module. `line` and `totals` only see [`TaxComponents`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LineTax, Percent};

// =============================================================================
// GST Rates
// =============================================================================

/// The CGST/SGST pair stamped on new rows of a GST document.
///
/// Each line keeps its own copy of the rates; the aggregator never reads
/// this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstRates {
    pub cgst_rate: Percent,
    pub sgst_rate: Percent,
}

impl GstRates {
    pub fn new(cgst_rate: Percent, sgst_rate: Percent) -> Self {
        GstRates {
            cgst_rate,
            sgst_rate,
        }
    }

    /// Combined rate (CGST + SGST).
    pub fn combined(&self) -> Percent {
        Percent::new(self.cgst_rate.value() + self.sgst_rate.value())
    }

    /// The line tax representation for these rates.
    pub fn line_tax(&self) -> LineTax {
        LineTax::Gst {
            cgst_rate: self.cgst_rate,
            sgst_rate: self.sgst_rate,
        }
    }
}

impl Default for GstRates {
    /// 9% + 9%, the standard intra-state split.
    fn default() -> Self {
        GstRates::new(Percent::from(9), Percent::from(9))
    }
}

// =============================================================================
// Tax Components
// =============================================================================

/// Tax owed by one line, split by component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxComponents {
    /// Central component (GST lines only).
    pub cgst: Money,
    /// State component (GST lines only).
    pub sgst: Money,
    /// Blended single-rate tax.
    pub single: Money,
}

impl TaxComponents {
    /// Computes each component against `taxable`.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    /// use bizdesk_core::tax::TaxComponents;
    /// use bizdesk_core::tax::GstRates;
    ///
    /// let parts = TaxComponents::compute(&GstRates::default().line_tax(), Money::from_cents(100_000));
    /// assert_eq!(parts.cgst, Money::from_cents(9_000));
    /// assert_eq!(parts.sgst, Money::from_cents(9_000));
    /// assert_eq!(parts.total(), Money::from_cents(18_000));
    /// ```
    pub fn compute(tax: &LineTax, taxable: Money) -> Self {
        match tax {
            LineTax::None => TaxComponents::default(),
            LineTax::Single { rate } => TaxComponents {
                single: rate.of(taxable),
                ..TaxComponents::default()
            },
            LineTax::Gst {
                cgst_rate,
                sgst_rate,
            } => TaxComponents {
                cgst: cgst_rate.of(taxable),
                sgst: sgst_rate.of(taxable),
                ..TaxComponents::default()
            },
        }
    }

    /// Unified tax figure for code paths that do not care about the split.
    pub fn total(&self) -> Money {
        self.cgst + self.sgst + self.single
    }
}

// =============================================================================
// Calculation Policy
// =============================================================================

/// Which base a line's tax is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxBasis {
    /// Tax on `quantity × unit_price`, ignoring the line discount.
    /// Every existing call site behaves this way.
    #[default]
    PreDiscount,
    /// Tax on `quantity × unit_price − line discount`.
    PostDiscount,
}

impl FromStr for TaxBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pre_discount" | "pre" => Ok(TaxBasis::PreDiscount),
            "post_discount" | "post" => Ok(TaxBasis::PostDiscount),
            other => Err(format!("unknown tax basis '{}'", other)),
        }
    }
}

/// What happens when discounts push a total below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NegativeTotalPolicy {
    /// Negative line and grand totals are reported as-is.
    #[default]
    Allow,
    /// Line totals and the grand total are floored at zero.
    ClampToZero,
}

impl FromStr for NegativeTotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "allow" => Ok(NegativeTotalPolicy::Allow),
            "clamp" | "clamp_to_zero" => Ok(NegativeTotalPolicy::ClampToZero),
            other => Err(format!("unknown negative total policy '{}'", other)),
        }
    }
}

impl NegativeTotalPolicy {
    /// Applies the policy to a computed total.
    #[inline]
    pub fn apply(&self, total: Money) -> Money {
        match self {
            NegativeTotalPolicy::Allow => total,
            NegativeTotalPolicy::ClampToZero => total.max_zero(),
        }
    }
}

/// Switches consumed by `compute_line_with` and `compute_totals_with`.
///
/// `CalcPolicy::default()` reproduces the observed behaviour: pre-discount
/// tax, no clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalcPolicy {
    pub tax_basis: TaxBasis,
    pub negative_totals: NegativeTotalPolicy,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_gst_rates() {
        let rates = GstRates::default();
        assert_eq!(rates.cgst_rate, Percent::from(9));
        assert_eq!(rates.sgst_rate, Percent::from(9));
        assert_eq!(rates.combined(), Percent::from(18));
    }

    #[test]
    fn test_components_use_line_rates() {
        let tax = LineTax::Gst {
            cgst_rate: Percent::new(dec!(2.5)),
            sgst_rate: Percent::new(dec!(2.5)),
        };
        let parts = TaxComponents::compute(&tax, Money::from_cents(40_000));
        assert_eq!(parts.cgst, Money::from_cents(1_000));
        assert_eq!(parts.sgst, Money::from_cents(1_000));
        assert_eq!(parts.single, Money::ZERO);
    }

    #[test]
    fn test_components_single_rate() {
        let tax = LineTax::Single {
            rate: Percent::from(18),
        };
        let parts = TaxComponents::compute(&tax, Money::from_cents(100_000));
        assert_eq!(parts.single, Money::from_cents(18_000));
        assert_eq!(parts.cgst, Money::ZERO);
        assert_eq!(parts.total(), Money::from_cents(18_000));
    }

    #[test]
    fn test_components_untaxed() {
        let parts = TaxComponents::compute(&LineTax::None, Money::from_cents(100_000));
        assert_eq!(parts.total(), Money::ZERO);
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("post-discount".parse::<TaxBasis>().unwrap(), TaxBasis::PostDiscount);
        assert_eq!("PRE_DISCOUNT".parse::<TaxBasis>().unwrap(), TaxBasis::PreDiscount);
        assert!("after".parse::<TaxBasis>().is_err());

        assert_eq!(
            "clamp".parse::<NegativeTotalPolicy>().unwrap(),
            NegativeTotalPolicy::ClampToZero
        );
        assert!("floor".parse::<NegativeTotalPolicy>().is_err());
    }

    #[test]
    fn test_negative_total_policy() {
        let negative = Money::from_cents(-500);
        assert_eq!(NegativeTotalPolicy::Allow.apply(negative), negative);
        assert_eq!(NegativeTotalPolicy::ClampToZero.apply(negative), Money::ZERO);
    }

    #[test]
    fn test_default_policy_is_observed_behaviour() {
        let policy = CalcPolicy::default();
        assert_eq!(policy.tax_basis, TaxBasis::PreDiscount);
        assert_eq!(policy.negative_totals, NegativeTotalPolicy::Allow);
    }
}
