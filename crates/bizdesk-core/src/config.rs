//! # Billing Configuration
//!
//! Settings that shape new drafts and the calculation policy.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BIZDESK_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after startup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::money::Money;
use crate::tax::{CalcPolicy, GstRates, NegativeTotalPolicy, TaxBasis};
use crate::types::{LineTax, Percent, TaxModel};

/// Billing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingConfig {
    /// Currency code (ISO 4217). One currency per document, no conversion.
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places shown for amounts
    pub currency_decimals: u32,

    /// Blended tax rate stamped on new rows of single-rate documents
    pub default_tax_rate: Percent,

    /// CGST/SGST pair stamped on new rows of GST documents
    pub gst_rates: GstRates,

    /// Base the line tax is computed on
    pub tax_basis: TaxBasis,

    /// Whether negative totals are floored at zero
    pub negative_totals: NegativeTotalPolicy,
}

impl Default for BillingConfig {
    /// ## Default Values
    /// - Currency: INR (₹), 2 decimals
    /// - Single-rate default: 0%
    /// - GST: 9% CGST + 9% SGST
    /// - Pre-discount tax, negative totals allowed
    fn default() -> Self {
        BillingConfig {
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            currency_decimals: 2,
            default_tax_rate: Percent::ZERO,
            gst_rates: GstRates::default(),
            tax_basis: TaxBasis::PreDiscount,
            negative_totals: NegativeTotalPolicy::Allow,
        }
    }
}

impl BillingConfig {
    /// Creates a BillingConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BIZDESK_CURRENCY_CODE`, `BIZDESK_CURRENCY_SYMBOL`
    /// - `BIZDESK_CURRENCY_DECIMALS`: e.g. "2"
    /// - `BIZDESK_TAX_RATE`: default blended rate, e.g. "18"
    /// - `BIZDESK_CGST_RATE`, `BIZDESK_SGST_RATE`: e.g. "9"
    /// - `BIZDESK_TAX_BASIS`: "pre_discount" | "post_discount"
    /// - `BIZDESK_NEGATIVE_TOTALS`: "allow" | "clamp"
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BillingConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BillingConfig::default();

        if let Some(code) = lookup("BIZDESK_CURRENCY_CODE") {
            config.currency_code = code;
        }

        if let Some(symbol) = lookup("BIZDESK_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = parse_var::<u32>(&lookup, "BIZDESK_CURRENCY_DECIMALS") {
            config.currency_decimals = decimals;
        }

        if let Some(rate) = parse_var::<Decimal>(&lookup, "BIZDESK_TAX_RATE") {
            config.default_tax_rate = Percent::new(rate);
        }

        if let Some(rate) = parse_var::<Decimal>(&lookup, "BIZDESK_CGST_RATE") {
            config.gst_rates.cgst_rate = Percent::new(rate);
        }

        if let Some(rate) = parse_var::<Decimal>(&lookup, "BIZDESK_SGST_RATE") {
            config.gst_rates.sgst_rate = Percent::new(rate);
        }

        if let Some(basis) = parse_var::<TaxBasis>(&lookup, "BIZDESK_TAX_BASIS") {
            config.tax_basis = basis;
        }

        if let Some(policy) = parse_var::<NegativeTotalPolicy>(&lookup, "BIZDESK_NEGATIVE_TOTALS") {
            config.negative_totals = policy;
        }

        config
    }

    /// The calculation policy for `compute_line_with` / `compute_totals_with`.
    pub fn calc_policy(&self) -> CalcPolicy {
        CalcPolicy {
            tax_basis: self.tax_basis,
            negative_totals: self.negative_totals,
        }
    }

    /// Tax stamped on a freshly added row of a document using `model`.
    ///
    /// A zero default blended rate means new single-rate rows are untaxed.
    pub fn default_line_tax(&self, model: TaxModel) -> LineTax {
        match model {
            TaxModel::Gst => self.gst_rates.line_tax(),
            TaxModel::Single if self.default_tax_rate.is_zero() => LineTax::None,
            TaxModel::Single => LineTax::Single {
                rate: self.default_tax_rate,
            },
        }
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::{BillingConfig, Money};
    ///
    /// let config = BillingConfig::default();
    /// assert_eq!(config.format_amount(Money::from_cents(118_000)), "₹1180.00");
    /// ```
    pub fn format_amount(&self, amount: Money) -> String {
        let rounded = amount.round_to(self.currency_decimals).amount();
        format!(
            "{}{}{:.prec$}",
            if rounded < Decimal::ZERO { "-" } else { "" },
            self.currency_symbol,
            rounded.abs(),
            prec = self.currency_decimals as usize
        )
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BillingConfig::default();
        assert_eq!(config.gst_rates, GstRates::default());
        assert_eq!(config.calc_policy(), CalcPolicy::default());
        assert_eq!(config.default_line_tax(TaxModel::Single), LineTax::None);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = BillingConfig::from_lookup(lookup_from(&[
            ("BIZDESK_CURRENCY_SYMBOL", "$"),
            ("BIZDESK_TAX_RATE", "8.25"),
            ("BIZDESK_CGST_RATE", "6"),
            ("BIZDESK_SGST_RATE", "6"),
            ("BIZDESK_TAX_BASIS", "post_discount"),
            ("BIZDESK_NEGATIVE_TOTALS", "clamp"),
        ]));

        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.default_tax_rate, Percent::new(dec!(8.25)));
        assert_eq!(config.gst_rates.combined(), Percent::from(12));
        assert_eq!(config.tax_basis, TaxBasis::PostDiscount);
        assert_eq!(config.negative_totals, NegativeTotalPolicy::ClampToZero);
        assert_eq!(
            config.default_line_tax(TaxModel::Single),
            LineTax::Single {
                rate: Percent::new(dec!(8.25))
            }
        );
    }

    #[test]
    fn test_bad_values_ignored() {
        let config = BillingConfig::from_lookup(lookup_from(&[
            ("BIZDESK_CGST_RATE", "nine"),
            ("BIZDESK_TAX_BASIS", "sideways"),
        ]));
        assert_eq!(config.gst_rates.cgst_rate, Percent::from(9));
        assert_eq!(config.tax_basis, TaxBasis::PreDiscount);
    }

    #[test]
    fn test_format_amount() {
        let config = BillingConfig::default();
        assert_eq!(config.format_amount(Money::from_cents(118_000)), "₹1180.00");
        assert_eq!(config.format_amount(Money::new(dec!(0.005))), "₹0.01");
        assert_eq!(config.format_amount(Money::from_cents(-550)), "-₹5.50");
        assert_eq!(config.format_amount(Money::ZERO), "₹0.00");
    }

    #[test]
    fn test_format_amount_zero_decimals() {
        let config = BillingConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..BillingConfig::default()
        };
        assert_eq!(config.format_amount(Money::new(dec!(1234.5))), "¥1235");
    }
}
