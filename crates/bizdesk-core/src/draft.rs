//! # Document Draft
//!
//! The in-memory editing model behind the invoice and order forms.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  Form Action              Draft Method                 State Change     │
//! │  ───────────              ────────────                 ────────────     │
//! │                                                                         │
//! │  Click "Add row" ────────► add_row() ────────────────► items.push(..)  │
//! │                                                                         │
//! │  Type in a cell ─────────► set_quantity(i, ..) ──────► items[i].qty    │
//! │                            set_unit_price(i, ..)                       │
//! │                            set_tax_rate(i, ..)                         │
//! │                                                                         │
//! │  Pick inventory item ────► fill_from_catalog(i, id) ─► name + price    │
//! │                                                                         │
//! │  Click remove ───────────► remove_row(i) ────────────► items.remove(i) │
//! │                                                                         │
//! │  Any redraw ─────────────► totals() ─────────────────► (read only)     │
//! │                                                                         │
//! │  Click "Save" ───────────► to_record() ──────────────► DocumentRecord  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Only raw fields are stored; every amount is recomputed on read
//! - Rows are addressed by position; removal shifts later rows up
//! - A draft is owned by one form; there is no locking here

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::config::BillingConfig;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::line::{compute_line_with, LineBreakdown};
use crate::money::Money;
use crate::record::DocumentRecord;
use crate::tax::CalcPolicy;
use crate::totals::{fold_breakdowns, DocumentTotals};
use crate::types::{
    CatalogItem, Discount, DocumentKind, LineItem, LineTax, Percent, Quantity, TaxModel,
};
use crate::validation::{
    validate_amount, validate_description, validate_discount_percent, validate_line_item,
    validate_quantity, validate_rate,
};
use crate::{MAX_DESCRIPTION_LEN, MAX_LINE_ITEMS};

/// An invoice or order being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDraft {
    kind: DocumentKind,
    tax_model: TaxModel,
    items: Vec<LineItem>,
    discount: Discount,
    policy: CalcPolicy,
    /// Tax stamped on rows created by `add_row`.
    new_row_tax: LineTax,
}

impl DocumentDraft {
    /// Creates an empty draft with the default configuration.
    pub fn new(kind: DocumentKind, tax_model: TaxModel) -> Self {
        Self::with_config(kind, tax_model, &BillingConfig::default())
    }

    /// Creates an empty draft using the given configuration's rates and policy.
    pub fn with_config(kind: DocumentKind, tax_model: TaxModel, config: &BillingConfig) -> Self {
        Self::from_parts(kind, tax_model, Vec::new(), Discount::None, config)
    }

    /// Rebuilds a draft from already normalized parts.
    pub fn from_parts(
        kind: DocumentKind,
        tax_model: TaxModel,
        items: Vec<LineItem>,
        discount: Discount,
        config: &BillingConfig,
    ) -> Self {
        DocumentDraft {
            kind,
            tax_model,
            items,
            discount,
            policy: config.calc_policy(),
            new_row_tax: config.default_line_tax(tax_model),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn tax_model(&self) -> TaxModel {
        self.tax_model
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Document-level discount.
    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn policy(&self) -> &CalcPolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Row Management
    // =========================================================================

    /// Appends a default row and returns its index.
    ///
    /// ## Defaults
    /// Quantity 1, price 0, no discount, and the configured tax for this
    /// document's tax model.
    pub fn add_row(&mut self) -> CoreResult<usize> {
        if self.items.len() >= MAX_LINE_ITEMS {
            return Err(CoreError::TooManyLines {
                max: MAX_LINE_ITEMS,
            });
        }

        self.items.push(LineItem {
            tax: self.new_row_tax,
            ..LineItem::default()
        });

        let index = self.items.len() - 1;
        debug!(kind = %self.kind, index, "Added row");
        Ok(index)
    }

    /// Removes the row at `index` and returns it. Later rows shift up.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<LineItem> {
        self.check_index(index)?;
        let removed = self.items.remove(index);
        debug!(kind = %self.kind, index, remaining = self.items.len(), "Removed row");
        Ok(removed)
    }

    // =========================================================================
    // Row Field Edits
    // =========================================================================

    /// Sets a row's description. Blank is allowed while editing.
    pub fn set_description(&mut self, index: usize, description: impl Into<String>) -> CoreResult<()> {
        let description = description.into();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            }
            .into());
        }

        self.row_mut(index)?.description = description;
        Ok(())
    }

    pub fn set_quantity(&mut self, index: usize, quantity: Quantity) -> CoreResult<()> {
        validate_quantity(quantity)?;
        self.row_mut(index)?.quantity = quantity;
        trace!(index, quantity = %quantity.value(), "Quantity updated");
        Ok(())
    }

    pub fn set_unit_price(&mut self, index: usize, unit_price: Money) -> CoreResult<()> {
        validate_amount("unit_price", unit_price)?;
        self.row_mut(index)?.unit_price = unit_price;
        trace!(index, unit_price = %unit_price, "Unit price updated");
        Ok(())
    }

    /// Sets a blended tax rate. Only single-rate documents accept one.
    pub fn set_tax_rate(&mut self, index: usize, rate: Percent) -> CoreResult<()> {
        self.require_model(TaxModel::Single)?;
        validate_rate("tax_rate", rate)?;
        self.row_mut(index)?.tax = LineTax::Single { rate };
        trace!(index, rate = %rate, "Tax rate updated");
        Ok(())
    }

    /// Sets the CGST/SGST pair. Only GST documents accept one.
    pub fn set_gst_rates(&mut self, index: usize, cgst_rate: Percent, sgst_rate: Percent) -> CoreResult<()> {
        self.require_model(TaxModel::Gst)?;
        validate_rate("cgst_rate", cgst_rate)?;
        validate_rate("sgst_rate", sgst_rate)?;
        self.row_mut(index)?.tax = LineTax::Gst {
            cgst_rate,
            sgst_rate,
        };
        trace!(index, cgst = %cgst_rate, sgst = %sgst_rate, "GST rates updated");
        Ok(())
    }

    /// Edits a row's discount percent.
    ///
    /// A nonzero percent replaces any discount amount on the row.
    pub fn set_line_discount_percent(&mut self, index: usize, percent: Percent) -> CoreResult<()> {
        validate_discount_percent(percent)?;
        let row = self.row_mut(index)?;
        row.discount = row.discount.with_percent(percent);
        Ok(())
    }

    /// Edits a row's discount amount.
    ///
    /// A nonzero amount replaces any discount percent on the row.
    pub fn set_line_discount_amount(&mut self, index: usize, amount: Money) -> CoreResult<()> {
        validate_amount("discount_amount", amount)?;
        let row = self.row_mut(index)?;
        row.discount = row.discount.with_amount(amount);
        Ok(())
    }

    // =========================================================================
    // Document Discount
    // =========================================================================

    /// Edits the document-level discount percent (applied to the subtotal).
    pub fn set_discount_percent(&mut self, percent: Percent) -> CoreResult<()> {
        validate_discount_percent(percent)?;
        self.discount = self.discount.with_percent(percent);
        trace!(discount = ?self.discount, "Document discount updated");
        Ok(())
    }

    /// Edits the document-level fixed discount.
    pub fn set_discount_amount(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("discount_amount", amount)?;
        self.discount = self.discount.with_amount(amount);
        trace!(discount = ?self.discount, "Document discount updated");
        Ok(())
    }

    // =========================================================================
    // Catalog Fill
    // =========================================================================

    /// Fills a row from a catalog item.
    ///
    /// Description, unit price and the catalog link are overwritten.
    /// Quantity, tax and discount are kept.
    pub fn apply_catalog_item(&mut self, index: usize, item: &CatalogItem) -> CoreResult<()> {
        let row = self.row_mut(index)?;
        row.description = item.name.clone();
        row.unit_price = item.unit_price;
        row.catalog_id = Some(item.id.clone());
        debug!(index, catalog_id = %item.id, "Row filled from catalog");
        Ok(())
    }

    /// Looks up `id` and fills the row with the result.
    ///
    /// On a miss the row is left exactly as it was and
    /// `CatalogItemNotFound` is returned.
    pub fn fill_from_catalog<C>(&mut self, index: usize, id: &str, catalog: &C) -> CoreResult<()>
    where
        C: Catalog + ?Sized,
    {
        self.check_index(index)?;

        match catalog.lookup(id) {
            Some(item) => self.apply_catalog_item(index, &item),
            None => {
                debug!(index, catalog_id = %id, "Catalog lookup missed; row unchanged");
                Err(CoreError::CatalogItemNotFound(id.to_string()))
            }
        }
    }

    // =========================================================================
    // Derived Figures
    // =========================================================================

    /// Per-row derived amounts, in row order.
    pub fn breakdowns(&self) -> Vec<LineBreakdown> {
        self.items
            .iter()
            .map(|item| compute_line_with(item, &self.policy))
            .collect()
    }

    /// Document totals, recomputed from the current rows.
    pub fn totals(&self) -> DocumentTotals {
        fold_breakdowns(&self.breakdowns(), &self.discount, &self.policy)
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Checks that the draft can be saved.
    ///
    /// ## Rules
    /// - At least one row
    /// - Every row has a description
    /// - Every row's numeric fields pass strict validation
    /// - Every row's tax matches the document's tax model
    pub fn validate_for_submit(&self) -> CoreResult<()> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyDocument);
        }

        for (line, item) in self.items.iter().enumerate() {
            match validate_description(&item.description) {
                Ok(()) => {}
                Err(ValidationError::Required { .. }) => {
                    return Err(CoreError::MissingDescription { line });
                }
                Err(other) => return Err(other.into()),
            }

            validate_line_item(item)?;

            if !self.tax_model.accepts(&item.tax) {
                return Err(self.mismatch());
            }
        }

        Ok(())
    }

    /// Validates and converts to the persisted shape.
    ///
    /// The record has a fresh id and no document number; the repository
    /// assigns one on first save.
    pub fn to_record(&self) -> CoreResult<DocumentRecord> {
        self.validate_for_submit()?;
        Ok(DocumentRecord::from_draft(self))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index >= self.items.len() {
            return Err(CoreError::LineIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn row_mut(&mut self, index: usize) -> CoreResult<&mut LineItem> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CoreError::LineIndexOutOfRange { index, len })
    }

    fn require_model(&self, model: TaxModel) -> CoreResult<()> {
        if self.tax_model == model {
            Ok(())
        } else {
            Err(self.mismatch())
        }
    }

    fn mismatch(&self) -> CoreError {
        CoreError::TaxModelMismatch {
            document: self.kind_label(),
            expected: self.tax_model.label().to_string(),
        }
    }

    fn kind_label(&self) -> String {
        match self.tax_model {
            TaxModel::Gst => format!("GST {}", self.kind),
            TaxModel::Single => format!("Single-rate {}", self.kind),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::tax::GstRates;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(v: i64) -> Money {
        Money::new(v.into())
    }

    fn invoice() -> DocumentDraft {
        DocumentDraft::new(DocumentKind::Invoice, TaxModel::Single)
    }

    #[test]
    fn test_new_draft_is_empty() {
        let draft = invoice();
        assert!(draft.is_empty());
        assert_eq!(draft.totals(), DocumentTotals::default());
    }

    #[test]
    fn test_add_row_defaults() {
        let mut draft = invoice();
        let index = draft.add_row().unwrap();

        assert_eq!(index, 0);
        let row = draft.item(0).unwrap();
        assert_eq!(row.quantity, Quantity::ONE);
        assert_eq!(row.unit_price, Money::ZERO);
        assert_eq!(row.tax, LineTax::None);
        assert_eq!(row.discount, Discount::None);
        assert_eq!(row.description, "");
    }

    #[test]
    fn test_gst_draft_rows_get_configured_pair() {
        let mut draft = DocumentDraft::new(DocumentKind::Invoice, TaxModel::Gst);
        draft.add_row().unwrap();
        assert_eq!(draft.item(0).unwrap().tax, GstRates::default().line_tax());
    }

    #[test]
    fn test_single_rate_rows_get_configured_rate() {
        let config = BillingConfig {
            default_tax_rate: Percent::from(18),
            ..BillingConfig::default()
        };
        let mut draft = DocumentDraft::with_config(DocumentKind::Order, TaxModel::Single, &config);
        draft.add_row().unwrap();
        assert_eq!(
            draft.item(0).unwrap().tax,
            LineTax::Single {
                rate: Percent::from(18)
            }
        );
    }

    #[test]
    fn test_edit_rows_and_totals_follow() {
        let mut draft = invoice();
        draft.add_row().unwrap();
        draft.set_description(0, "Consulting").unwrap();
        draft.set_quantity(0, Quantity::from(10)).unwrap();
        draft.set_unit_price(0, money(100)).unwrap();
        draft.set_tax_rate(0, Percent::from(18)).unwrap();
        draft.set_line_discount_percent(0, Percent::from(10)).unwrap();

        let lines = draft.breakdowns();
        assert_eq!(lines[0].line_total, money(1080));

        let totals = draft.totals();
        assert_eq!(totals.subtotal, money(1000));
        assert_eq!(totals.tax_total, money(180));
        assert_eq!(totals.line_discount_total, money(100));
    }

    #[test]
    fn test_worked_invoice_through_draft() {
        let mut draft = invoice();
        draft.add_row().unwrap();
        draft.set_unit_price(0, money(1000)).unwrap();
        draft.set_tax_rate(0, Percent::from(18)).unwrap();
        draft.add_row().unwrap();
        draft.set_unit_price(1, money(500)).unwrap();
        draft.set_line_discount_amount(1, money(50)).unwrap();
        draft.set_discount_percent(Percent::from(5)).unwrap();

        let totals = draft.totals();
        assert_eq!(totals.discount_total, money(75));
        assert_eq!(totals.grand_total, money(1605));
    }

    #[test]
    fn test_remove_row_shifts_later_rows() {
        let mut draft = invoice();
        for name in ["A", "B", "C"] {
            let i = draft.add_row().unwrap();
            draft.set_description(i, name).unwrap();
        }

        let removed = draft.remove_row(1).unwrap();
        assert_eq!(removed.description, "B");
        assert_eq!(draft.len(), 2);
        assert_eq!(draft.item(1).unwrap().description, "C");
    }

    #[test]
    fn test_out_of_range_index() {
        let mut draft = invoice();
        draft.add_row().unwrap();

        assert!(matches!(
            draft.set_quantity(3, Quantity::ONE),
            Err(CoreError::LineIndexOutOfRange { index: 3, len: 1 })
        ));
        assert!(matches!(
            draft.remove_row(1),
            Err(CoreError::LineIndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_strict_setters_reject_negatives() {
        let mut draft = invoice();
        draft.add_row().unwrap();

        assert!(matches!(
            draft.set_quantity(0, Quantity::from(-1)),
            Err(CoreError::InvalidInput(ValidationError::MustBeNonNegative { .. }))
        ));
        assert!(draft.set_unit_price(0, money(-5)).is_err());
        assert!(draft.set_tax_rate(0, Percent::from(101)).is_err());
        assert!(draft.set_line_discount_amount(0, money(-1)).is_err());

        // Rejected edits leave the row untouched
        assert_eq!(draft.item(0).unwrap(), &LineItem::default());
    }

    #[test]
    fn test_strict_setters_reject_oversized_values() {
        let mut draft = invoice();
        draft.add_row().unwrap();
        let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);

        assert!(matches!(
            draft.set_quantity(0, Quantity::new(huge)),
            Err(CoreError::InvalidInput(ValidationError::OutOfRange { .. }))
        ));
        assert!(draft.set_unit_price(0, Money::new(huge)).is_err());
        assert!(draft.set_line_discount_percent(0, Percent::new(huge)).is_err());
        assert!(draft.set_discount_amount(Money::new(huge)).is_err());
        assert_eq!(draft.item(0).unwrap(), &LineItem::default());

        // Catalog prices bypass the setters; totals still come out
        draft
            .apply_catalog_item(
                0,
                &CatalogItem {
                    id: "BIG".to_string(),
                    name: "Oversized".to_string(),
                    unit_price: Money::new(huge),
                },
            )
            .unwrap();
        draft.set_quantity(0, Quantity::from(crate::MAX_QUANTITY)).unwrap();
        let totals = draft.totals();
        assert_eq!(
            totals.subtotal.amount(),
            Decimal::from(crate::MAX_AMOUNT) * Decimal::from(crate::MAX_QUANTITY)
        );
    }

    #[test]
    fn test_tax_model_mismatch() {
        let mut single = invoice();
        single.add_row().unwrap();
        assert!(matches!(
            single.set_gst_rates(0, Percent::from(9), Percent::from(9)),
            Err(CoreError::TaxModelMismatch { .. })
        ));

        let mut gst = DocumentDraft::new(DocumentKind::Invoice, TaxModel::Gst);
        gst.add_row().unwrap();
        let err = gst.set_tax_rate(0, Percent::from(18)).unwrap_err();
        assert_eq!(err.to_string(), "GST invoice documents use CGST/SGST tax rates");
    }

    #[test]
    fn test_line_discount_exclusivity() {
        let mut draft = invoice();
        draft.add_row().unwrap();
        draft.set_unit_price(0, money(200)).unwrap();

        draft.set_line_discount_amount(0, money(50)).unwrap();
        draft.set_line_discount_percent(0, Percent::from(10)).unwrap();
        assert_eq!(draft.breakdowns()[0].discount_amount, money(20));

        // Zero percent does not revive or clear the amount path
        draft.set_line_discount_amount(0, money(30)).unwrap();
        draft.set_line_discount_percent(0, Percent::ZERO).unwrap();
        assert_eq!(draft.breakdowns()[0].discount_amount, money(30));
    }

    #[test]
    fn test_document_discount_exclusivity() {
        let mut draft = invoice();
        draft.add_row().unwrap();
        draft.set_unit_price(0, money(1000)).unwrap();

        draft.set_discount_percent(Percent::from(10)).unwrap();
        draft.set_discount_amount(money(25)).unwrap();
        assert_eq!(draft.discount(), Discount::Amount(money(25)));
        assert_eq!(draft.totals().discount_total, money(25));
    }

    #[test]
    fn test_fill_from_catalog() {
        let catalog: InMemoryCatalog = vec![CatalogItem {
            id: "sku-7".to_string(),
            name: "Copper wire 2.5mm".to_string(),
            unit_price: Money::new(dec!(42.50)),
        }]
        .into_iter()
        .collect();

        let mut draft = invoice();
        draft.add_row().unwrap();
        draft.set_quantity(0, Quantity::from(4)).unwrap();
        draft.fill_from_catalog(0, "sku-7", &catalog).unwrap();

        let row = draft.item(0).unwrap();
        assert_eq!(row.description, "Copper wire 2.5mm");
        assert_eq!(row.unit_price, Money::new(dec!(42.50)));
        assert_eq!(row.catalog_id.as_deref(), Some("sku-7"));
        assert_eq!(row.quantity, Quantity::from(4));
        assert_eq!(draft.totals().subtotal, money(170));
    }

    #[test]
    fn test_catalog_miss_leaves_row_unchanged() {
        let catalog = InMemoryCatalog::new();
        let mut draft = invoice();
        draft.add_row().unwrap();
        draft.set_description(0, "Hand typed").unwrap();
        let before = draft.clone();

        let result = draft.fill_from_catalog(0, "missing", &catalog);
        assert!(matches!(result, Err(CoreError::CatalogItemNotFound(ref id)) if id == "missing"));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_validate_for_submit() {
        let mut draft = invoice();
        assert!(matches!(draft.validate_for_submit(), Err(CoreError::EmptyDocument)));

        draft.add_row().unwrap();
        draft.set_description(0, "Ok").unwrap();
        draft.add_row().unwrap();
        assert!(matches!(
            draft.validate_for_submit(),
            Err(CoreError::MissingDescription { line: 1 })
        ));

        draft.set_description(1, "Also ok").unwrap();
        assert!(draft.validate_for_submit().is_ok());
    }

    #[test]
    fn test_submit_rejects_mixed_tax_models() {
        let items = vec![LineItem::new("A", Quantity::ONE, money(100)).with_tax_rate(Percent::from(18))];
        let draft = DocumentDraft::from_parts(
            DocumentKind::Invoice,
            TaxModel::Gst,
            items,
            Discount::None,
            &BillingConfig::default(),
        );
        assert!(matches!(
            draft.validate_for_submit(),
            Err(CoreError::TaxModelMismatch { .. })
        ));
    }

    #[test]
    fn test_too_many_lines() {
        let mut draft = invoice();
        for _ in 0..MAX_LINE_ITEMS {
            draft.add_row().unwrap();
        }
        assert!(matches!(draft.add_row(), Err(CoreError::TooManyLines { .. })));
    }

    #[test]
    fn test_to_record_carries_totals() {
        let mut draft = DocumentDraft::new(DocumentKind::Invoice, TaxModel::Gst);
        draft.add_row().unwrap();
        draft.set_description(0, "Design work").unwrap();
        draft.set_quantity(0, Quantity::from(2)).unwrap();
        draft.set_unit_price(0, money(500)).unwrap();

        let record = draft.to_record().unwrap();
        assert_eq!(record.totals, draft.totals());
        assert_eq!(record.totals.grand_total, money(1180));
        assert!(record.number.is_none());
    }
}
