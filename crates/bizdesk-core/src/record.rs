//! # Document Record
//!
//! The shape a submitted invoice or order is persisted in.
//!
//! ## What Gets Stored
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DocumentRecord                                                         │
//! │  ├── id, kind, number, tax_model, timestamps                            │
//! │  ├── lines[]                                                            │
//! │  │   ├── raw inputs:   description, quantity, unit_price, rates,       │
//! │  │   │                 discount percent                                 │
//! │  │   └── derived:      base, cgst, sgst, tax, discount, line_total      │
//! │  ├── document discount inputs (percent / amount)                        │
//! │  └── totals            subtotal, cgst, sgst, tax, discounts, grand      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Derived figures are written verbatim. The print view reads them back
//! with [`DocumentRecord::redisplay_totals`] and never recomputes. The raw
//! inputs are kept so the document can be reopened for editing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::draft::DocumentDraft;
use crate::line::LineBreakdown;
use crate::money::Money;
use crate::tax::CalcPolicy;
use crate::totals::{compute_totals_with, fold_breakdowns, DocumentTotals};
use crate::types::{Discount, DocumentKind, LineItem, LineTax, Percent, Quantity, TaxModel};

// =============================================================================
// Line Record
// =============================================================================

/// One persisted row: raw inputs plus the amounts derived at submit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineRecord {
    /// Zero-based row position on the document.
    pub position: u32,

    pub description: String,

    pub catalog_id: Option<String>,

    pub quantity: Quantity,

    pub unit_price: Money,

    /// Blended rate (single-rate documents).
    pub tax_rate: Option<Percent>,

    /// CGST rate (GST documents).
    pub cgst_rate: Option<Percent>,

    /// SGST rate (GST documents).
    pub sgst_rate: Option<Percent>,

    /// Discount percent when the row's discount is percent-based.
    pub discount_percent: Option<Percent>,

    // Derived
    pub base_amount: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub tax_amount: Money,
    /// Effective discount. Also the raw input when the discount is fixed.
    pub discount_amount: Money,
    pub line_total: Money,
}

impl LineRecord {
    pub fn new(position: u32, item: &LineItem, line: &LineBreakdown) -> Self {
        LineRecord {
            position,
            description: item.description.clone(),
            catalog_id: item.catalog_id.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            tax_rate: item.tax.tax_rate(),
            cgst_rate: item.tax.cgst_rate(),
            sgst_rate: item.tax.sgst_rate(),
            discount_percent: item.discount.percent(),
            base_amount: line.base_amount,
            cgst_amount: line.cgst_amount,
            sgst_amount: line.sgst_amount,
            tax_amount: line.tax_amount,
            discount_amount: line.discount_amount,
            line_total: line.line_total,
        }
    }

    /// Rebuilds the editable line from the raw columns.
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            description: self.description.clone(),
            catalog_id: self.catalog_id.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax: LineTax::from_rates(self.tax_rate, self.cgst_rate, self.sgst_rate),
            discount: Discount::resolve(self.discount_percent, Some(self.discount_amount)),
        }
    }

    /// The persisted derived amounts.
    pub fn breakdown(&self) -> LineBreakdown {
        LineBreakdown {
            base_amount: self.base_amount,
            cgst_amount: self.cgst_amount,
            sgst_amount: self.sgst_amount,
            tax_amount: self.tax_amount,
            discount_amount: self.discount_amount,
            line_total: self.line_total,
        }
    }
}

// =============================================================================
// Document Record
// =============================================================================

/// A submitted invoice or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub kind: DocumentKind,

    /// Human-readable number (e.g. `INV-20260115-0007`), assigned on first save.
    pub number: Option<String>,

    pub tax_model: TaxModel,

    pub lines: Vec<LineRecord>,

    /// Document discount percent input, if percent-based.
    pub discount_percent: Option<Percent>,

    /// Document discount amount input, if fixed.
    pub discount_amount: Option<Money>,

    /// Totals as computed at submit time.
    pub totals: DocumentTotals,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Snapshots a draft: raw inputs, per-line amounts and totals from one pass.
    pub fn from_draft(draft: &DocumentDraft) -> Self {
        let breakdowns = draft.breakdowns();
        let discount = draft.discount();
        let totals = fold_breakdowns(&breakdowns, &discount, draft.policy());

        let lines = draft
            .items()
            .iter()
            .zip(breakdowns.iter())
            .enumerate()
            .map(|(position, (item, line))| LineRecord::new(position as u32, item, line))
            .collect();

        let now = Utc::now();
        DocumentRecord {
            id: Uuid::new_v4().to_string(),
            kind: draft.kind(),
            number: None,
            tax_model: draft.tax_model(),
            lines,
            discount_percent: discount.percent(),
            discount_amount: discount.fixed_amount(),
            totals,
            created_at: now,
            updated_at: now,
        }
    }

    /// Totals exactly as persisted. This is what the print view shows.
    pub fn redisplay_totals(&self) -> DocumentTotals {
        self.totals
    }

    /// Recomputes totals from the raw lines under `policy`.
    ///
    /// Used to check a stored record against the current rules; display
    /// paths use [`DocumentRecord::redisplay_totals`].
    pub fn recompute_totals(&self, policy: &CalcPolicy) -> DocumentTotals {
        compute_totals_with(&self.line_items(), &self.document_discount(), policy)
    }

    /// Document-level discount rebuilt from the stored inputs.
    pub fn document_discount(&self) -> Discount {
        Discount::resolve(self.discount_percent, self.discount_amount)
    }

    /// Editable lines rebuilt from the raw columns, in position order.
    pub fn line_items(&self) -> Vec<LineItem> {
        let mut lines: Vec<&LineRecord> = self.lines.iter().collect();
        lines.sort_by_key(|l| l.position);
        lines.into_iter().map(LineRecord::to_line_item).collect()
    }

    /// Reopens the record for editing.
    pub fn to_draft(&self, config: &BillingConfig) -> DocumentDraft {
        DocumentDraft::from_parts(
            self.kind,
            self.tax_model,
            self.line_items(),
            self.document_discount(),
            config,
        )
    }

    /// Label for lists and logs: the number if assigned, else the id.
    pub fn display_ref(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
