//! # Seed Data Generator
//!
//! Populates the database with catalog items and a few sample documents
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bizdesk_dev.db
//! cargo run -p bizdesk-db --bin seed
//!
//! # Specify database path and sample document count
//! cargo run -p bizdesk-db --bin seed -- --db ./data/bizdesk.db --documents 10
//! ```
//!
//! Billing settings (rates, tax basis) come from `BIZDESK_*` variables, see
//! `BillingConfig::from_env` and `DbConfig::from_env`. Log level follows
//! `RUST_LOG`.

use std::env;

use bizdesk_core::catalog::InMemoryCatalog;
use bizdesk_core::{
    BillingConfig, CatalogItem, DocumentDraft, DocumentKind, Money, Percent, Quantity, TaxModel,
};
use bizdesk_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Catalog entries: (id, name, price in paise).
const CATALOG: &[(&str, &str, i64)] = &[
    ("HW-BOLT-M8", "Steel bolt M8", 1_250),
    ("HW-NUT-M8", "Steel nut M8", 425),
    ("HW-WASH-M8", "Washer M8", 150),
    ("EL-WIRE-25", "Copper wire 2.5mm (per m)", 4_250),
    ("EL-SWITCH", "Modular switch 6A", 8_900),
    ("CN-CEMENT", "Cement bag 50kg", 39_500),
    ("CN-SAND", "River sand (per cft)", 6_000),
    ("PT-EMUL-4L", "Emulsion paint 4L", 185_000),
    ("SV-INSTALL", "Installation service (per hour)", 50_000),
    ("SV-VISIT", "Site visit", 75_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut db_path: Option<String> = None;
    let mut documents: usize = 3;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--documents" | "-n" => {
                if i + 1 < args.len() {
                    documents = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bizdesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: $BIZDESK_DB_PATH or ./bizdesk_dev.db)");
                println!("  -n, --documents <N>     Sample documents to create (default: 3)");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = BillingConfig::from_env();
    let db_config = match db_path {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env("./bizdesk_dev.db"),
    };
    info!(path = %db_config.database_path.display(), documents, "Seeding database");

    let db = Database::new(db_config).await?;

    let existing = db.catalog().count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already populated; skipping seed. Delete the database file to regenerate.");
        return Ok(());
    }

    for (id, name, paise) in CATALOG {
        db.catalog()
            .insert(&CatalogItem {
                id: id.to_string(),
                name: name.to_string(),
                unit_price: Money::from_cents(*paise),
            })
            .await?;
    }
    info!(count = CATALOG.len(), "Catalog seeded");

    let catalog = db.catalog().snapshot().await?;
    for n in 0..documents {
        let draft = sample_draft(n, &catalog, &config)?;
        let saved = db.documents().save(&draft.to_record()?).await?;
        info!(
            number = %saved.display_ref(),
            grand_total = %config.format_amount(saved.totals.grand_total),
            "Sample document saved"
        );
    }

    let hits = db.catalog().search("steel", 10).await?;
    info!(hits = hits.len(), "Search 'steel'");

    db.close().await;
    info!("Seed complete");
    Ok(())
}

/// Builds a sample document; even `n` gives a GST invoice, odd an order.
fn sample_draft(
    n: usize,
    catalog: &InMemoryCatalog,
    config: &BillingConfig,
) -> Result<DocumentDraft, Box<dyn std::error::Error>> {
    let (kind, tax_model) = if n % 2 == 0 {
        (DocumentKind::Invoice, TaxModel::Gst)
    } else {
        (DocumentKind::Order, TaxModel::Single)
    };

    let mut draft = DocumentDraft::with_config(kind, tax_model, config);
    for (row, (id, _, _)) in CATALOG.iter().enumerate().skip(n % CATALOG.len()).take(3) {
        let index = draft.add_row()?;
        draft.fill_from_catalog(index, id, catalog)?;
        draft.set_quantity(index, Quantity::from((row % 4 + 1) as i64))?;
    }

    if n % 3 == 0 {
        draft.set_discount_percent(Percent::from(5))?;
    }

    Ok(draft)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bizdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
