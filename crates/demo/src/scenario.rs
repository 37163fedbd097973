//! The acceptance scenario: stock five titles, attempt four purchases, prune.

use anyhow::Context;
use serde::Serialize;

use bookstore_core::{Clock, ErrorKind};
use bookstore_inventory::{Book, BookDetails, BookStore, MailService, ShippingService};

use crate::config::DemoConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedPurchase {
    pub isbn: String,
    pub quantity: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedPurchase {
    pub isbn: String,
    pub quantity: u32,
    pub kind: ErrorKind,
    pub message: String,
}

/// What happened during a [`run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub purchases: Vec<CompletedPurchase>,
    pub failures: Vec<FailedPurchase>,
    pub removed: Vec<Book>,
}

struct Attempt {
    isbn: &'static str,
    quantity: u32,
    contact: &'static str,
    address: &'static str,
}

const ATTEMPTS: [Attempt; 4] = [
    Attempt {
        isbn: "ID1",
        quantity: 2,
        contact: "omar@email.com",
        address: "50 Daqqi street",
    },
    Attempt {
        isbn: "ID2",
        quantity: 1,
        contact: "ahmed@email.com",
        address: "120 Faisal street",
    },
    // Display-only: refused.
    Attempt {
        isbn: "ID3",
        quantity: 1,
        contact: "test@email.com",
        address: "120 Faisal street",
    },
    // More than the remaining stock: refused.
    Attempt {
        isbn: "ID1",
        quantity: 15,
        contact: "test@email.com",
        address: "120 Faisal street",
    },
];

fn catalogue(clock: &impl Clock) -> anyhow::Result<Vec<Book>> {
    Ok(vec![
        Book::physical(BookDetails::new("ID1", "Book1", 45.50, 2020), 10, clock)?,
        Book::digital(BookDetails::new("ID2", "Book2", 30.0, 2023), "PDF", clock)?,
        Book::display_only(BookDetails::new("ID3", "Book3", 100.0, 2024), clock)?,
        Book::physical(BookDetails::new("ID4", "Book4", 25.00, 2010), 5, clock)?,
        Book::digital(BookDetails::new("ID5", "Book5", 35.50, 2022), "DOCS", clock)?,
    ])
}

/// Run the scenario against `store`.
///
/// Failed purchases are recorded and the run continues; failing to stock the
/// catalogue aborts it.
pub fn run<S, M, C>(store: &mut BookStore<S, M, C>, config: &DemoConfig) -> anyhow::Result<DemoReport>
where
    S: ShippingService,
    M: MailService,
    C: Clock,
{
    tracing::info!("adding books to inventory");
    for book in catalogue(store.clock()).context("building the demo catalogue")? {
        let isbn = book.isbn().clone();
        store
            .add_book(book)
            .with_context(|| format!("stocking {isbn}"))?;
    }

    tracing::info!("buying books");
    let mut purchases = Vec::new();
    let mut failures = Vec::new();
    for attempt in &ATTEMPTS {
        match store.buy_book(attempt.isbn, attempt.quantity, attempt.contact, attempt.address) {
            Ok(amount) => {
                tracing::info!(isbn = attempt.isbn, "paid amount: ${amount:.2}");
                purchases.push(CompletedPurchase {
                    isbn: attempt.isbn.to_string(),
                    quantity: attempt.quantity,
                    amount,
                });
            }
            Err(err) => {
                tracing::warn!(isbn = attempt.isbn, "purchase failed: {err}");
                failures.push(FailedPurchase {
                    isbn: attempt.isbn.to_string(),
                    quantity: attempt.quantity,
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }
    }

    let threshold = config.outdated_threshold_years;
    tracing::info!("removing outdated books (older than {threshold} years)");
    let removed = store.remove_outdated_books(threshold);
    tracing::info!("removed {} outdated books", removed.len());

    Ok(DemoReport {
        purchases,
        failures,
        removed,
    })
}
