//! The bookstore inventory and its purchase transaction.

use std::collections::HashMap;

use bookstore_core::{Clock, DomainError, DomainResult, Entity, Isbn, SystemClock};

use crate::book::{Book, BookKind};
use crate::fulfillment::{LoggingMailService, LoggingShippingService, MailService, ShippingService};

/// In-memory inventory keyed by ISBN.
///
/// The store exclusively owns its books. Mutating operations take `&mut self`; a
/// host that shares a store across threads must guard it with its own lock.
#[derive(Debug)]
pub struct BookStore<S, M, C> {
    inventory: HashMap<Isbn, Book>,
    shipping: S,
    mail: M,
    clock: C,
}

impl BookStore<LoggingShippingService, LoggingMailService, SystemClock> {
    /// Store wired to the logging fulfillment services and the wall clock.
    pub fn with_defaults() -> Self {
        Self::new(LoggingShippingService, LoggingMailService, SystemClock)
    }
}

impl<S, M, C> BookStore<S, M, C>
where
    S: ShippingService,
    M: MailService,
    C: Clock,
{
    pub fn new(shipping: S, mail: M, clock: C) -> Self {
        Self {
            inventory: HashMap::new(),
            shipping,
            mail,
            clock,
        }
    }

    pub fn shipping(&self) -> &S {
        &self.shipping
    }

    pub fn mail(&self) -> &M {
        &self.mail
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.inventory.contains_key(isbn)
    }

    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.inventory.get(isbn)
    }

    /// All stocked books, in no particular order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.inventory.values()
    }

    /// Stock a new title. Identifiers must be unique within the store.
    pub fn add_book(&mut self, book: Book) -> DomainResult<()> {
        if self.inventory.contains_key(book.id()) {
            tracing::warn!(isbn = %book.id(), "rejected duplicate book");
            return Err(DomainError::duplicate(book.id().as_str()));
        }

        tracing::info!(
            isbn = %book.id(),
            title = book.title(),
            kind = %book.kind(),
            "book added to inventory"
        );
        self.inventory.insert(book.id().clone(), book);
        Ok(())
    }

    /// Remove and return every book at least `threshold_years` old.
    ///
    /// The returned order is unspecified.
    pub fn remove_outdated_books(&mut self, threshold_years: u32) -> Vec<Book> {
        let outdated: Vec<Isbn> = self
            .inventory
            .values()
            .filter(|book| book.is_outdated(threshold_years, &self.clock))
            .map(|book| book.id().clone())
            .collect();

        let removed: Vec<Book> = outdated
            .iter()
            .filter_map(|isbn| self.inventory.remove(isbn))
            .collect();

        tracing::info!(
            threshold_years,
            removed = removed.len(),
            remaining = self.inventory.len(),
            "removed outdated books"
        );
        removed
    }

    /// Sell `quantity` copies of `isbn` and return the amount to charge.
    ///
    /// Steps run in order: lookup, availability, quantity check, pricing, stock
    /// decrement (physical only), fulfillment. A failure at any step happens before the
    /// fulfillment services are called and leaves stock untouched.
    pub fn buy_book(
        &mut self,
        isbn: &str,
        quantity: u32,
        contact: &str,
        address: &str,
    ) -> DomainResult<f64> {
        let book = self
            .inventory
            .get_mut(isbn)
            .ok_or_else(|| DomainError::not_found(isbn))?;

        if let Err(err) = book.ensure_available(quantity) {
            tracing::warn!(isbn, quantity, error = %err, "purchase rejected");
            return Err(err);
        }
        tracing::debug!(isbn, quantity, kind = %book.kind(), "book available for purchase");

        if quantity == 0 {
            return Err(DomainError::invalid_argument("quantity must be positive"));
        }

        let total_amount = book.price() * f64::from(quantity);

        if book.kind() == BookKind::Physical {
            book.decrease_stock(quantity)?;
        }

        book.purchase(contact, address, quantity, &self.shipping, &self.mail)?;

        tracing::info!(isbn, quantity, total_amount, "purchase completed");
        Ok(total_amount)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::book::BookDetails;
    use crate::fulfillment::RecordingFulfillment;
    use bookstore_core::{ErrorKind, FixedClock};

    const YEAR: i32 = 2025;

    type TestStore = BookStore<RecordingFulfillment, RecordingFulfillment, FixedClock>;

    fn store() -> TestStore {
        BookStore::new(
            RecordingFulfillment::new(),
            RecordingFulfillment::new(),
            FixedClock(YEAR),
        )
    }

    fn physical(isbn: &str, price: f64, year: i32, stock: i64) -> Book {
        Book::physical(BookDetails::new(isbn, "Paper", price, year), stock, &FixedClock(YEAR))
            .unwrap()
    }

    fn digital(isbn: &str, price: f64, year: i32) -> Book {
        Book::digital(BookDetails::new(isbn, "Ebook", price, year), "PDF", &FixedClock(YEAR))
            .unwrap()
    }

    fn display_only(isbn: &str, year: i32) -> Book {
        Book::display_only(BookDetails::new(isbn, "Showcase", 100.0, year), &FixedClock(YEAR))
            .unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let store = store();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get("ID1").is_none());
    }

    #[test]
    fn default_store_sells_through_logging_services() {
        let mut store = BookStore::with_defaults();
        let year = store.clock().current_year();
        let book = Book::digital(BookDetails::new("ID5", "Book5", 35.50, year), "DOCS", store.clock())
            .unwrap();
        store.add_book(book).unwrap();
        assert_eq!(store.buy_book("ID5", 2, "c@d.e", "street").unwrap(), 71.0);
    }

    #[test]
    fn duplicate_identifier_is_rejected() {
        let mut store = store();
        store.add_book(physical("ID1", 10.0, 2020, 1)).unwrap();

        let err = store.add_book(digital("ID1", 5.0, 2021)).unwrap_err();
        assert_eq!(err, DomainError::duplicate("ID1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ID1").unwrap().kind(), BookKind::Physical);
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let mut store = store();
        let err = store.buy_book("missing", 1, "a@b.c", "street").unwrap_err();
        assert_eq!(err, DomainError::not_found("missing"));
    }

    #[test]
    fn zero_quantity_is_invalid() {
        let mut store = store();
        store.add_book(digital("ID2", 30.0, 2023)).unwrap();
        let err = store.buy_book("ID2", 0, "a@b.c", "street").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(store.mail().calls(), 0);
    }

    #[test]
    fn zero_quantity_reports_lookup_and_kind_errors_first() {
        let mut store = store();
        store.add_book(display_only("ID3", 2024)).unwrap();
        store.add_book(physical("ID1", 45.50, 2020, 10)).unwrap();

        let err = store.buy_book("ID3", 0, "t@e.com", "street").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let err = store.buy_book("missing", 0, "t@e.com", "street").unwrap_err();
        assert_eq!(err, DomainError::not_found("missing"));

        let err = store.buy_book("ID1", 0, "t@e.com", "street").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(store.get("ID1").unwrap().stock(), Some(10));
        assert_eq!(store.shipping().calls() + store.mail().calls(), 0);
    }

    #[test]
    fn physical_purchase_ships_and_decrements() {
        let mut store = store();
        store.add_book(physical("ID1", 45.50, 2020, 10)).unwrap();

        let total = store.buy_book("ID1", 2, "omar@email.com", "50 Daqqi street").unwrap();
        assert_eq!(total, 91.0);
        assert_eq!(store.get("ID1").unwrap().stock(), Some(8));

        let shipments = store.shipping().shipments();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].isbn.as_str(), "ID1");
        assert_eq!(shipments[0].address, "50 Daqqi street");
        assert_eq!(shipments[0].quantity, 2);
        assert_eq!(store.mail().calls(), 0);
    }

    #[test]
    fn physical_purchase_can_drain_stock_then_reports_out_of_stock() {
        let mut store = store();
        store.add_book(physical("ID4", 25.0, 2010, 5)).unwrap();

        assert_eq!(store.buy_book("ID4", 5, "c", "addr").unwrap(), 125.0);
        assert_eq!(store.get("ID4").unwrap().stock(), Some(0));

        let err = store.buy_book("ID4", 1, "c", "addr").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfStock);
        assert_eq!(store.shipping().shipments().len(), 1);
    }

    #[test]
    fn over_stock_purchase_leaves_no_trace() {
        let mut store = store();
        store.add_book(physical("ID1", 45.50, 2020, 10)).unwrap();

        let err = store.buy_book("ID1", 15, "test@email.com", "120 Faisal street").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(store.get("ID1").unwrap().stock(), Some(10));
        assert_eq!(store.shipping().calls(), 0);
        assert_eq!(store.mail().calls(), 0);
    }

    #[test]
    fn digital_purchase_mails_once() {
        let mut store = store();
        store.add_book(digital("ID2", 30.0, 2023)).unwrap();

        let total = store.buy_book("ID2", 3, "ahmed@email.com", "120 Faisal street").unwrap();
        assert_eq!(total, 90.0);

        let deliveries = store.mail().deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].contact, "ahmed@email.com");
        assert_eq!(deliveries[0].quantity, 3);
        assert_eq!(store.shipping().calls(), 0);
        assert_eq!(store.get("ID2").unwrap().stock(), None);
    }

    #[test]
    fn display_only_purchase_is_unsupported() {
        let mut store = store();
        store.add_book(display_only("ID3", 2024)).unwrap();

        for quantity in [1, 2, 1000] {
            let err = store.buy_book("ID3", quantity, "t@e.com", "street").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unsupported);
        }
        assert_eq!(store.shipping().calls() + store.mail().calls(), 0);
    }

    #[test]
    fn remove_outdated_books_partitions_inventory() {
        let mut store = store();
        store.add_book(physical("OLD1", 10.0, YEAR - 5, 1)).unwrap();
        store.add_book(digital("OLD2", 10.0, 1990)).unwrap();
        store.add_book(physical("NEW1", 10.0, YEAR - 4, 1)).unwrap();
        store.add_book(display_only("NEW2", YEAR)).unwrap();

        let removed: HashSet<String> = store
            .remove_outdated_books(5)
            .into_iter()
            .map(|b| b.isbn().to_string())
            .collect();

        assert_eq!(removed, HashSet::from(["OLD1".to_string(), "OLD2".to_string()]));
        assert_eq!(store.len(), 2);
        assert!(store.contains("NEW1"));
        assert!(store.contains("NEW2"));

        // Nothing left to prune at the same threshold.
        assert!(store.remove_outdated_books(5).is_empty());
    }

    #[test]
    fn removed_books_cannot_be_bought() {
        let mut store = store();
        store.add_book(digital("OLD", 10.0, 2000)).unwrap();
        assert_eq!(store.remove_outdated_books(10).len(), 1);
        let err = store.buy_book("OLD", 1, "c", "a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a physical purchase either completes fully or changes nothing.
            #[test]
            fn physical_purchase_is_all_or_nothing(
                price in 0.01f64..1_000.0,
                stock in 1i64..50,
                quantity in 1u32..80,
            ) {
                let mut store = store();
                store.add_book(physical("P", price, 2000, stock)).unwrap();

                let result = store.buy_book("P", quantity, "c", "a");
                let remaining = store.get("P").unwrap().stock().unwrap();

                if i64::from(quantity) <= stock {
                    prop_assert_eq!(result.unwrap(), price * f64::from(quantity));
                    prop_assert_eq!(remaining, stock - i64::from(quantity));
                    prop_assert_eq!(store.shipping().shipments().len(), 1);
                } else {
                    prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InsufficientStock);
                    prop_assert_eq!(remaining, stock);
                    prop_assert_eq!(store.shipping().calls(), 0);
                }
            }

            /// Property: pruning removes exactly the outdated subset.
            #[test]
            fn pruning_removes_exactly_outdated(
                ages in prop::collection::vec(0i32..30, 0..20),
                threshold in 0u32..30,
            ) {
                let mut store = store();
                for (i, age) in ages.iter().enumerate() {
                    store.add_book(digital(&format!("B{i}"), 1.0, YEAR - age)).unwrap();
                }

                let expected: HashSet<String> = ages
                    .iter()
                    .enumerate()
                    .filter(|(_, age)| i64::from(**age) >= i64::from(threshold))
                    .map(|(i, _)| format!("B{i}"))
                    .collect();

                let removed: Vec<String> = store
                    .remove_outdated_books(threshold)
                    .into_iter()
                    .map(|b| b.isbn().to_string())
                    .collect();
                let removed_set: HashSet<String> = removed.iter().cloned().collect();

                prop_assert_eq!(removed.len(), removed_set.len());
                prop_assert_eq!(&removed_set, &expected);
                prop_assert_eq!(store.len(), ages.len() - expected.len());
                prop_assert!(store.books().all(|b| !b.is_outdated(threshold, store.clock())));
            }
        }
    }
}
