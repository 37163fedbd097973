//! Fulfillment ports invoked when a purchase goes through.
//!
//! The store only needs the side effect; nothing is returned to it. Real shipping or
//! email integration lives outside this crate behind these traits.

use std::cell::RefCell;

use bookstore_core::Isbn;

use crate::book::Book;

/// Ships physical copies to a postal address.
pub trait ShippingService {
    fn ship(&self, book: &Book, address: &str, quantity: u32);
}

/// Delivers digital copies to a buyer's contact (email).
pub trait MailService {
    fn send_digital_copy(&self, book: &Book, contact: &str, quantity: u32);
}

impl<T: ShippingService + ?Sized> ShippingService for &T {
    fn ship(&self, book: &Book, address: &str, quantity: u32) {
        (**self).ship(book, address, quantity)
    }
}

impl<T: MailService + ?Sized> MailService for &T {
    fn send_digital_copy(&self, book: &Book, contact: &str, quantity: u32) {
        (**self).send_digital_copy(book, contact, quantity)
    }
}

/// Shipping that only logs the request.
#[derive(Debug, Default, Copy, Clone)]
pub struct LoggingShippingService;

impl ShippingService for LoggingShippingService {
    fn ship(&self, book: &Book, address: &str, quantity: u32) {
        tracing::info!(
            isbn = %book.isbn(),
            quantity,
            address,
            "shipping {} copies of {} to {}",
            quantity,
            book.title(),
            address
        );
    }
}

/// Mail delivery that only logs the request.
#[derive(Debug, Default, Copy, Clone)]
pub struct LoggingMailService;

impl MailService for LoggingMailService {
    fn send_digital_copy(&self, book: &Book, contact: &str, quantity: u32) {
        tracing::info!(
            isbn = %book.isbn(),
            quantity,
            contact,
            file_type = book.file_type().unwrap_or_default(),
            "sending {} files of {} to {}",
            quantity,
            book.title(),
            contact
        );
    }
}

/// A recorded `ship` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    pub isbn: Isbn,
    pub title: String,
    pub address: String,
    pub quantity: u32,
}

/// A recorded `send_digital_copy` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalDelivery {
    pub isbn: Isbn,
    pub title: String,
    pub file_type: String,
    pub contact: String,
    pub quantity: u32,
}

/// In-memory fulfillment for tests/dev.
///
/// - No IO
/// - Single-threaded (interior mutability via `RefCell`)
/// - Implements both ports so one instance can stand in for either
#[derive(Debug, Default)]
pub struct RecordingFulfillment {
    shipments: RefCell<Vec<Shipment>>,
    deliveries: RefCell<Vec<DigitalDelivery>>,
}

impl RecordingFulfillment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shipments(&self) -> Vec<Shipment> {
        self.shipments.borrow().clone()
    }

    pub fn deliveries(&self) -> Vec<DigitalDelivery> {
        self.deliveries.borrow().clone()
    }

    /// Total number of fulfillment calls of either kind.
    pub fn calls(&self) -> usize {
        self.shipments.borrow().len() + self.deliveries.borrow().len()
    }
}

impl ShippingService for RecordingFulfillment {
    fn ship(&self, book: &Book, address: &str, quantity: u32) {
        self.shipments.borrow_mut().push(Shipment {
            isbn: book.isbn().clone(),
            title: book.title().to_string(),
            address: address.to_string(),
            quantity,
        });
    }
}

impl MailService for RecordingFulfillment {
    fn send_digital_copy(&self, book: &Book, contact: &str, quantity: u32) {
        self.deliveries.borrow_mut().push(DigitalDelivery {
            isbn: book.isbn().clone(),
            title: book.title().to_string(),
            file_type: book.file_type().unwrap_or_default().to_string(),
            contact: contact.to_string(),
            quantity,
        });
    }
}
