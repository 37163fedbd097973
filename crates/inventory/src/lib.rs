//! Bookstore inventory domain module.
//!
//! This crate contains the book model, the fulfillment ports and the store that
//! ties them together, implemented as deterministic domain logic (no persistence,
//! no network). Fulfillment side effects go through injectable traits.

pub mod book;
pub mod fulfillment;
pub mod store;

pub use book::{Book, BookDetails, BookFormat, BookKind};
pub use fulfillment::{
    DigitalDelivery, LoggingMailService, LoggingShippingService, MailService,
    RecordingFulfillment, Shipment, ShippingService,
};
pub use store::BookStore;
