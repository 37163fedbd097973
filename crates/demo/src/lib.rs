//! `bookstore-demo` — acceptance driver for the bookstore inventory.

pub mod config;
pub mod scenario;

pub use config::DemoConfig;
pub use scenario::{CompletedPurchase, DemoReport, FailedPurchase, run};
