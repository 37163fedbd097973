//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure of book construction, inventory mutation or purchase is one of
/// these. None of them are retried or swallowed inside the domain; callers decide.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (price, year, title, stock, quantity...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A book with the same identifier is already stocked.
    #[error("duplicate identifier: a book with ISBN {0} already exists")]
    DuplicateIdentifier(String),

    /// The referenced book is not in the inventory.
    #[error("the book with identifier {0} is not found")]
    NotFound(String),

    /// The operation is not supported for this kind of book.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Physical stock is already exhausted.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Physical stock is positive but below the requested quantity.
    #[error("not enough copies of {title} (requested: {requested}, available: {available})")]
    InsufficientStock {
        title: String,
        requested: u32,
        available: i64,
    },
}

/// Fieldless discriminant of [`DomainError`], handy for matching at call sites.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    DuplicateIdentifier,
    NotFound,
    Unsupported,
    OutOfStock,
    InsufficientStock,
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier(id.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn out_of_stock(title: impl Into<String>) -> Self {
        Self::OutOfStock(title.into())
    }

    pub fn insufficient_stock(title: impl Into<String>, requested: u32, available: i64) -> Self {
        Self::InsufficientStock {
            title: title.into(),
            requested,
            available,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DomainError::DuplicateIdentifier(_) => ErrorKind::DuplicateIdentifier,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Unsupported(_) => ErrorKind::Unsupported,
            DomainError::OutOfStock(_) => ErrorKind::OutOfStock,
            DomainError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
        }
    }
}
