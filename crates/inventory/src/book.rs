use serde::Serialize;

use bookstore_core::{Clock, DomainError, DomainResult, Entity, Isbn};

use crate::fulfillment::{MailService, ShippingService};

/// Attributes shared by every kind of book, as supplied by the caller.
///
/// Nothing is validated here; validation happens when a [`Book`] is built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetails {
    pub isbn: String,
    pub title: String,
    pub price: f64,
    pub year_published: i32,
}

impl BookDetails {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        year_published: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            price,
            year_published,
        }
    }
}

/// Kind-specific state of a book.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookFormat {
    /// Paper copies held in stock and shipped to an address.
    Physical { stock: i64 },
    /// A file (e.g. "PDF") mailed to the buyer.
    Digital { file_type: String },
    /// Shown in the store, never sold.
    DisplayOnly,
}

/// Fieldless tag of [`BookFormat`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookKind {
    Physical,
    Digital,
    DisplayOnly,
}

impl core::fmt::Display for BookKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            BookKind::Physical => "physical",
            BookKind::Digital => "digital",
            BookKind::DisplayOnly => "display-only",
        })
    }
}

/// A book held by the store.
///
/// Only the physical stock counter changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    isbn: Isbn,
    title: String,
    price: f64,
    year_published: i32,
    #[serde(flatten)]
    format: BookFormat,
}

impl Book {
    /// Build a physical book. `stock` must be positive.
    pub fn physical(details: BookDetails, stock: i64, clock: &impl Clock) -> DomainResult<Self> {
        if stock <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "stock must be positive (got {stock})"
            )));
        }
        Self::build(details, BookFormat::Physical { stock }, clock)
    }

    pub fn digital(
        details: BookDetails,
        file_type: impl Into<String>,
        clock: &impl Clock,
    ) -> DomainResult<Self> {
        let file_type = file_type.into();
        Self::build(details, BookFormat::Digital { file_type }, clock)
    }

    pub fn display_only(details: BookDetails, clock: &impl Clock) -> DomainResult<Self> {
        Self::build(details, BookFormat::DisplayOnly, clock)
    }

    fn build(details: BookDetails, format: BookFormat, clock: &impl Clock) -> DomainResult<Self> {
        let BookDetails {
            isbn,
            title,
            price,
            year_published,
        } = details;

        let isbn = Isbn::new(isbn)?;
        if title.trim().is_empty() {
            return Err(DomainError::invalid_argument("title cannot be empty"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::invalid_argument(format!(
                "invalid price: {price}"
            )));
        }
        let current_year = clock.current_year();
        if year_published > current_year {
            return Err(DomainError::invalid_argument(format!(
                "invalid year of publishing: {year_published} is after {current_year}"
            )));
        }

        Ok(Self {
            isbn,
            title,
            price,
            year_published,
            format,
        })
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn year_published(&self) -> i32 {
        self.year_published
    }

    pub fn kind(&self) -> BookKind {
        match self.format {
            BookFormat::Physical { .. } => BookKind::Physical,
            BookFormat::Digital { .. } => BookKind::Digital,
            BookFormat::DisplayOnly => BookKind::DisplayOnly,
        }
    }

    /// Copies on hand; `None` for books without a stock concept.
    pub fn stock(&self) -> Option<i64> {
        match self.format {
            BookFormat::Physical { stock } => Some(stock),
            _ => None,
        }
    }

    pub fn file_type(&self) -> Option<&str> {
        match &self.format {
            BookFormat::Digital { file_type } => Some(file_type),
            _ => None,
        }
    }

    /// True iff at least `threshold_years` have passed since publication.
    pub fn is_outdated(&self, threshold_years: u32, clock: &impl Clock) -> bool {
        let age = i64::from(clock.current_year()) - i64::from(self.year_published);
        age >= i64::from(threshold_years)
    }

    pub fn is_available_for_purchase(&self, quantity: u32) -> bool {
        match self.format {
            BookFormat::Physical { stock } => stock >= i64::from(quantity),
            BookFormat::Digital { .. } => true,
            BookFormat::DisplayOnly => false,
        }
    }

    /// Same decision as [`Book::is_available_for_purchase`], with the reason on refusal.
    pub fn ensure_available(&self, quantity: u32) -> DomainResult<()> {
        match self.format {
            BookFormat::Physical { stock } => self.check_stock(stock, quantity),
            BookFormat::Digital { .. } => Ok(()),
            BookFormat::DisplayOnly => Err(Self::not_for_sale()),
        }
    }

    /// Run the kind-specific fulfillment for an already-paid purchase.
    ///
    /// Stock is not touched here; the store decrements it before calling this.
    pub fn purchase<S, M>(
        &self,
        contact: &str,
        address: &str,
        quantity: u32,
        shipping: &S,
        mail: &M,
    ) -> DomainResult<()>
    where
        S: ShippingService + ?Sized,
        M: MailService + ?Sized,
    {
        match self.format {
            BookFormat::Physical { .. } => {
                shipping.ship(self, address, quantity);
                Ok(())
            }
            BookFormat::Digital { .. } => {
                mail.send_digital_copy(self, contact, quantity);
                Ok(())
            }
            BookFormat::DisplayOnly => Err(Self::not_for_sale()),
        }
    }

    /// Remove `quantity` copies from physical stock. Applies fully or not at all.
    pub(crate) fn decrease_stock(&mut self, quantity: u32) -> DomainResult<()> {
        let BookFormat::Physical { stock } = self.format else {
            return Err(DomainError::unsupported(format!(
                "{} books have no stock",
                self.kind()
            )));
        };
        self.check_stock(stock, quantity)?;
        self.format = BookFormat::Physical {
            stock: stock - i64::from(quantity),
        };
        Ok(())
    }

    fn check_stock(&self, stock: i64, quantity: u32) -> DomainResult<()> {
        if stock <= 0 {
            return Err(DomainError::out_of_stock(self.title.as_str()));
        }
        if stock < i64::from(quantity) {
            return Err(DomainError::insufficient_stock(
                self.title.as_str(),
                quantity,
                stock,
            ));
        }
        Ok(())
    }

    fn not_for_sale() -> DomainError {
        DomainError::unsupported("display-only books are not for sale")
    }
}

impl Entity for Book {
    type Id = Isbn;

    fn id(&self) -> &Self::Id {
        &self.isbn
    }
}
