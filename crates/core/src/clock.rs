//! Current-year provider.
//!
//! Publication-year validation and outdated checks depend on "today". Domain code
//! asks a [`Clock`] instead of reading the wall clock so tests can pin the year.

use chrono::{Datelike, Local};

/// Source of the current calendar year.
pub trait Clock {
    fn current_year(&self) -> i32;
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// Clock pinned to a single year.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl FixedClock {
    pub fn new(year: i32) -> Self {
        Self(year)
    }
}

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}
