//! Demo configuration, read from the environment.

use bookstore_core::{Clock, FixedClock, SystemClock};

/// Pruning threshold, in years.
pub const OUTDATED_YEARS_ENV: &str = "BOOKSTORE_OUTDATED_YEARS";
/// Pins the store's clock to a calendar year.
pub const CURRENT_YEAR_ENV: &str = "BOOKSTORE_CURRENT_YEAR";

pub const DEFAULT_OUTDATED_YEARS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub outdated_threshold_years: u32,
    /// `None` means the system clock.
    pub current_year: Option<i32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            outdated_threshold_years: DEFAULT_OUTDATED_YEARS,
            current_year: None,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let outdated_threshold_years = match lookup(OUTDATED_YEARS_ENV) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "{OUTDATED_YEARS_ENV}={raw:?} is not a year count; using {DEFAULT_OUTDATED_YEARS}"
                );
                DEFAULT_OUTDATED_YEARS
            }),
            None => DEFAULT_OUTDATED_YEARS,
        };

        let current_year = lookup(CURRENT_YEAR_ENV).and_then(|raw| match raw.trim().parse() {
            Ok(year) => Some(year),
            Err(_) => {
                tracing::warn!("{CURRENT_YEAR_ENV}={raw:?} is not a year; using the system clock");
                None
            }
        });

        Self {
            outdated_threshold_years,
            current_year,
        }
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.current_year {
            Some(year) => Box::new(FixedClock(year)),
            None => Box::new(SystemClock),
        }
    }
}
