//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform sample in `[0, 1)`
    fn sample(&self) -> f64;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}
