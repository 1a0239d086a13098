//! Linear scales mapping data-space coordinates to pixel space.

use serde::{Deserialize, Serialize};

/// A linear mapping from a domain interval onto a range interval.
///
/// A collapsed domain (`d0 == d1`) maps every input to the start of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Identity-like scale over `[0, extent]` in both domain and range.
    #[must_use]
    pub const fn new(extent: f64) -> Self {
        Self {
            domain: (0.0, extent),
            range: (0.0, extent),
        }
    }

    /// Set the domain.
    #[must_use]
    pub const fn with_domain(mut self, d0: f64, d1: f64) -> Self {
        self.domain = (d0, d1);
        self
    }

    /// Set the range.
    #[must_use]
    pub const fn with_range(mut self, r0: f64, r1: f64) -> Self {
        self.range = (r0, r1);
        self
    }

    /// Current domain.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Current range.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Ratio of range extent to domain extent (pixels per data unit).
    #[must_use]
    pub fn factor(&self) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            0.0
        } else {
            (self.range.1 - self.range.0) / span
        }
    }

    /// Map a domain value into the range.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.domain.0).mul_add(self.factor(), self.range.0)
    }

    /// Map a range value back into the domain.
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let factor = self.factor();
        if factor == 0.0 {
            self.domain.0
        } else {
            (value - self.range.0) / factor + self.domain.0
        }
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}
