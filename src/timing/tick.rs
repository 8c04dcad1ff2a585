//! Definition of the exact chart position unit.

use std::ops::{Add, AddAssign, Sub};

use num::{
    CheckedAdd, CheckedSub, Zero,
    rational::Ratio,
};

/// A position on the chart, measured in measures (bars).
///
/// One whole measure is `1`, so a quarter of a 4/4 measure is `1/4`. The value is kept as an exact
/// fraction so that positions never drift, no matter how long the chart is.
///
/// Both parts of the fraction are `i64`, so summing ticks with large coprime denominators can
/// overflow. `+` and `-` panic on overflow in debug builds; use [`Tick::checked_add`] and
/// [`Tick::checked_sub`] where the inputs are not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(Ratio<i64>);

impl Tick {
    /// The beginning of the chart.
    pub const ZERO: Self = Self(Ratio::new_raw(0, 1));

    /// Creates a new position of `numerator / denominator` measures.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is 0.
    #[must_use]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "denominator of a tick must not be zero");
        Self(Ratio::new(numerator, denominator))
    }

    /// Creates a position at the start of the `measures`-th measure.
    #[must_use]
    pub const fn from_measures(measures: i64) -> Self {
        Self(Ratio::new_raw(measures, 1))
    }

    /// Gets the reduced numerator.
    #[must_use]
    pub fn numerator(&self) -> i64 {
        *self.0.numer()
    }

    /// Gets the reduced denominator, always positive.
    #[must_use]
    pub fn denominator(&self) -> i64 {
        *self.0.denom()
    }

    /// Whether this is a zero length.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether this lies before the chart start.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Ratio::zero()
    }

    /// Converts into floating measures, for places where exactness is no longer needed.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.numerator() as f64 / self.denominator() as f64
    }

    /// Adds two ticks, or `None` if the exact sum does not fit.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(&rhs.0).map(Self)
    }

    /// Subtracts two ticks, or `None` if the exact difference does not fit.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(&rhs.0).map(Self)
    }

    /// Distance from `origin` in floating measures.
    ///
    /// Falls back to subtracting the floating values when the exact difference overflows.
    #[must_use]
    pub fn measures_since(self, origin: Self) -> f64 {
        self.checked_sub(origin)
            .map_or_else(|| self.as_f64() - origin.as_f64(), |delta| delta.as_f64())
    }
}

impl Default for Tick {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Ratio<i64>> for Tick {
    fn from(value: Ratio<i64>) -> Self {
        Self(value)
    }
}

impl From<Tick> for Ratio<i64> {
    fn from(value: Tick) -> Self {
        value.0
    }
}

impl Add for Tick {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Tick {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Tick {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator(), self.denominator())
    }
}
