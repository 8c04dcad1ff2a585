//! Finite playback time definition.

use std::ops::{Add, Neg, Sub};

use thiserror::Error;

/// Absolute playback time in seconds, holding only finite values.
///
/// Arithmetic saturates into the finite range, so [`Seconds::MIN`] and [`Seconds::MAX`] can be used
/// as "before the beginning of time" and "after the end of everything".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
#[repr(transparent)]
pub struct Seconds(f64);

impl Eq for Seconds {}
impl PartialOrd for Seconds {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Seconds {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<Seconds> for f64 {
    fn from(value: Seconds) -> Self {
        value.as_f64()
    }
}

/// Error type for `Seconds::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("finite number of seconds expected: {0}")]
pub struct NonFiniteSeconds(pub(crate) f64);

impl TryFrom<f64> for Seconds {
    type Error = NonFiniteSeconds;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        value
            .is_finite()
            .then_some(Self(value + 0.0))
            .ok_or(NonFiniteSeconds(value))
    }
}

impl Seconds {
    /// Zero seconds.
    pub const ZERO: Self = Self(0.0);
    /// The earliest representable time.
    pub const MIN: Self = Self(f64::MIN);
    /// The latest representable time.
    pub const MAX: Self = Self(f64::MAX);

    /// Creates a new `Seconds` if `secs` is finite, otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn new(secs: f64) -> Option<Self> {
        Self::try_from(secs).ok()
    }

    /// Creates a new `Seconds`, clamping infinities into the finite range and mapping NaN to zero.
    #[must_use]
    pub fn saturating_new(secs: f64) -> Self {
        if secs.is_nan() {
            Self::ZERO
        } else {
            Self(secs.clamp(f64::MIN, f64::MAX) + 0.0)
        }
    }

    /// Creates a new `Seconds` from whole milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis as f64 / 1000.0)
    }

    /// Gets the internal value.
    #[inline]
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }
}

impl Add for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::saturating_new(self.0 + rhs.0)
    }
}

impl Sub for Seconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::saturating_new(self.0 - rhs.0)
    }
}

impl Neg for Seconds {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0 + 0.0)
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}s", self.0)
    }
}
