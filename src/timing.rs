//! Tempo and position units of a chart, and conversion between them.
//!
//! - [`Tick`] is the exact position on the chart, counted in measures.
//! - [`Seconds`] is the absolute playback time.
//! - [`TimeMap`] holds the tempo/meter [`ControlPoint`]s and converts a [`Tick`] into [`Seconds`].

pub mod seconds;
pub mod tick;
pub mod time_map;

use thiserror::Error;

pub use self::{
    seconds::{NonFiniteSeconds, Seconds},
    tick::Tick,
    time_map::{ControlPoint, TimeMap},
};

/// An error occurred when modifying a [`TimeMap`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimingError {
    /// The tempo was zero, negative or not finite.
    #[error("BPM must be positive and finite, got {0}")]
    NonPositiveBpm(f64),
    /// The time signature had a zero numerator or denominator.
    #[error("time signature must not contain zero, got {beat_count}/{beat_kind}")]
    InvalidTimeSignature {
        /// Beats per measure.
        beat_count: u32,
        /// Note value of a beat.
        beat_kind: u32,
    },
    /// The scroll speed multiplier was not finite.
    #[error("speed multiplier must be finite, got {0}")]
    NonFiniteSpeed(f64),
    /// The control point would lie before the root point at tick 0.
    #[error("control point at {0} lies before the root point")]
    BeforeRoot(Tick),
}

/// type alias of core::result::Result<T, TimingError>
pub type Result<T> = core::result::Result<T, TimingError>;
