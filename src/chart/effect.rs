//! Audio effects triggered by effect buttons, and their default parameters.
//!
//! The defaults live in an [`EffectDefaults`] value owned by each [`super::Chart`], so independent
//! charts may carry different tables.

use std::collections::HashMap;

use crate::timing::Tick;

/// Audio effect kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Repeats a short slice of audio.
    Retrigger,
    /// Chops the audio rhythmically.
    Gate,
    /// Flanger sweep.
    Flanger,
    /// Pitch shift.
    PitchShift,
    /// Sample rate and bit depth reduction.
    BitCrusher,
    /// Phaser sweep.
    Phaser,
    /// Low pass filter wobble.
    Wobble,
    /// Slows the audio down to a stop.
    TapeStop,
    /// Echo with feedback.
    Echo,
    /// Ducks the audio on each beat.
    SideChain,
}

impl EffectKind {
    /// All effect kinds.
    pub const ALL: [Self; 10] = [
        Self::Retrigger,
        Self::Gate,
        Self::Flanger,
        Self::PitchShift,
        Self::BitCrusher,
        Self::Phaser,
        Self::Wobble,
        Self::TapeStop,
        Self::Echo,
        Self::SideChain,
    ];
}

/// Parameters of an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectParams {
    /// Wet/dry mix in `0..=1`.
    pub mix: f64,
    /// Rhythmic period of the effect, in measures.
    pub period: Tick,
    /// Feedback amount or effect-specific strength.
    pub amount: f64,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            mix: 1.0,
            period: Tick::new(1, 4),
            amount: 0.0,
        }
    }
}

impl EffectParams {
    /// Creates parameters.
    #[must_use]
    pub const fn new(mix: f64, period: Tick, amount: f64) -> Self {
        Self {
            mix,
            period,
            amount,
        }
    }
}

/// Table of default parameters per effect kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefaults {
    params: HashMap<EffectKind, EffectParams>,
}

impl Default for EffectDefaults {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectDefaults {
    /// Creates an empty table, where every kind resolves to [`EffectParams::default`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Creates the standard table.
    #[must_use]
    pub fn standard() -> Self {
        let params = [
            (EffectKind::Retrigger, EffectParams::new(1.0, Tick::new(1, 8), 0.0)),
            (EffectKind::Gate, EffectParams::new(0.9, Tick::new(1, 16), 0.0)),
            (EffectKind::Flanger, EffectParams::new(0.5, Tick::from_measures(2), 0.6)),
            (EffectKind::PitchShift, EffectParams::new(1.0, Tick::ZERO, 12.0)),
            (EffectKind::BitCrusher, EffectParams::new(1.0, Tick::ZERO, 0.4)),
            (EffectKind::Phaser, EffectParams::new(0.5, Tick::new(1, 2), 0.35)),
            (EffectKind::Wobble, EffectParams::new(1.0, Tick::new(1, 12), 0.0)),
            (EffectKind::TapeStop, EffectParams::new(1.0, Tick::from_measures(1), 0.0)),
            (EffectKind::Echo, EffectParams::new(1.0, Tick::new(1, 4), 0.6)),
            (EffectKind::SideChain, EffectParams::new(1.0, Tick::new(1, 4), 0.7)),
        ]
        .into_iter()
        .collect();
        Self { params }
    }

    /// Gets the parameters for `kind`.
    #[must_use]
    pub fn get(&self, kind: EffectKind) -> EffectParams {
        self.params.get(&kind).copied().unwrap_or_default()
    }

    /// Replaces the parameters for `kind`, returning the previous entry.
    pub fn set(&mut self, kind: EffectKind, params: EffectParams) -> Option<EffectParams> {
        self.params.insert(kind, params)
    }
}
