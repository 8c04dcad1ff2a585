//! Definitions of chart entities and their identifiers.

use crate::timing::Tick;

use super::{LaneKind, effect::EffectKind, effect::EffectParams};

/// Identifier of an entity, unique over the whole chart and never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub usize);

impl AsRef<usize> for EntityId {
    fn as_ref(&self) -> &usize {
        &self.0
    }
}

impl EntityId {
    /// Create a new `EntityId`
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the contained id value.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl From<usize> for EntityId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<EntityId> for usize {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a lane in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneId(pub usize);

impl LaneId {
    /// Create a new `LaneId`
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the contained index.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl From<usize> for LaneId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for LaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lane {}", self.0)
    }
}

/// A discrete press, or a hold when it has a duration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonData {
    /// Effect applied while the button is held, only meaningful on effect lanes.
    pub effect: Option<EffectKind>,
    /// Parameters overriding the chart's defaults for `effect`.
    pub effect_params: Option<EffectParams>,
}

/// Interpolation curve of a laser segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveShape {
    /// Straight line.
    #[default]
    Linear,
    /// Starts slow, ends fast.
    EaseIn,
    /// Starts fast, ends slow.
    EaseOut,
    /// Slow at both ends.
    Smooth,
}

impl CurveShape {
    /// Maps the progress `t` in `0..=1` onto the curve, also in `0..=1`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::Smooth => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// A segment of a continuous laser gesture.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaserSegment {
    /// Value at the start of the segment, `0` is the left edge.
    pub initial: f64,
    /// Value at the end of the segment.
    pub final_value: f64,
    /// How the value moves from `initial` to `final_value`.
    pub curve: CurveShape,
    /// Whether the laser spans twice the usual width.
    pub wide: bool,
}

impl LaserSegment {
    /// Creates a linear segment.
    #[must_use]
    pub const fn new(initial: f64, final_value: f64) -> Self {
        Self {
            initial,
            final_value,
            curve: CurveShape::Linear,
            wide: false,
        }
    }

    /// Sets the curve shape.
    #[must_use]
    pub const fn with_curve(mut self, curve: CurveShape) -> Self {
        self.curve = curve;
        self
    }

    /// Value at progress `t` in `0..=1` through the segment.
    #[must_use]
    pub fn value_at(&self, t: f64) -> f64 {
        self.initial + (self.final_value - self.initial) * self.curve.apply(t)
    }
}

/// Audio filter driven by the lasers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterKind {
    /// Peaking filter.
    Peak,
    /// Low pass filter.
    LowPass,
    /// High pass filter.
    HighPass,
    /// Bit crusher.
    BitCrush,
}

/// Camera parameter animated along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraParam {
    /// Zoom towards the judgment line.
    Zoom,
    /// Tilt of the track.
    Pitch,
    /// Horizontal offset of the track.
    Offset,
    /// Roll of the track.
    Roll,
}

/// Out-of-band parameter change positioned on the chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChartEvent {
    /// Gain of the laser filter.
    LaserGain(f64),
    /// Filter driven by the lasers.
    FilterKind(FilterKind),
    /// Volume of laser slam sounds.
    SlamVolume(f64),
    /// A point on a camera path.
    CameraPoint {
        /// The animated parameter.
        param: CameraParam,
        /// Value at this point.
        value: f64,
    },
    /// Changes the effect of an effect lane.
    EffectKind {
        /// The effect lane affected.
        lane: LaneId,
        /// The new effect.
        effect: EffectKind,
    },
}

/// Payload of an entity. The variant must match the [`LaneKind`] of its lane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityData {
    /// A button press or hold.
    Button(ButtonData),
    /// A laser segment.
    Laser(LaserSegment),
    /// A generic event.
    Event(ChartEvent),
}

impl EntityData {
    /// The lane kind able to hold this payload.
    #[must_use]
    pub const fn lane_kind(&self) -> LaneKind {
        match self {
            Self::Button(_) => LaneKind::Button,
            Self::Laser(_) => LaneKind::Laser,
            Self::Event(_) => LaneKind::Event,
        }
    }
}

/// An object positioned on one lane of the chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub(crate) lane: LaneId,
    pub(crate) position: Tick,
    pub(crate) duration: Tick,
    pub(crate) previous: Option<EntityId>,
    pub(crate) next: Option<EntityId>,
    pub(crate) data: EntityData,
}

impl Entity {
    /// The lane holding this entity.
    #[must_use]
    pub const fn lane(&self) -> LaneId {
        self.lane
    }

    /// Start position.
    #[must_use]
    pub const fn position(&self) -> Tick {
        self.position
    }

    /// Length, zero for instantaneous entities.
    #[must_use]
    pub const fn duration(&self) -> Tick {
        self.duration
    }

    /// End position, `position + duration`.
    #[must_use]
    pub fn end_position(&self) -> Tick {
        self.position + self.duration
    }

    /// Previous member of the chain.
    #[must_use]
    pub const fn previous(&self) -> Option<EntityId> {
        self.previous
    }

    /// Next member of the chain.
    #[must_use]
    pub const fn next(&self) -> Option<EntityId> {
        self.next
    }

    /// Whether linked to any other entity.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.previous.is_some() || self.next.is_some()
    }

    /// The payload.
    #[must_use]
    pub const fn data(&self) -> &EntityData {
        &self.data
    }

    /// The payload, if this is a laser segment.
    #[must_use]
    pub const fn as_laser(&self) -> Option<&LaserSegment> {
        match &self.data {
            EntityData::Laser(segment) => Some(segment),
            _ => None,
        }
    }

    /// The payload, if this is a button.
    #[must_use]
    pub const fn as_button(&self) -> Option<&ButtonData> {
        match &self.data {
            EntityData::Button(button) => Some(button),
            _ => None,
        }
    }

    /// The payload, if this is an event.
    #[must_use]
    pub const fn as_event(&self) -> Option<&ChartEvent> {
        match &self.data {
            EntityData::Event(event) => Some(event),
            _ => None,
        }
    }
}
