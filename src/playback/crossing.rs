//! Crossing events emitted while the cursor moves, and the sinks receiving them.

use crate::chart::{EntityId, LaneId};

use super::window::WindowId;

/// Direction the cursor moved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Playback towards later times.
    Forward,
    /// Rewinding towards earlier times.
    Backward,
}

/// The moving edge an entity crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    /// Front of the look-ahead window, `position + look_ahead`.
    Primary,
    /// The playback position itself.
    Critical,
    /// Back of the look-behind window, `position - look_behind`.
    Secondary,
    /// A named window declared with [`super::PlaybackCursor::add_window`].
    Window(WindowId),
}

/// Which end of the entity crossed the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossingKind {
    /// The start of the entity.
    Head,
    /// The end of the entity, `start + duration`.
    Tail,
}

/// One end of an entity crossing one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crossing {
    /// The edge crossed.
    pub edge: Edge,
    /// The end of the entity that crossed.
    pub kind: CrossingKind,
    /// Which way the edge was moving.
    pub direction: Direction,
    /// The entity.
    pub entity: EntityId,
    /// Lane of the entity.
    pub lane: LaneId,
}

impl Crossing {
    /// Whether this is a head crossing.
    #[must_use]
    pub const fn is_head(&self) -> bool {
        matches!(self.kind, CrossingKind::Head)
    }

    /// Whether this is a tail crossing.
    #[must_use]
    pub const fn is_tail(&self) -> bool {
        matches!(self.kind, CrossingKind::Tail)
    }
}

/// Receiver of crossings, called synchronously in sweep order.
pub trait CrossingSink {
    /// Called for each crossing.
    fn on_crossing(&mut self, crossing: Crossing);
}

impl CrossingSink for Vec<Crossing> {
    fn on_crossing(&mut self, crossing: Crossing) {
        self.push(crossing);
    }
}

impl<S: CrossingSink + ?Sized> CrossingSink for &mut S {
    fn on_crossing(&mut self, crossing: Crossing) {
        (**self).on_crossing(crossing);
    }
}

/// Adapts a closure into a [`CrossingSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FnSink<F>(pub F);

impl<F: FnMut(Crossing)> CrossingSink for FnSink<F> {
    fn on_crossing(&mut self, crossing: Crossing) {
        (self.0)(crossing);
    }
}

/// Discards every crossing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreCrossings;

impl CrossingSink for IgnoreCrossings {
    fn on_crossing(&mut self, _: Crossing) {}
}
