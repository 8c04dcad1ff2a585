//! Named windows: extra edges at a fixed offset from the playback position.
//!
//! A window tracks every entity independently of the built-in zones. Entities whose start has not
//! been passed by the edge are ahead of it, the others are behind it. Entities behind the edge are
//! kept apart by whether their end has been passed too, so only the straddling ones are checked for
//! tail crossings.

use std::collections::VecDeque;

use crate::chart::EntityId;
use crate::timing::Seconds;

use super::crossing::{CrossingKind, CrossingSink, Edge};
use super::zone::{
    Emitter, Tracked, insert_sorted, merge_sorted, passed, pop_back_if, pop_front_if, take_from,
};

/// Identifier of a named window of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowId(pub usize);

impl WindowId {
    /// Create a new `WindowId`
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

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window {}", self.0)
    }
}

/// Zone of an entity relative to a named window's edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowZone {
    /// Start not passed yet.
    Ahead,
    /// Start passed, end not passed.
    Straddling,
    /// End passed.
    Passed,
}

impl WindowZone {
    /// All zones, in the order entities pass them during playback.
    pub const ALL: [Self; 3] = [Self::Ahead, Self::Straddling, Self::Passed];
}

/// Zones of one lane relative to a window edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLane {
    ahead: VecDeque<Tracked>,
    straddling: VecDeque<Tracked>,
    passed: VecDeque<Tracked>,
}

impl WindowLane {
    /// Classifies entities against an edge at `edge`, without emitting anything.
    pub fn classify<'a>(entities: impl IntoIterator<Item = &'a Tracked>, edge: Seconds) -> Self {
        let mut lane = Self::default();
        for &entity in entities {
            let zone = if !passed(entity.start, edge) {
                WindowZone::Ahead
            } else if !passed(entity.end, edge) {
                WindowZone::Straddling
            } else {
                WindowZone::Passed
            };
            lane.queue_mut(zone).push_back(entity);
        }
        lane.ahead.make_contiguous().sort_by_key(Tracked::by_start);
        lane.straddling.make_contiguous().sort_by_key(Tracked::by_start);
        lane.passed.make_contiguous().sort_by_key(Tracked::by_end);
        lane
    }

    /// The entities of `zone`, sorted by start time, or by end time for [`WindowZone::Passed`].
    #[must_use]
    pub const fn queue(&self, zone: WindowZone) -> &VecDeque<Tracked> {
        match zone {
            WindowZone::Ahead => &self.ahead,
            WindowZone::Straddling => &self.straddling,
            WindowZone::Passed => &self.passed,
        }
    }

    const fn queue_mut(&mut self, zone: WindowZone) -> &mut VecDeque<Tracked> {
        match zone {
            WindowZone::Ahead => &mut self.ahead,
            WindowZone::Straddling => &mut self.straddling,
            WindowZone::Passed => &mut self.passed,
        }
    }

    /// Finds the zone holding `id`.
    #[must_use]
    pub fn zone_of(&self, id: EntityId) -> Option<WindowZone> {
        WindowZone::ALL
            .into_iter()
            .find(|&zone| self.queue(zone).iter().any(|entity| entity.id == id))
    }

    /// Moves `id` out into a lane of its own, keeping its zone.
    pub fn split_off(&mut self, id: EntityId) -> Option<Self> {
        let zone = self.zone_of(id)?;
        let entity = take_from(self.queue_mut(zone), id)?;
        let mut single = Self::default();
        single.queue_mut(zone).push_back(entity);
        Some(single)
    }

    /// Merges the zones of `other` into these.
    pub fn merge(&mut self, other: Self) {
        let Self {
            ahead,
            straddling,
            passed,
        } = other;
        merge_sorted(&mut self.ahead, ahead, Tracked::by_start);
        merge_sorted(&mut self.straddling, straddling, Tracked::by_start);
        merge_sorted(&mut self.passed, passed, Tracked::by_end);
    }

    /// Moves the edge of window `id` to `to`, emitting crossings.
    pub(crate) fn sweep<S: CrossingSink + ?Sized>(
        &mut self,
        id: WindowId,
        to: Seconds,
        out: &mut Emitter<'_, S>,
    ) {
        let edge = Edge::Window(id);
        if out.is_forward() {
            while let Some(entity) = pop_front_if(&mut self.ahead, |e| passed(e.start, to)) {
                out.emit(edge, CrossingKind::Head, entity.id);
                self.straddling.push_back(entity);
            }
            let (gone, kept): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.straddling)
                .into_iter()
                .partition(|entity| passed(entity.end, to));
            self.straddling = kept;
            let mut gone = Vec::from(gone);
            gone.sort_by_key(Tracked::by_end);
            for entity in gone {
                out.emit(edge, CrossingKind::Tail, entity.id);
                self.passed.push_back(entity);
            }
        } else {
            while let Some(entity) = pop_back_if(&mut self.passed, |e| !passed(e.end, to)) {
                out.emit(edge, CrossingKind::Tail, entity.id);
                insert_sorted(&mut self.straddling, entity, Tracked::by_start);
            }
            while let Some(entity) = pop_back_if(&mut self.straddling, |e| !passed(e.start, to)) {
                out.emit(edge, CrossingKind::Head, entity.id);
                self.ahead.push_front(entity);
            }
        }
    }
}

/// An extra edge at `position + offset`, with its zones per lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedWindow {
    name: String,
    offset: Seconds,
    edge: Seconds,
    pub(crate) lanes: Vec<WindowLane>,
}

impl NamedWindow {
    pub(crate) const fn new(
        name: String,
        offset: Seconds,
        edge: Seconds,
        lanes: Vec<WindowLane>,
    ) -> Self {
        Self {
            name,
            offset,
            edge,
            lanes,
        }
    }

    /// The name given on creation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset of the edge from the playback position.
    #[must_use]
    pub const fn offset(&self) -> Seconds {
        self.offset
    }

    /// Current position of the edge.
    #[must_use]
    pub const fn edge(&self) -> Seconds {
        self.edge
    }

    pub(crate) const fn set_edge(&mut self, edge: Seconds) {
        self.edge = edge;
    }

    /// Zones of a lane.
    #[must_use]
    pub fn lane(&self, index: usize) -> Option<&WindowLane> {
        self.lanes.get(index)
    }
}
