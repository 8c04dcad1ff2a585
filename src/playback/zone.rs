//! Per-lane zone bookkeeping of the cursor.
//!
//! Each lane keeps its tracked entities in four queues. The three built-in edges partition them:
//!
//! - Ahead: start not yet passed by the primary edge.
//! - Primary: start passed by the primary edge, not by the critical edge.
//! - Secondary: start passed by the critical edge, end not passed by the secondary edge.
//! - Behind: end passed by the secondary edge.
//!
//! An edge has passed a time only when the time lies strictly before the edge. A time exactly on
//! an edge is not yet crossed, so repeated moves onto the same edge never fire twice. The first three queues are
//! sorted by start time, Behind by end time. Every sweep moves entities only at the ends of the
//! queues, except for the Secondary queue, which is searched.

use std::collections::VecDeque;

use itertools::Itertools;
use log::trace;

use crate::chart::{EntityId, LaneId};
use crate::timing::Seconds;

use super::crossing::{Crossing, CrossingKind, CrossingSink, Direction, Edge};

/// Zone of an entity relative to the built-in edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Zone {
    /// Not visible yet.
    Ahead,
    /// Visible, approaching the playback position.
    Primary,
    /// Started, still visible behind the playback position.
    Secondary,
    /// Gone.
    Behind,
}

impl Zone {
    /// All zones, in the order entities pass them during playback.
    pub const ALL: [Self; 4] = [Self::Ahead, Self::Primary, Self::Secondary, Self::Behind];
}

/// An entity with its start and end time cached at tracking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracked {
    /// The entity.
    pub id: EntityId,
    /// Time of the start.
    pub start: Seconds,
    /// Time of the end, equal to `start` for instantaneous entities.
    pub end: Seconds,
}

impl Tracked {
    pub(crate) const fn by_start(&self) -> (Seconds, EntityId) {
        (self.start, self.id)
    }

    pub(crate) const fn by_end(&self) -> (Seconds, EntityId) {
        (self.end, self.id)
    }
}

/// Positions of the three built-in edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edges {
    /// `position + look_ahead`
    pub primary: Seconds,
    /// `position`
    pub critical: Seconds,
    /// `position - look_behind`
    pub secondary: Seconds,
}

impl Edges {
    /// Edges before the beginning of time, having passed nothing.
    pub const BEFORE_START: Self = Self {
        primary: Seconds::MIN,
        critical: Seconds::MIN,
        secondary: Seconds::MIN,
    };

    /// Edges after the end of everything, having passed everything.
    pub const AFTER_END: Self = Self {
        primary: Seconds::MAX,
        critical: Seconds::MAX,
        secondary: Seconds::MAX,
    };
}

/// Whether an edge moving from `from` to `to`, in either direction, crosses `time`.
pub(crate) fn crosses(time: Seconds, from: Seconds, to: Seconds) -> bool {
    from.min(to) <= time && time < from.max(to)
}

/// Whether an edge at `edge` has passed `time`.
pub(crate) fn passed(time: Seconds, edge: Seconds) -> bool {
    time < edge
}

/// Delivers crossings of one lane to a sink.
pub(crate) struct Emitter<'a, S: CrossingSink + ?Sized> {
    pub(crate) lane: LaneId,
    pub(crate) direction: Direction,
    pub(crate) sink: &'a mut S,
}

impl<S: CrossingSink + ?Sized> Emitter<'_, S> {
    pub(crate) fn emit(&mut self, edge: Edge, kind: CrossingKind, entity: EntityId) {
        let crossing = Crossing {
            edge,
            kind,
            direction: self.direction,
            entity,
            lane: self.lane,
        };
        trace!("{crossing:?}");
        self.sink.on_crossing(crossing);
    }

    pub(crate) const fn is_forward(&self) -> bool {
        matches!(self.direction, Direction::Forward)
    }
}

pub(crate) fn pop_front_if(
    queue: &mut VecDeque<Tracked>,
    predicate: impl Fn(&Tracked) -> bool,
) -> Option<Tracked> {
    if queue.front().is_some_and(predicate) {
        queue.pop_front()
    } else {
        None
    }
}

pub(crate) fn pop_back_if(
    queue: &mut VecDeque<Tracked>,
    predicate: impl Fn(&Tracked) -> bool,
) -> Option<Tracked> {
    if queue.back().is_some_and(predicate) {
        queue.pop_back()
    } else {
        None
    }
}

/// Inserts keeping `queue` sorted by `key`.
pub(crate) fn insert_sorted<K: Ord>(
    queue: &mut VecDeque<Tracked>,
    entity: Tracked,
    key: impl Fn(&Tracked) -> K,
) {
    let index = queue.partition_point(|other| key(other) < key(&entity));
    queue.insert(index, entity);
}

/// Merges `other` into `queue`, both sorted by `key`.
pub(crate) fn merge_sorted<K: Ord>(
    queue: &mut VecDeque<Tracked>,
    other: VecDeque<Tracked>,
    key: impl Fn(&Tracked) -> K,
) {
    if other.is_empty() {
        return;
    }
    let merged = std::mem::take(queue)
        .into_iter()
        .merge_by(other, |left, right| key(left) <= key(right))
        .collect();
    *queue = merged;
}

/// Removes `id` from `queue`.
pub(crate) fn take_from(queue: &mut VecDeque<Tracked>, id: EntityId) -> Option<Tracked> {
    let index = queue.iter().position(|entity| entity.id == id)?;
    queue.remove(index)
}

/// The four zones of one lane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneZones {
    ahead: VecDeque<Tracked>,
    primary: VecDeque<Tracked>,
    secondary: VecDeque<Tracked>,
    behind: VecDeque<Tracked>,
}

impl LaneZones {
    /// Puts every entity in Ahead.
    #[must_use]
    pub fn all_ahead(mut entities: Vec<Tracked>) -> Self {
        entities.sort_by_key(Tracked::by_start);
        Self {
            ahead: entities.into(),
            ..Self::default()
        }
    }

    /// The entities of `zone`, sorted by start time, or by end time for [`Zone::Behind`].
    #[must_use]
    pub const fn queue(&self, zone: Zone) -> &VecDeque<Tracked> {
        match zone {
            Zone::Ahead => &self.ahead,
            Zone::Primary => &self.primary,
            Zone::Secondary => &self.secondary,
            Zone::Behind => &self.behind,
        }
    }

    const fn queue_mut(&mut self, zone: Zone) -> &mut VecDeque<Tracked> {
        match zone {
            Zone::Ahead => &mut self.ahead,
            Zone::Primary => &mut self.primary,
            Zone::Secondary => &mut self.secondary,
            Zone::Behind => &mut self.behind,
        }
    }

    /// Iterates every tracked entity of the lane.
    pub fn iter(&self) -> impl Iterator<Item = &Tracked> {
        Zone::ALL.into_iter().flat_map(|zone| self.queue(zone))
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        Zone::ALL.into_iter().map(|zone| self.queue(zone).len()).sum()
    }

    /// Whether the lane tracks nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the zone holding `id`.
    #[must_use]
    pub fn zone_of(&self, id: EntityId) -> Option<Zone> {
        Zone::ALL
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
            primary,
            secondary,
            behind,
        } = other;
        merge_sorted(&mut self.ahead, ahead, Tracked::by_start);
        merge_sorted(&mut self.primary, primary, Tracked::by_start);
        merge_sorted(&mut self.secondary, secondary, Tracked::by_start);
        merge_sorted(&mut self.behind, behind, Tracked::by_end);
    }

    /// Moves the built-in edges from `from` to `to`, moving entities between zones and emitting
    /// their crossings.
    ///
    /// All three edges must move in the direction of the emitter, or stay.
    pub(crate) fn sweep<S: CrossingSink + ?Sized>(
        &mut self,
        from: &Edges,
        to: &Edges,
        out: &mut Emitter<'_, S>,
    ) {
        if out.is_forward() {
            self.sweep_forward(from, to, out);
        } else {
            self.sweep_backward(from, to, out);
        }
    }

    fn sweep_forward<S: CrossingSink + ?Sized>(
        &mut self,
        from: &Edges,
        to: &Edges,
        out: &mut Emitter<'_, S>,
    ) {
        while let Some(entity) =
            pop_front_if(&mut self.ahead, |e| passed(e.start, to.primary))
        {
            out.emit(Edge::Primary, CrossingKind::Head, entity.id);
            self.primary.push_back(entity);
        }
        self.emit_tails(Edge::Primary, from.primary, to.primary, out);

        while let Some(entity) =
            pop_front_if(&mut self.primary, |e| passed(e.start, to.critical))
        {
            out.emit(Edge::Critical, CrossingKind::Head, entity.id);
            self.secondary.push_back(entity);
        }
        self.emit_tails(Edge::Critical, from.critical, to.critical, out);

        for entity in &self.secondary {
            if crosses(entity.start, from.secondary, to.secondary) {
                out.emit(Edge::Secondary, CrossingKind::Head, entity.id);
            }
        }
        let (gone, kept): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.secondary)
            .into_iter()
            .partition(|entity| passed(entity.end, to.secondary));
        self.secondary = kept;
        let mut gone = Vec::from(gone);
        gone.sort_by_key(Tracked::by_end);
        for entity in gone {
            out.emit(Edge::Secondary, CrossingKind::Tail, entity.id);
            self.behind.push_back(entity);
        }
    }

    fn sweep_backward<S: CrossingSink + ?Sized>(
        &mut self,
        from: &Edges,
        to: &Edges,
        out: &mut Emitter<'_, S>,
    ) {
        while let Some(entity) =
            pop_back_if(&mut self.behind, |e| !passed(e.end, to.secondary))
        {
            out.emit(Edge::Secondary, CrossingKind::Tail, entity.id);
            insert_sorted(&mut self.secondary, entity, Tracked::by_start);
        }
        for entity in self.secondary.iter().rev() {
            if crosses(entity.start, from.secondary, to.secondary) {
                out.emit(Edge::Secondary, CrossingKind::Head, entity.id);
            }
        }

        self.emit_tails(Edge::Critical, from.critical, to.critical, out);
        while let Some(entity) =
            pop_back_if(&mut self.secondary, |e| !passed(e.start, to.critical))
        {
            out.emit(Edge::Critical, CrossingKind::Head, entity.id);
            self.primary.push_front(entity);
        }

        self.emit_tails(Edge::Primary, from.primary, to.primary, out);
        while let Some(entity) =
            pop_back_if(&mut self.primary, |e| !passed(e.start, to.primary))
        {
            out.emit(Edge::Primary, CrossingKind::Head, entity.id);
            self.ahead.push_front(entity);
        }
    }

    /// Emits tails crossing an edge. Only visible entities can have an end near an edge.
    fn emit_tails<S: CrossingSink + ?Sized>(
        &self,
        edge: Edge,
        from: Seconds,
        to: Seconds,
        out: &mut Emitter<'_, S>,
    ) {
        let mut crossed: Vec<_> = self
            .primary
            .iter()
            .chain(&self.secondary)
            .filter(|entity| crosses(entity.end, from, to))
            .map(Tracked::by_end)
            .collect();
        crossed.sort_unstable();
        if !out.is_forward() {
            crossed.reverse();
        }
        for (_, id) in crossed {
            out.emit(edge, CrossingKind::Tail, id);
        }
    }
}
