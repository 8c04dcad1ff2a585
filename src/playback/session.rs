//! A chart and a cursor driven together, with listeners able to edit the chart.
//!
//! Crossings are delivered while the cursor sweeps, when neither the chart nor the cursor can be
//! changed. Listeners queue their edits in a [`Deferred`] instead. The session applies them in
//! queue order once the sweep has completed, delivering the crossings they cause to the same
//! listener, until the queue is empty.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::chart::{Chart, ChartError, Entity, EntityData, EntityId, LaneId};
use crate::timing::{Seconds, Tick};

use super::config::CursorConfig;
use super::crossing::{Crossing, CrossingSink};
use super::cursor::PlaybackCursor;

/// An edit queued by a listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Adds an entity, see [`Chart::add_entity`].
    Insert {
        /// Lane to insert into.
        lane: LaneId,
        /// Start position.
        position: Tick,
        /// Length.
        duration: Tick,
        /// Payload.
        data: EntityData,
    },
    /// Removes an entity, see [`Chart::remove_entity`].
    Remove(EntityId),
}

/// Queue of edits to apply after the current sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deferred {
    mutations: Vec<Mutation>,
}

impl Deferred {
    /// Queues an insertion.
    pub fn insert(&mut self, lane: LaneId, position: Tick, duration: Tick, data: EntityData) {
        self.mutations.push(Mutation::Insert {
            lane,
            position,
            duration,
            data,
        });
    }

    /// Queues a removal.
    pub fn remove(&mut self, id: EntityId) {
        self.mutations.push(Mutation::Remove(id));
    }

    /// The queued edits, oldest first.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Number of queued edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Receiver of the crossings of a [`PlaybackSession`].
pub trait SessionListener {
    /// Called for each crossing. `chart` is the chart as of the start of the sweep.
    fn on_crossing(&mut self, crossing: &Crossing, chart: &Chart, deferred: &mut Deferred);
}

impl<F: FnMut(&Crossing, &Chart, &mut Deferred)> SessionListener for F {
    fn on_crossing(&mut self, crossing: &Crossing, chart: &Chart, deferred: &mut Deferred) {
        self(crossing, chart, deferred);
    }
}

struct Relay<'a, L: SessionListener + ?Sized> {
    listener: &'a mut L,
    chart: &'a Chart,
    deferred: &'a mut Deferred,
}

impl<L: SessionListener + ?Sized> CrossingSink for Relay<'_, L> {
    fn on_crossing(&mut self, crossing: Crossing) {
        self.listener
            .on_crossing(&crossing, self.chart, self.deferred);
    }
}

/// Owns a chart and the cursor walking it.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    chart: Chart,
    cursor: PlaybackCursor,
}

impl PlaybackSession {
    /// Creates a session with the cursor before the beginning of `chart`.
    #[must_use]
    pub fn new(chart: Chart, config: CursorConfig) -> Self {
        let cursor = PlaybackCursor::new(&chart, config);
        Self { chart, cursor }
    }

    /// The chart.
    #[must_use]
    pub const fn chart(&self) -> &Chart {
        &self.chart
    }

    /// The cursor.
    #[must_use]
    pub const fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// The cursor, mutably, for declaring windows or changing its configuration.
    pub const fn cursor_mut(&mut self) -> &mut PlaybackCursor {
        &mut self.cursor
    }

    /// Takes the chart back.
    #[must_use]
    pub fn into_chart(self) -> Chart {
        self.chart
    }

    /// Edits the chart directly, then resets the cursor.
    pub fn edit_chart<R>(&mut self, edit: impl FnOnce(&mut Chart) -> R) -> R {
        let result = edit(&mut self.chart);
        self.cursor.reset(&self.chart);
        result
    }

    /// Resets the cursor, see [`PlaybackCursor::reset`].
    pub fn reset(&mut self) {
        self.cursor.reset(&self.chart);
    }

    /// Moves the cursor to `next`, then applies the edits queued by `listener`.
    ///
    /// # Errors
    ///
    /// Returns the first error of a queued edit. The remaining edits are applied regardless.
    pub fn advance<L: SessionListener + ?Sized>(
        &mut self,
        next: Seconds,
        listener: &mut L,
    ) -> Result<(), ChartError> {
        let mut deferred = Deferred::default();
        self.cursor.advance(
            next,
            &mut Relay {
                listener: &mut *listener,
                chart: &self.chart,
                deferred: &mut deferred,
            },
        );
        self.drain(deferred, listener)
    }

    /// Adds an entity to the chart and the cursor, see [`PlaybackCursor::add_object`].
    ///
    /// # Errors
    ///
    /// - The errors of [`Chart::add_entity`].
    /// - The first error of an edit queued by `listener`.
    pub fn insert_entity<L: SessionListener + ?Sized>(
        &mut self,
        lane: LaneId,
        position: Tick,
        duration: Tick,
        data: EntityData,
        listener: &mut L,
    ) -> Result<EntityId, ChartError> {
        let mut deferred = Deferred::default();
        let id = self.insert_now(lane, position, duration, data, listener, &mut deferred)?;
        self.drain(deferred, listener)?;
        Ok(id)
    }

    /// Removes an entity from the cursor and the chart, see [`PlaybackCursor::remove_object`].
    ///
    /// # Errors
    ///
    /// - The errors of [`Chart::remove_entity`], checked before the cursor is touched.
    /// - The first error of an edit queued by `listener`.
    pub fn remove_entity<L: SessionListener + ?Sized>(
        &mut self,
        id: EntityId,
        listener: &mut L,
    ) -> Result<Entity, ChartError> {
        let mut deferred = Deferred::default();
        let entity = self.remove_now(id, listener, &mut deferred)?;
        self.drain(deferred, listener)?;
        Ok(entity)
    }

    fn insert_now<L: SessionListener + ?Sized>(
        &mut self,
        lane: LaneId,
        position: Tick,
        duration: Tick,
        data: EntityData,
        listener: &mut L,
        deferred: &mut Deferred,
    ) -> Result<EntityId, ChartError> {
        let id = self.chart.add_entity(lane, position, duration, data)?;
        self.cursor.add_object(
            &self.chart,
            id,
            &mut Relay {
                listener,
                chart: &self.chart,
                deferred,
            },
        )?;
        Ok(id)
    }

    fn remove_now<L: SessionListener + ?Sized>(
        &mut self,
        id: EntityId,
        listener: &mut L,
        deferred: &mut Deferred,
    ) -> Result<Entity, ChartError> {
        let entity = self.chart.entity(id).ok_or(ChartError::UnknownEntity(id))?;
        if entity.is_linked() {
            return Err(ChartError::StillLinked(id));
        }
        self.cursor.remove_object(
            id,
            &mut Relay {
                listener,
                chart: &self.chart,
                deferred,
            },
        );
        self.chart.remove_entity(id)
    }

    fn drain<L: SessionListener + ?Sized>(
        &mut self,
        deferred: Deferred,
        listener: &mut L,
    ) -> Result<(), ChartError> {
        let mut queue = VecDeque::from(deferred.mutations);
        if queue.is_empty() {
            return Ok(());
        }
        debug!("applying {} deferred mutations", queue.len());
        let mut first_error = None;
        while let Some(mutation) = queue.pop_front() {
            let mut deferred = Deferred::default();
            let result = match mutation {
                Mutation::Insert {
                    lane,
                    position,
                    duration,
                    data,
                } => self
                    .insert_now(lane, position, duration, data, listener, &mut deferred)
                    .map(drop),
                Mutation::Remove(id) => self.remove_now(id, listener, &mut deferred).map(drop),
            };
            queue.extend(deferred.mutations);
            if let Err(error) = result {
                warn!("deferred mutation failed: {error}");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
