//! Explicit links between entities of one lane, forming holds and laser sweeps.

use itertools::Itertools;

use super::{Chart, ChartError, Entity, EntityId, Result};

/// Iterator over the members of a chain, from its head to its tail.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    chart: &'a Chart,
    next: Option<EntityId>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (EntityId, &'a Entity);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.remaining = self.remaining.checked_sub(1)?;
        let entity = self.chart.entity(id)?;
        self.next = entity.next;
        Some((id, entity))
    }
}

impl Chart {
    /// Links `next` after `previous`.
    ///
    /// # Errors
    ///
    /// - [`ChartError::UnknownEntity`] if either entity does not exist.
    /// - [`ChartError::CrossLaneLink`] if they are on different lanes.
    /// - [`ChartError::AlreadyLinked`] if `previous` already has a successor or `next` a
    ///   predecessor.
    /// - [`ChartError::LinkOrder`] if `next` starts before `previous`, or starts together with a
    ///   `previous` that has a duration, or the link would close a loop.
    pub fn link(&mut self, previous: EntityId, next: EntityId) -> Result<()> {
        let prev_entity = self
            .entity(previous)
            .ok_or(ChartError::UnknownEntity(previous))?;
        let next_entity = self.entity(next).ok_or(ChartError::UnknownEntity(next))?;
        if prev_entity.lane != next_entity.lane {
            return Err(ChartError::CrossLaneLink { previous, next });
        }
        if prev_entity.next.is_some() {
            return Err(ChartError::AlreadyLinked(previous));
        }
        if next_entity.previous.is_some() {
            return Err(ChartError::AlreadyLinked(next));
        }
        let ordered = prev_entity.position < next_entity.position
            || (prev_entity.position == next_entity.position && prev_entity.duration.is_zero());
        if previous == next || !ordered || self.chain_head(previous) == Some(next) {
            return Err(ChartError::LinkOrder { previous, next });
        }

        if let Some(entity) = self.entity_mut(previous) {
            entity.next = Some(next);
        }
        if let Some(entity) = self.entity_mut(next) {
            entity.previous = Some(previous);
        }
        debug_assert_eq!(self.verify_chains(), Ok(()));
        Ok(())
    }

    /// Breaks the link from `id` to its successor, returning the former successor.
    ///
    /// # Errors
    ///
    /// - [`ChartError::UnknownEntity`] if the entity does not exist.
    pub fn unlink(&mut self, id: EntityId) -> Result<Option<EntityId>> {
        let entity = self.entity_mut(id).ok_or(ChartError::UnknownEntity(id))?;
        let Some(next) = entity.next.take() else {
            return Ok(None);
        };
        if let Some(successor) = self.entity_mut(next) {
            successor.previous = None;
        }
        debug_assert_eq!(self.verify_chains(), Ok(()));
        Ok(Some(next))
    }

    /// Breaks both links of `id`, leaving it free to be removed.
    ///
    /// # Errors
    ///
    /// - [`ChartError::UnknownEntity`] if the entity does not exist.
    pub fn detach(&mut self, id: EntityId) -> Result<()> {
        let previous = self
            .entity(id)
            .ok_or(ChartError::UnknownEntity(id))?
            .previous;
        if let Some(previous) = previous {
            self.unlink(previous)?;
        }
        self.unlink(id)?;
        debug_assert_eq!(self.verify_chains(), Ok(()));
        Ok(())
    }

    /// First member of the chain holding `id`.
    #[must_use]
    pub fn chain_head(&self, id: EntityId) -> Option<EntityId> {
        self.walk(id, |entity| entity.previous)
    }

    /// Last member of the chain holding `id`.
    #[must_use]
    pub fn chain_tail(&self, id: EntityId) -> Option<EntityId> {
        self.walk(id, |entity| entity.next)
    }

    /// Iterates the whole chain holding `id`, starting from its head.
    ///
    /// An unlinked entity is a chain of one.
    #[must_use]
    pub fn chain(&self, id: EntityId) -> Chain<'_> {
        Chain {
            chart: self,
            next: self.chain_head(id),
            remaining: self.entities.len(),
        }
    }

    /// Checks that every link is mirrored, ordered and stays within its lane.
    ///
    /// # Errors
    ///
    /// - [`ChartError::BrokenChain`] on a dangling or one-sided link, or a loop.
    /// - [`ChartError::CrossLaneLink`] or [`ChartError::LinkOrder`] on a misplaced link.
    pub fn verify_chains(&self) -> Result<()> {
        for (id, _) in self.entities().filter(|(_, entity)| entity.previous.is_none()) {
            let members: Vec<_> = Chain {
                chart: self,
                next: Some(id),
                remaining: self.entities.len(),
            }
            .collect();
            if let Some((last_id, last)) = members.last()
                && let Some(dangling) = last.next
            {
                return Err(ChartError::BrokenChain {
                    entity: *last_id,
                    link: dangling,
                });
            }
            for ((previous, prev_entity), (next, next_entity)) in
                members.iter().copied().tuple_windows()
            {
                if next_entity.previous != Some(previous) {
                    return Err(ChartError::BrokenChain {
                        entity: previous,
                        link: next,
                    });
                }
                if prev_entity.lane != next_entity.lane {
                    return Err(ChartError::CrossLaneLink { previous, next });
                }
                if next_entity.position < prev_entity.position {
                    return Err(ChartError::LinkOrder { previous, next });
                }
            }
        }
        // members of a loop have a predecessor each, so no head reaches them
        if let Some((id, entity)) = self
            .entities()
            .find(|(id, entity)| entity.previous.is_some() && self.chain_head(*id).is_none())
        {
            return Err(ChartError::BrokenChain {
                entity: id,
                link: entity.previous.unwrap_or(id),
            });
        }
        Ok(())
    }

    /// Follows `step` from `id` until it runs out, giving up after visiting every entity once.
    fn walk(&self, id: EntityId, step: impl Fn(&Entity) -> Option<EntityId>) -> Option<EntityId> {
        let mut current = id;
        for _ in 0..=self.entities.len() {
            match step(self.entity(current)?) {
                Some(following) => current = following,
                None => return Some(current),
            }
        }
        None
    }
}
