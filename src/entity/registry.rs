//! Actor table - owns every actor, addressed by id

use ahash::AHashMap;

use crate::core::types::ActorId;
use crate::entity::actor::Actor;

/// All actors in the world
///
/// Slots are never reused: a despawned actor leaves a tombstone so stale
/// events addressed to it resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct ActorTable {
    slots: Vec<Option<Actor>>,
    index: AHashMap<ActorId, usize>,
    next_id: u32,
}

impl ActorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor, assigning it the next sequential id
    pub fn spawn(&mut self, mut actor: Actor) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        actor.id = id;

        tracing::debug!(actor = %id, name = %actor.name, position = %actor.position, "Actor spawned");

        self.index.insert(id, self.slots.len());
        self.slots.push(Some(actor));
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        let slot = *self.index.get(&id)?;
        self.slots.get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        let slot = *self.index.get(&id)?;
        self.slots.get_mut(slot)?.as_mut()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.index.contains_key(&id)
    }

    /// Remove an actor for good, returning it
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        let slot = self.index.remove(&id)?;
        self.slots.get_mut(slot)?.take()
    }

    /// Live actors in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.slots.iter_mut().flatten()
    }

    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.iter().map(|actor| actor.id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let mut table = ActorTable::new();
        let a = table.spawn(Actor::player("Hero", Position::new(1, 1)));
        let b = table.spawn(Actor::worm("Worm", Position::new(2, 2)));
        assert_eq!(a, ActorId(0));
        assert_eq!(b, ActorId(1));
        assert_eq!(table.get(b).map(|w| w.id), Some(b));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_despawn_leaves_tombstone() {
        let mut table = ActorTable::new();
        let a = table.spawn(Actor::worm("A", Position::new(1, 1)));
        let b = table.spawn(Actor::worm("B", Position::new(2, 1)));

        assert!(table.despawn(a).is_some());
        assert!(table.get(a).is_none());
        assert!(table.despawn(a).is_none());
        assert_eq!(table.get(b).map(|w| w.name.as_str()), Some("B"));

        // ids keep increasing after a despawn
        let c = table.spawn(Actor::worm("C", Position::new(3, 1)));
        assert_eq!(c, ActorId(2));
        assert_eq!(table.ids().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn test_get_mut_updates_actor() {
        let mut table = ActorTable::new();
        let id = table.spawn(Actor::player("Hero", Position::new(1, 1)));
        if let Some(actor) = table.get_mut(id) {
            actor.position = Position::new(4, 4);
        }
        assert_eq!(table.get(id).map(|a| a.position), Some(Position::new(4, 4)));
        assert!(table.get(ActorId(99)).is_none());
    }
}
