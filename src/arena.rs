use crate::Entity;

/// A handle to an entity stored in an [`EntityArena`].
///
/// Handles are cheap to copy and never own the entity. Each one carries the generation of the slot it was issued for:
/// once the entity is removed, the handle stops resolving, even after the slot is reused for a new entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: usize,
    generation: u32,
}
impl EntityId {
    /// Returns the raw slot index of this handle.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    /// Returns the slot generation this handle was issued for.
    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}
impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Slot storage for the entities of a tree.
///
/// Entities refer to their parent and children by [`EntityId`], so the tree owns everything top-down
/// through this arena and there are no reference cycles.
/// Freed slots are recycled with a bumped generation, which invalidates every handle to the old entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
}
impl EntityArena {
    /// Creates a new, empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entity and returns its handle.
    pub fn alloc(&mut self, entity: Entity) -> EntityId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.entity = Some(entity);
                return EntityId {
                    index,
                    generation: slot.generation,
                };
            }
        }

        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Takes an entity out of the arena, freeing its slot.
    ///
    /// Returns `None` if the handle is stale.
    pub fn free(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }

        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(entity)
    }

    /// Returns the entity for a handle, if it is still live.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index)?;
        if slot.generation == id.generation {
            slot.entity.as_ref()
        } else {
            None
        }
    }

    /// Returns the entity for a handle, if it is still live.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation == id.generation {
            slot.entity.as_mut()
        } else {
            None
        }
    }

    /// Returns true if the handle refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of live entities in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns true if the arena holds no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
