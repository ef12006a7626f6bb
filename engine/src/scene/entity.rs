//! Entity handles for scene objects.
//!
//! An [`Entity`] combines an [`Id`] and a [`Generation`]. The id identifies the object slot in
//! the scene, while the generation tracks how many times that slot has been reused. A handle to
//! a destroyed object keeps its old generation, so it never aliases the object that reuses the
//! slot:
//!
//! ```rust,ignore
//! let entity = allocator.alloc(); // Entity { id: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc();  // Entity { id: 0, generation: 1 }
//! assert_ne!(entity, reused);
//! ```

use std::{collections::VecDeque, fmt};

/// The generation of an entity, used to track whether an entity is the live object in its slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    const FIRST: Self = Self(0);

    /// Get the next generation from the current. Wraps after `u32::MAX` reuses of one id.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// An entity identifier, unique among the live objects of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A handle to an object in a scene.
///
/// Handles are plain values: copying one does not keep the object alive, and the scene may
/// destroy the object at any time. Check [`Host::is_alive`](crate::singleton::Host::is_alive)
/// before relying on one you did not just receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: Id,
    generation: Generation,
}

impl Entity {
    /// Construct a new entity with just an id. This will default to the first generation.
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id.0, self.generation.0)
    }
}

/// Ordered by id first, then generation.
impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.id.cmp(&other.id) {
            std::cmp::Ordering::Equal => self.generation.cmp(&other.generation),
            ord => ord,
        }
    }
}

/// An allocator for scene entities.
///
/// Allocates unique ids and recycles freed ones. When an entity is freed its generation is
/// incremented before the id goes back into the dead pool, invalidating stale handles.
///
/// The allocator is owned by a [`Scene`](super::Scene), which is `!Send`, so plain `&mut self`
/// access is enough.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Current generation for each id slot, indexed by entity id.
    generations: Vec<Generation>,

    /// Ids available for reuse, oldest first.
    dead_pool: VecDeque<Id>,
}

impl Allocator {
    #[inline]
    pub const fn new() -> Self {
        Self {
            generations: Vec::new(),
            dead_pool: VecDeque::new(),
        }
    }

    /// Allocate a new entity, either by reusing a freed id from the dead pool or by allocating a
    /// new one.
    pub fn alloc(&mut self) -> Entity {
        if let Some(id) = self.dead_pool.pop_front() {
            return Entity::new_with_generation(id, self.generations[id.0 as usize]);
        }

        let id = Id(self.generations.len() as u32);
        self.generations.push(Generation::FIRST);
        Entity::new(id)
    }

    /// Free an entity for reuse.
    ///
    /// Freeing a stale handle (one whose generation is already outdated) does nothing.
    pub fn free(&mut self, entity: Entity) {
        let Some(generation) = self.generations.get_mut(entity.index()) else {
            return;
        };
        if *generation != entity.generation() {
            return;
        }
        *generation = generation.next();
        self.dead_pool.push_back(entity.id());
    }

    /// The number of ids ever handed out, live or dead.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}

#[test]
fn allocator_uniqueness() {
    // Given
    let mut allocator = Allocator::default();

    // When
    let mut entities = Vec::new();
    for _ in 0..200 {
        entities.push(allocator.alloc());
    }

    // Then - No dupes generated
    let pre_len = entities.len();
    entities.sort();
    entities.dedup();
    assert_eq!(pre_len, entities.len());
}

#[test]
fn allocator_reuse_bumps_generation() {
    // Given
    let mut allocator = Allocator::default();
    let first = allocator.alloc();
    let second = allocator.alloc();

    // When
    allocator.free(first);
    let reused = allocator.alloc();

    // Then
    assert_eq!(reused.id(), first.id());
    assert_eq!(reused.generation(), Generation(1));
    assert_ne!(reused, first);
    assert_ne!(reused, second);
    assert_eq!(allocator.capacity(), 2);
}

#[test]
fn allocator_ignores_stale_free() {
    // Given
    let mut allocator = Allocator::default();
    let entity = allocator.alloc();
    allocator.free(entity);
    let reused = allocator.alloc();

    // When - Free the stale handle again
    allocator.free(entity);

    // Then - The live entity keeps its slot and a fresh id is allocated next
    let next = allocator.alloc();
    assert_eq!(reused.generation(), Generation(1));
    assert_ne!(next.id(), reused.id());
}

#[test]
fn entity_ordering() {
    // Given
    let e1 = Entity::new(Id(1));
    let e2 = Entity::new(Id(2));
    let e1_gen1 = Entity::new_with_generation(Id(1), Generation(1));

    // Then - Ordered by ID first, then generation
    assert!(e1 < e2);
    assert!(e1 < e1_gen1);
    assert!(e1_gen1 < e2);
}

#[test]
fn entity_display() {
    let entity = Entity::new_with_generation(Id(7), Generation(2));
    assert_eq!(entity.to_string(), "7v2");
    assert_eq!(entity.index(), 7);
}

#[test]
fn generation_wraps_instead_of_overflowing() {
    let last = Generation(u32::MAX);
    assert_eq!(last.next(), Generation::FIRST);
    assert_eq!(Generation::FIRST.next(), Generation(1));
}
