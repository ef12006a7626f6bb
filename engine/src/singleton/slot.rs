use std::{any, cell::Cell, fmt, marker::PhantomData};

use crate::scene::Entity;

/// The single cached object for a component type `T`.
///
/// A slot is either empty or holds the handle of exactly one registered object. It does not own
/// the object: the host may destroy it at any time, and the teardown hook is expected to
/// [`clear`](InstanceSlot::clear) the slot when it does.
///
/// The slot uses a [`Cell`], so it is shared by reference between an accessor and the hooks it
/// registers without any locking. It must stay on the host's thread.
pub struct InstanceSlot<T> {
    cached: Cell<Option<Entity>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InstanceSlot<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            cached: Cell::new(None),
            _marker: PhantomData,
        }
    }

    /// The cached object, if any. Never creates one.
    #[inline]
    pub fn get(&self) -> Option<Entity> {
        self.cached.get()
    }

    /// Store `entity` as the cached object.
    ///
    /// Replacing a different live object is not guarded here; the attach guard only calls this
    /// on an empty slot.
    #[inline]
    pub fn set(&self, entity: Entity) {
        self.cached.set(Some(entity));
    }

    #[inline]
    pub fn clear(&self) {
        self.cached.set(None);
    }

    /// Whether an object is cached. Never triggers acquisition.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.get().is_some()
    }
}

impl<T> Default for InstanceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InstanceSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceSlot")
            .field("type", &any::type_name::<T>())
            .field("cached", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn slot_lifecycle() {
        // Given
        let slot = InstanceSlot::<Marker>::new();

        // Then - Empty
        assert!(!slot.is_initialized());
        assert_eq!(slot.get(), None);

        // When - Registered
        let entity = Entity::new(3u32);
        slot.set(entity);

        // Then
        assert!(slot.is_initialized());
        assert_eq!(slot.get(), Some(entity));

        // When - Torn down
        slot.clear();

        // Then
        assert!(!slot.is_initialized());
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn slot_debug_names_type() {
        let slot = InstanceSlot::<Marker>::default();
        let debug = format!("{slot:?}");
        assert!(debug.contains("Marker"));
        assert!(debug.contains("None"));
    }
}
