use std::{cell::Cell, fmt, rc::Rc};

use log::{debug, error, warn};

use crate::scene::Entity;

use super::{Acquire, AcquireError, Component, Host, InstanceSlot, Persistence};

/// Lazily resolves the single shared instance of component `T`.
///
/// An accessor composes an acquisition strategy `S` (how a missing instance is produced) with a
/// persistence policy `P` (whether it survives scene unloads) over an [`InstanceSlot`]. The slot
/// is shared with the lifecycle hooks installed by [`bind`](SingletonAccessor::bind), which keep
/// it in sync with the host:
///
/// - the attach hook registers the first object carrying `T` and destroys any later duplicate;
/// - the teardown hook empties the slot when the registered object goes away.
///
/// ```rust,ignore
/// let audio = SingletonFreeAlive::<AudioManager>::default();
/// audio.bind(&mut scene);
///
/// assert!(!audio.initialized());
/// let entity = audio.instance(&mut scene).unwrap(); // created on first access
/// assert_eq!(audio.instance(&mut scene), Some(entity));
/// ```
pub struct SingletonAccessor<T, S, P> {
    slot: Rc<InstanceSlot<T>>,
    strategy: S,
    persistence: P,
    bound: Cell<bool>,
}

impl<T, S, P> SingletonAccessor<T, S, P>
where
    T: Component,
    S: Acquire<T>,
    P: Persistence,
{
    pub fn new(strategy: S, persistence: P) -> Self {
        Self {
            slot: Rc::new(InstanceSlot::new()),
            strategy,
            persistence,
            bound: Cell::new(false),
        }
    }

    /// Install the attach and teardown hooks for `T` on `host`.
    ///
    /// Objects carrying `T` that became live before binding never saw these hooks. The next
    /// [`instance`](SingletonAccessor::instance) call runs the attach procedure on them instead.
    /// Binding again is a no-op.
    pub fn bind<H: Host>(&self, host: &mut H) {
        if self.bound.replace(true) {
            debug!("{} accessor already bound", T::NAME);
            return;
        }

        let slot = Rc::clone(&self.slot);
        let persistence = self.persistence;
        host.on_attach::<T>(Box::new(move |host: &mut H, entity: Entity| {
            attach(&slot, persistence, host, entity)
        }));

        let slot = Rc::clone(&self.slot);
        host.on_teardown::<T>(Box::new(move |_: &mut H, entity: Entity| {
            teardown(&slot, entity)
        }));
    }

    /// The registered instance, acquiring one if the slot is empty.
    ///
    /// Acquisition failures are logged as errors and return `None`; the next call retries.
    pub fn instance<H: Host>(&self, host: &mut H) -> Option<Entity> {
        match self.try_instance(host) {
            Ok(entity) => Some(entity),
            Err(err) => {
                error!("{err}");
                None
            }
        }
    }

    /// Like [`instance`](SingletonAccessor::instance), but returns the failure instead of
    /// logging it.
    pub fn try_instance<H: Host>(&self, host: &mut H) -> Result<Entity, AcquireError> {
        if let Some(entity) = self.live(host) {
            return Ok(entity);
        }

        let candidate = self.strategy.acquire(host)?;

        // No attach hook ran for the candidate (unbound, or live before binding).
        if self.slot.get().is_none() {
            attach(&self.slot, self.persistence, host, candidate);
        }
        let registered = self.slot.get().unwrap_or(candidate);

        // Other objects that missed their hook are still live duplicates.
        for entity in host.find_all::<T>() {
            if entity != registered && host.is_alive(entity) {
                attach(&self.slot, self.persistence, host, entity);
            }
        }
        Ok(registered)
    }

    /// Whether an instance is registered. Never triggers acquisition.
    #[inline]
    pub fn initialized(&self) -> bool {
        self.slot.is_initialized()
    }

    /// The registered component, without acquiring one.
    pub fn get<'h, H: Host>(&self, host: &'h H) -> Option<&'h T> {
        host.get::<T>(self.slot.get()?)
    }

    /// The registered component for writing, without acquiring one.
    pub fn get_mut<'h, H: Host>(&self, host: &'h mut H) -> Option<&'h mut T> {
        host.get_mut::<T>(self.slot.get()?)
    }

    #[inline]
    pub fn slot(&self) -> &InstanceSlot<T> {
        &self.slot
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    pub fn persistence(&self) -> P {
        self.persistence
    }

    /// The cached object if it is still alive. A stale entry is dropped.
    fn live<H: Host>(&self, host: &H) -> Option<Entity> {
        let entity = self.slot.get()?;
        if host.is_alive(entity) {
            return Some(entity);
        }
        debug!("{} slot held destroyed {}, releasing", T::NAME, entity);
        self.slot.clear();
        None
    }
}

impl<T, S, P> Default for SingletonAccessor<T, S, P>
where
    T: Component,
    S: Acquire<T> + Default,
    P: Persistence + Default,
{
    fn default() -> Self {
        Self::new(S::default(), P::default())
    }
}

impl<T, S: fmt::Debug, P: fmt::Debug> fmt::Debug for SingletonAccessor<T, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonAccessor")
            .field("slot", &self.slot)
            .field("strategy", &self.strategy)
            .field("persistence", &self.persistence)
            .field("bound", &self.bound.get())
            .finish()
    }
}

/// Run the attach procedure for a candidate object.
///
/// Persistence is applied first, unconditionally. Then the first candidate is registered and
/// initialized, and any other candidate is destroyed while a live instance is registered.
fn attach<T, H, P>(slot: &InstanceSlot<T>, persistence: P, host: &mut H, entity: Entity)
where
    T: Component,
    H: Host,
    P: Persistence,
{
    persistence.apply(host, entity);

    let current = slot
        .get()
        .filter(|current| *current == entity || host.is_alive(*current));
    match current {
        Some(current) if current == entity => {}
        Some(current) => {
            warn!(
                "{} initialized multiple times: keeping {}, destroying {}",
                T::NAME,
                current,
                entity
            );
            host.destroy(entity);
        }
        None => {
            slot.set(entity);
            debug!(
                "{} registered as {} (persistent: {})",
                entity,
                T::NAME,
                persistence.is_persistent()
            );
            if let Some(component) = host.get_mut::<T>(entity) {
                component.on_init();
            }
        }
    }
}

/// Release the slot if the object being torn down is the registered one.
fn teardown<T: Component>(slot: &InstanceSlot<T>, entity: Entity) {
    if slot.get() == Some(entity) {
        slot.clear();
        debug!("{} released by {}", T::NAME, entity);
    }
}
