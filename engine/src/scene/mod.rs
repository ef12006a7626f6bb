//! A single-threaded scene: the object graph singleton accessors resolve against.
//!
//! A [`Scene`] owns a flat set of root objects. Each object has a name and at most one component
//! of each type. Objects are created empty with [`Scene::spawn`] and filled with
//! [`Scene::attach`], or created fully formed from a [`Template`] with [`Scene::instantiate`].
//!
//! # Lifecycle hooks
//!
//! Hooks are registered per component type. Attach hooks for `T` fire right after a `T` becomes
//! live on an object; teardown hooks for `T` fire when an object carrying `T` is destroyed, while
//! the object is still reachable. Hooks for one type fire in registration order, and an object
//! destroyed by an earlier attach hook gets no further attach hooks.
//!
//! Hooks for a type are detached from the scene while they run, so a hook that makes another
//! object of the same type live will not see its own hooks fire for that object.
//!
//! # Scene transitions
//!
//! [`Scene::unload`] destroys every object that has not been marked persistent, the way a scene
//! change tears down everything except objects exempted with
//! [`mark_persistent`](Host::mark_persistent).
//!
//! # Example
//!
//! ```rust,ignore
//! let mut scene = Scene::new("Main");
//! let camera = scene.spawn("Camera");
//! scene.attach(camera, Lens { fov: 60.0 });
//!
//! scene.mark_persistent(camera);
//! scene.unload(); // camera survives
//! ```

mod entity;
mod template;

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    marker::PhantomData,
};

use fixedbitset::FixedBitSet;
use log::debug;

pub use entity::{Allocator, Entity, Generation, Id};
pub use template::{Resources, Template};

use crate::singleton::{Component, Hook, Host};

/// A live object in the scene.
struct Object {
    entity: Entity,
    name: String,
    /// Components in attach order.
    components: Vec<(TypeId, Box<dyn Any>)>,
    /// Set while teardown hooks run, so re-entrant destroys are ignored.
    destroying: bool,
}

impl Object {
    fn get<T: 'static>(&self) -> Option<&T> {
        let type_id = TypeId::of::<T>();
        self.components
            .iter()
            .find(|(id, _)| *id == type_id)
            .and_then(|(_, value)| value.downcast_ref())
    }

    fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let type_id = TypeId::of::<T>();
        self.components
            .iter_mut()
            .find(|(id, _)| *id == type_id)
            .and_then(|(_, value)| value.downcast_mut())
    }

    fn has(&self, type_id: TypeId) -> bool {
        self.components.iter().any(|(id, _)| *id == type_id)
    }
}

/// A scene of named objects carrying components.
pub struct Scene {
    name: String,

    /// Entity id allocation and reuse.
    allocator: Allocator,

    /// Live objects, indexed by entity index.
    objects: Vec<Option<Object>>,

    /// Objects exempt from [`Scene::unload`], indexed by entity index.
    persistent: FixedBitSet,

    /// The template library `load_template` reads from.
    resources: Resources,

    attach_hooks: HashMap<TypeId, Vec<Hook<Scene>>>,
    teardown_hooks: HashMap<TypeId, Vec<Hook<Scene>>>,

    /// Marker to make Scene !Send. Scene must stay on the main thread.
    _not_send: PhantomData<*mut ()>,
}

impl Scene {
    /// Create an empty scene with its own, empty template library.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_resources(name, Resources::default())
    }

    /// Create an empty scene reading templates from a shared library.
    pub fn with_resources(name: impl Into<String>, resources: Resources) -> Self {
        Self {
            name: name.into(),
            allocator: Allocator::new(),
            objects: Vec::new(),
            persistent: FixedBitSet::new(),
            resources,
            attach_hooks: HashMap::new(),
            teardown_hooks: HashMap::new(),
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Spawn an empty object. No hooks fire until components are attached.
    pub fn spawn(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.allocator.alloc();
        let index = entity.index();
        if index >= self.objects.len() {
            self.objects.resize_with(index + 1, || None);
        }
        self.objects[index] = Some(Object {
            entity,
            name: name.into(),
            components: Vec::new(),
            destroying: false,
        });
        entity
    }

    /// The name of a live object.
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        self.object(entity).map(|object| object.name.as_str())
    }

    /// Whether a live object is exempt from [`Scene::unload`].
    pub fn is_persistent(&self, entity: Entity) -> bool {
        self.object(entity).is_some() && self.persistent.contains(entity.index())
    }

    /// Live objects in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.objects
            .iter()
            .flatten()
            .filter(|object| !object.destroying)
            .map(|object| object.entity)
    }

    /// The number of live objects.
    pub fn len(&self) -> usize {
        self.entities().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroy every object not marked persistent, firing teardown hooks.
    ///
    /// Returns the number of objects removed.
    pub fn unload(&mut self) -> usize {
        let doomed: Vec<Entity> = self
            .entities()
            .filter(|entity| !self.persistent.contains(entity.index()))
            .collect();

        let mut removed = 0;
        for entity in doomed {
            // Earlier teardown hooks may already have destroyed it.
            if self.is_alive(entity) {
                self.destroy(entity);
                removed += 1;
            }
        }
        debug!("unloaded scene {}: {} objects removed", self.name, removed);
        removed
    }

    fn object(&self, entity: Entity) -> Option<&Object> {
        self.objects
            .get(entity.index())
            .and_then(Option::as_ref)
            .filter(|object| object.entity == entity)
    }

    fn object_mut(&mut self, entity: Entity) -> Option<&mut Object> {
        self.objects
            .get_mut(entity.index())
            .and_then(Option::as_mut)
            .filter(|object| object.entity == entity)
    }

    fn fire_attach(&mut self, type_id: TypeId, entity: Entity) {
        let Some(mut hooks) = self.attach_hooks.remove(&type_id) else {
            return;
        };
        for hook in hooks.iter_mut() {
            if !self.is_alive(entity) {
                break;
            }
            hook(self, entity);
        }
        Self::restore(&mut self.attach_hooks, type_id, hooks);
    }

    fn fire_teardown(&mut self, type_id: TypeId, entity: Entity) {
        let Some(mut hooks) = self.teardown_hooks.remove(&type_id) else {
            return;
        };
        for hook in hooks.iter_mut() {
            hook(self, entity);
        }
        Self::restore(&mut self.teardown_hooks, type_id, hooks);
    }

    /// Put fired hooks back, ahead of any registered while they ran.
    fn restore(
        map: &mut HashMap<TypeId, Vec<Hook<Scene>>>,
        type_id: TypeId,
        mut hooks: Vec<Hook<Scene>>,
    ) {
        if let Some(added) = map.remove(&type_id) {
            hooks.extend(added);
        }
        map.insert(type_id, hooks);
    }
}

impl Host for Scene {
    type Template = Template;

    fn find_first<T: Component>(&self) -> Option<Entity> {
        let type_id = TypeId::of::<T>();
        self.objects
            .iter()
            .flatten()
            .find(|object| !object.destroying && object.has(type_id))
            .map(|object| object.entity)
    }

    fn find_all<T: Component>(&self) -> Vec<Entity> {
        let type_id = TypeId::of::<T>();
        self.objects
            .iter()
            .flatten()
            .filter(|object| !object.destroying && object.has(type_id))
            .map(|object| object.entity)
            .collect()
    }

    fn create_root(&mut self, name: &str) -> Entity {
        self.spawn(name)
    }

    fn attach<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        let type_id = TypeId::of::<T>();
        let Some(object) = self.object_mut(entity) else {
            return false;
        };
        if object.destroying || object.has(type_id) {
            return false;
        }
        object.components.push((type_id, Box::new(component)));
        self.fire_attach(type_id, entity);
        true
    }

    fn load_template(&self, path: &str) -> Option<Template> {
        self.resources.load(path)
    }

    fn instantiate(&mut self, template: &Template) -> Entity {
        let entity = self.spawn(template.name());
        let components: Vec<(TypeId, Box<dyn Any>)> = template
            .components()
            .iter()
            .map(|factory| (factory.type_id, factory.build()))
            .collect();
        let type_ids: Vec<TypeId> = components.iter().map(|(id, _)| *id).collect();
        if let Some(object) = self.object_mut(entity) {
            object.components = components;
        }

        // The whole object is built before any hook sees it.
        for type_id in type_ids {
            if !self.is_alive(entity) {
                break;
            }
            self.fire_attach(type_id, entity);
        }
        entity
    }

    fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.object(entity)?.get()
    }

    fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.object_mut(entity)?.get_mut()
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.object(entity).is_some_and(|object| !object.destroying)
    }

    fn mark_persistent(&mut self, entity: Entity) {
        let Some(object) = self.object(entity) else {
            return;
        };
        debug!("{} ({}) marked persistent", object.name, entity);
        let index = entity.index();
        if index >= self.persistent.len() {
            self.persistent.grow(index + 1);
        }
        self.persistent.insert(index);
    }

    fn destroy(&mut self, entity: Entity) {
        let type_ids: Vec<TypeId> = match self.object_mut(entity) {
            Some(object) if !object.destroying => {
                object.destroying = true;
                object.components.iter().map(|(id, _)| *id).collect()
            }
            _ => return,
        };

        for type_id in type_ids {
            self.fire_teardown(type_id, entity);
        }

        self.objects[entity.index()] = None;
        if entity.index() < self.persistent.len() {
            self.persistent.set(entity.index(), false);
        }
        self.allocator.free(entity);
    }

    fn on_attach<T: Component>(&mut self, hook: Hook<Self>) {
        self.attach_hooks
            .entry(TypeId::of::<T>())
            .or_default()
            .push(hook);
    }

    fn on_teardown<T: Component>(&mut self, hook: Hook<Self>) {
        self.teardown_hooks
            .entry(TypeId::of::<T>())
            .or_default()
            .push(hook);
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("objects", &self.len())
            .field("persistent", &self.persistent.count_ones(..))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rusty_singleton_macros::Component;

    use super::*;

    #[derive(Component, Default, Debug, PartialEq)]
    struct Health(u32);

    #[derive(Component, Default, Debug, PartialEq)]
    struct Armor(u32);

    #[test]
    fn spawn_attach_and_get() {
        // Given
        let mut scene = Scene::new("Test");
        let entity = scene.spawn("Player");

        // When
        let attached = scene.attach(entity, Health(10));
        let again = scene.attach(entity, Health(20));

        // Then
        assert!(attached);
        assert!(!again);
        assert_eq!(scene.get::<Health>(entity), Some(&Health(10)));
        assert!(scene.has::<Health>(entity));
        assert!(!scene.has::<Armor>(entity));
        assert_eq!(scene.name_of(entity), Some("Player"));
        assert_eq!(scene.len(), 1);

        // When
        scene.get_mut::<Health>(entity).unwrap().0 = 5;

        // Then
        assert_eq!(scene.get::<Health>(entity), Some(&Health(5)));
    }

    #[test]
    fn find_first_uses_index_order() {
        // Given
        let mut scene = Scene::new("Test");
        let empty = scene.spawn("Empty");
        let first = scene.spawn("First");
        let second = scene.spawn("Second");
        scene.attach(second, Health(2));
        scene.attach(first, Health(1));

        // Then
        assert_eq!(scene.find_first::<Health>(), Some(first));
        assert_eq!(scene.find_all::<Health>(), vec![first, second]);
        assert_eq!(scene.find_first::<Armor>(), None);
        assert!(scene.find_all::<Armor>().is_empty());

        // When
        scene.destroy(first);

        // Then
        assert_eq!(scene.find_first::<Health>(), Some(second));
        assert_eq!(scene.find_all::<Health>(), vec![second]);
        assert!(scene.is_alive(empty));
    }

    #[test]
    fn destroyed_handles_go_stale() {
        // Given
        let mut scene = Scene::new("Test");
        let entity = scene.spawn("Temp");
        scene.attach(entity, Health(1));

        // When
        scene.destroy(entity);
        let reused = scene.spawn("Reused");

        // Then - Same slot, new generation; the old handle sees nothing
        assert_eq!(reused.id(), entity.id());
        assert!(!scene.is_alive(entity));
        assert!(scene.is_alive(reused));
        assert_eq!(scene.get::<Health>(entity), None);
        assert!(!scene.attach(entity, Armor(1)));
    }

    #[test]
    fn attach_hooks_fire_per_type() {
        // Given
        let mut scene = Scene::new("Test");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        scene.on_attach::<Health>(Box::new(move |scene: &mut Scene, entity: Entity| {
            log.borrow_mut()
                .push((entity, scene.get::<Health>(entity).map(|h| h.0)));
        }));

        // When
        let entity = scene.spawn("Player");
        scene.attach(entity, Armor(3));
        scene.attach(entity, Health(7));

        // Then - Only the Health attach fired, and the component was readable
        assert_eq!(*seen.borrow(), vec![(entity, Some(7))]);
    }

    #[test]
    fn attach_hook_can_destroy_and_stop_later_hooks() {
        // Given
        let mut scene = Scene::new("Test");
        let calls = Rc::new(RefCell::new(0));
        scene.on_attach::<Health>(Box::new(|scene: &mut Scene, entity: Entity| {
            scene.destroy(entity);
        }));
        let counter = Rc::clone(&calls);
        scene.on_attach::<Health>(Box::new(move |_: &mut Scene, _: Entity| {
            *counter.borrow_mut() += 1;
        }));

        // When
        let entity = scene.spawn("Doomed");
        scene.attach(entity, Health(1));

        // Then
        assert!(!scene.is_alive(entity));
        assert_eq!(*calls.borrow(), 0);
        assert!(scene.is_empty());
    }

    #[test]
    fn teardown_hooks_see_the_object() {
        // Given
        let mut scene = Scene::new("Test");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        scene.on_teardown::<Health>(Box::new(move |scene: &mut Scene, entity: Entity| {
            // Re-entrant destroy is ignored
            scene.destroy(entity);
            log.borrow_mut().push(scene.get::<Health>(entity).map(|h| h.0));
        }));
        let entity = scene.spawn("Player");
        scene.attach(entity, Health(4));

        // When
        scene.destroy(entity);
        scene.destroy(entity);

        // Then
        assert_eq!(*seen.borrow(), vec![Some(4)]);
        assert!(!scene.is_alive(entity));
    }

    #[test]
    fn unload_keeps_persistent_objects() {
        // Given
        let mut scene = Scene::new("Level1");
        let keep = scene.spawn("Keep");
        let drop_a = scene.spawn("DropA");
        let drop_b = scene.spawn("DropB");
        scene.attach(drop_b, Health(1));
        scene.mark_persistent(keep);

        // When
        let removed = scene.unload();

        // Then
        assert_eq!(removed, 2);
        assert!(scene.is_alive(keep));
        assert!(scene.is_persistent(keep));
        assert!(!scene.is_alive(drop_a));
        assert!(!scene.is_alive(drop_b));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn persistence_does_not_leak_to_reused_slot() {
        // Given
        let mut scene = Scene::new("Test");
        let entity = scene.spawn("Keep");
        scene.mark_persistent(entity);

        // When
        scene.destroy(entity);
        let reused = scene.spawn("Fresh");

        // Then
        assert_eq!(reused.index(), entity.index());
        assert!(!scene.is_persistent(reused));
        assert_eq!(scene.unload(), 1);
    }

    #[test]
    fn instantiate_builds_before_hooks_fire() {
        // Given
        let resources = Resources::new();
        resources.insert(
            "Prefabs/Player/Player",
            Template::new("Player")
                .with(|| Health(100))
                .with(|| Armor(5)),
        );
        let mut scene = Scene::with_resources("Test", resources.clone());
        assert!(scene.resources().contains("Prefabs/Player/Player"));
        let seen = Rc::new(RefCell::new(None));
        let log = Rc::clone(&seen);
        scene.on_attach::<Health>(Box::new(move |scene: &mut Scene, entity: Entity| {
            *log.borrow_mut() = scene.get::<Armor>(entity).map(|a| a.0);
        }));

        // When
        let template = scene.load_template("Prefabs/Player/Player").unwrap();
        let entity = scene.instantiate(&template);

        // Then - Armor was already present when the Health hook ran
        assert_eq!(*seen.borrow(), Some(5));
        assert_eq!(scene.name_of(entity), Some("Player"));
        assert_eq!(scene.get::<Health>(entity), Some(&Health(100)));
        assert!(scene.load_template("Prefabs/Missing/Missing").is_none());
    }
}
