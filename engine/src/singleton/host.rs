//! The capability interface singleton accessors need from a host object model.
//!
//! Accessors never walk a scene graph, build objects, or load resources themselves. Everything
//! goes through [`Host`], and the host drives the attach/teardown lifecycle by calling the hooks
//! an accessor registers with [`Host::on_attach`] and [`Host::on_teardown`].

use crate::scene::Entity;

use super::Component;

/// A lifecycle callback registered with a host.
///
/// Receives the host itself so the callback can mark or destroy the object it was called for.
pub type Hook<H> = Box<dyn FnMut(&mut H, Entity)>;

/// A host object graph: the scene, its objects, and their components.
///
/// # Lifecycle contract
///
/// - Attach hooks registered for `T` fire once per object, right after component `T` becomes
///   live on it ([`attach`](Host::attach) or [`instantiate`](Host::instantiate)), and before the
///   call that made it live returns.
/// - Teardown hooks registered for `T` fire once per object carrying `T` when it is destroyed,
///   while the object and its components are still reachable.
pub trait Host: Sized {
    /// A loaded template resource.
    type Template;

    /// Find the first live object carrying component `T`.
    ///
    /// The order is whatever stable enumeration order the host provides.
    fn find_first<T: Component>(&self) -> Option<Entity>;

    /// Every live object carrying component `T`, in the same order as
    /// [`find_first`](Host::find_first).
    fn find_all<T: Component>(&self) -> Vec<Entity>;

    /// Create an empty object at the root of the graph.
    fn create_root(&mut self, name: &str) -> Entity;

    /// Attach `component` to a live object, firing attach hooks for `T`.
    ///
    /// Returns `false` if the object is not alive or already carries a `T`.
    fn attach<T: Component>(&mut self, entity: Entity, component: T) -> bool;

    /// Load the template resource at `path`.
    fn load_template(&self, path: &str) -> Option<Self::Template>;

    /// Instantiate a live copy of `template`, firing attach hooks for each of its components.
    fn instantiate(&mut self, template: &Self::Template) -> Entity;

    fn get<T: Component>(&self, entity: Entity) -> Option<&T>;

    fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T>;

    fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    fn is_alive(&self, entity: Entity) -> bool;

    /// Exempt an object from scene-unload teardown.
    fn mark_persistent(&mut self, entity: Entity);

    /// Remove an object from the graph, firing teardown hooks for its components.
    fn destroy(&mut self, entity: Entity);

    fn on_attach<T: Component>(&mut self, hook: Hook<Self>);

    fn on_teardown<T: Component>(&mut self, hook: Hook<Self>);
}
