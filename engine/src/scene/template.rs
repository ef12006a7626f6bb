//! Object templates and the resource library that serves them by path.
//!
//! A [`Template`] is a recipe for an object: a name plus one factory per component. A scene
//! instantiates a template by running every factory and attaching the results to a fresh object.
//!
//! [`Resources`] is the path-keyed template library. It is cheap to clone and safe to share
//! across threads, so asset loaders can populate it while the scene keeps running on the main
//! thread.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use dashmap::DashMap;

use crate::singleton::Component;

type Factory = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Builds one component of a template.
#[derive(Clone)]
pub(crate) struct ComponentFactory {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    build: Factory,
}

impl ComponentFactory {
    pub(crate) fn build(&self) -> Box<dyn Any> {
        (self.build)()
    }
}

/// A recipe for instantiating an object with a fixed set of components.
#[derive(Clone)]
pub struct Template {
    name: Arc<str>,
    components: Vec<ComponentFactory>,
}

impl Template {
    /// Create an empty template. Instances are named after it.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Add a component built by `factory` on every instantiation.
    ///
    /// A later factory for the same component type replaces the earlier one.
    pub fn with<C, F>(mut self, factory: F) -> Self
    where
        C: Component,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<C>();
        self.components.retain(|c| c.type_id != type_id);
        self.components.push(ComponentFactory {
            type_id,
            type_name: C::NAME,
            build: Arc::new(move || Box::new(factory()) as Box<dyn Any>),
        });
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether instances of this template carry component `C`.
    pub fn has<C: Component>(&self) -> bool {
        let type_id = TypeId::of::<C>();
        self.components.iter().any(|c| c.type_id == type_id)
    }

    pub(crate) fn components(&self) -> &[ComponentFactory] {
        &self.components
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field(
                "components",
                &self.components.iter().map(|c| c.type_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A shared library of templates keyed by resource path (e.g. `Prefabs/Audio/Audio`).
#[derive(Clone, Default)]
pub struct Resources {
    templates: Arc<DashMap<String, Template>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `template` at `path`, returning the template it replaced.
    pub fn insert(&self, path: impl Into<String>, template: Template) -> Option<Template> {
        self.templates.insert(path.into(), template)
    }

    /// Look up the template stored at `path`.
    pub fn load(&self, path: &str) -> Option<Template> {
        self.templates.get(path).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, path: &str) -> Option<Template> {
        self.templates.remove(path).map(|(_, template)| template)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("templates", &self.templates.len())
            .finish()
    }
}
