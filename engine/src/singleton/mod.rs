//! Lazy single-instance resolution for scene components.
//!
//! A singleton accessor caches the one object carrying component `T` that the rest of the game
//! talks to. On first access it resolves that object with an acquisition strategy, and the
//! lifecycle hooks it installs on the host keep the cache honest afterwards.
//!
//! # Variants
//!
//! | Alias | Strategy | Persistence |
//! |-------|----------|-------------|
//! | [`Singleton`] | [`SceneLookup`] | [`SceneScoped`] |
//! | [`SingletonAlive`] | [`SceneLookup`] | [`CrossScenePersistent`] |
//! | [`SingletonFree`] | [`SceneLookupOrCreate`] | [`SceneScoped`] |
//! | [`SingletonFreeAlive`] | [`SceneLookupOrCreate`] | [`CrossScenePersistent`] |
//! | [`SingletonResource`] | [`ResourceInstantiate`] | [`SceneScoped`] |
//! | [`SingletonResourceAlive`] | [`ResourceInstantiate`] | [`CrossScenePersistent`] |
//!
//! # Slot lifecycle
//!
//! ```text
//! Empty --attach--> Registered --teardown--> Empty --attach--> Registered ...
//! ```
//!
//! There is no error state. A failed acquisition leaves the slot empty and is retried on the
//! next access, so callers must check the result of
//! [`instance`](SingletonAccessor::instance) before using it.
//!
//! # Example
//!
//! ```rust,ignore
//! use rusty_singleton::{scene::Scene, singleton::{Component, Host, SingletonFree}};
//!
//! #[derive(Component, Default)]
//! struct Score(u32);
//!
//! let mut scene = Scene::new("Main");
//! let score = SingletonFree::<Score>::default();
//! score.bind(&mut scene);
//!
//! if let Some(entity) = score.instance(&mut scene) {
//!     scene.get_mut::<Score>(entity).unwrap().0 += 10;
//! }
//! ```

mod accessor;
mod component;
mod error;
mod host;
mod persistence;
mod slot;
mod strategy;

pub use accessor::SingletonAccessor;
pub use component::Component;
pub use error::AcquireError;
pub use host::{Hook, Host};
pub use persistence::{CrossScenePersistent, Persistence, SceneScoped};
pub use rusty_singleton_macros::Component;
pub use slot::InstanceSlot;
pub use strategy::{Acquire, ResourceInstantiate, SceneLookup, SceneLookupOrCreate};

/// Found in the scene; never created.
pub type Singleton<T> = SingletonAccessor<T, SceneLookup, SceneScoped>;

/// Found in the scene; never created; survives scene unloads.
pub type SingletonAlive<T> = SingletonAccessor<T, SceneLookup, CrossScenePersistent>;

/// Found in the scene, or created on a new root object.
pub type SingletonFree<T> = SingletonAccessor<T, SceneLookupOrCreate, SceneScoped>;

/// Found in the scene, or created on a new root object; survives scene unloads.
pub type SingletonFreeAlive<T> = SingletonAccessor<T, SceneLookupOrCreate, CrossScenePersistent>;

/// Instantiated from the template at `Prefabs/<Name>/<Name>`.
pub type SingletonResource<T> = SingletonAccessor<T, ResourceInstantiate, SceneScoped>;

/// Instantiated from the template at `Prefabs/<Name>/<Name>`; survives scene unloads.
pub type SingletonResourceAlive<T> =
    SingletonAccessor<T, ResourceInstantiate, CrossScenePersistent>;
