//! How a missing singleton instance is produced.
//!
//! | Strategy | On miss |
//! |----------|---------|
//! | [`SceneLookup`] | Report a lookup failure |
//! | [`SceneLookupOrCreate`] | Create a root object carrying `T::default()` |
//! | [`ResourceInstantiate`] | Instantiate the template at `Prefabs/<Name>/<Name>` |

use std::borrow::Cow;

use log::info;

use crate::scene::Entity;

use super::{AcquireError, Component, Host};

/// Produces a candidate object carrying `T` when the slot is empty.
///
/// Any object made live by the strategy goes through the host's attach hooks before
/// [`acquire`](Acquire::acquire) returns.
pub trait Acquire<T: Component> {
    fn acquire<H: Host>(&self, host: &mut H) -> Result<Entity, AcquireError>;
}

/// Use the first live object carrying `T`; never create one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneLookup;

impl<T: Component> Acquire<T> for SceneLookup {
    fn acquire<H: Host>(&self, host: &mut H) -> Result<Entity, AcquireError> {
        host.find_first::<T>()
            .ok_or(AcquireError::LookupFailure { type_name: T::NAME })
    }
}

/// Use the first live object carrying `T`, or create a root object with a default `T`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneLookupOrCreate;

impl<T: Component + Default> Acquire<T> for SceneLookupOrCreate {
    fn acquire<H: Host>(&self, host: &mut H) -> Result<Entity, AcquireError> {
        if let Some(entity) = host.find_first::<T>() {
            return Ok(entity);
        }

        let entity = host.create_root(T::NAME);
        if !host.attach(entity, T::default()) {
            return Err(AcquireError::LookupFailure { type_name: T::NAME });
        }
        info!("no {} in scene, created {}", T::NAME, entity);
        Ok(entity)
    }
}

/// Instantiate the template stored at `<root>/<Name>/<Name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInstantiate {
    root: Cow<'static, str>,
}

impl ResourceInstantiate {
    /// The root folder templates are looked up under unless configured otherwise.
    pub const DEFAULT_ROOT: &'static str = "Prefabs";

    pub const fn new() -> Self {
        Self {
            root: Cow::Borrowed(Self::DEFAULT_ROOT),
        }
    }

    /// Look templates up under `root` instead of `Prefabs`. Trailing slashes are ignored.
    pub fn with_root(root: impl Into<Cow<'static, str>>) -> Self {
        let mut root = root.into();
        if root.ends_with('/') {
            root = Cow::Owned(root.trim_end_matches('/').to_string());
        }
        Self { root }
    }

    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The template path for `T`.
    pub fn path_for<T: Component>(&self) -> String {
        format!("{}/{}/{}", self.root, T::NAME, T::NAME)
    }
}

impl Default for ResourceInstantiate {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> Acquire<T> for ResourceInstantiate {
    fn acquire<H: Host>(&self, host: &mut H) -> Result<Entity, AcquireError> {
        let path = self.path_for::<T>();
        let Some(template) = host.load_template(&path) else {
            return Err(AcquireError::TemplateMissing { path });
        };

        let entity = host.instantiate(&template);
        if !host.has::<T>(entity) {
            // The instantiated copy is left in the scene.
            return Err(AcquireError::MissingComponent {
                path,
                type_name: T::NAME,
            });
        }
        Ok(entity)
    }
}
