//! Whether a resolved singleton survives scene unloads.

use crate::scene::Entity;

use super::Host;

/// Binds the lifecycle of a candidate object to the scene or to the process.
///
/// [`apply`](Persistence::apply) runs on every candidate as the first step of its attach
/// procedure, before the duplicate guard decides whether to keep it.
pub trait Persistence: Copy + 'static {
    fn apply<H: Host>(&self, host: &mut H, entity: Entity);

    /// Whether objects resolved under this policy outlive their scene.
    fn is_persistent(&self) -> bool;
}

/// The object follows normal scene teardown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneScoped;

impl Persistence for SceneScoped {
    #[inline]
    fn apply<H: Host>(&self, _host: &mut H, _entity: Entity) {}

    #[inline]
    fn is_persistent(&self) -> bool {
        false
    }
}

/// The object is exempted from scene-unload teardown as soon as it attaches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrossScenePersistent;

impl Persistence for CrossScenePersistent {
    #[inline]
    fn apply<H: Host>(&self, host: &mut H, entity: Entity) {
        host.mark_persistent(entity);
    }

    #[inline]
    fn is_persistent(&self) -> bool {
        true
    }
}
