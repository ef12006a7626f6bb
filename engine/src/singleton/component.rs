/// A component type that can be resolved as a singleton.
///
/// [`NAME`](Component::NAME) is the short, stable name of the type. It names objects synthesized
/// by [`SceneLookupOrCreate`](super::SceneLookupOrCreate) and forms the template path used by
/// [`ResourceInstantiate`](super::ResourceInstantiate) (`Prefabs/<NAME>/<NAME>`).
///
/// # Derive Macro
///
/// Use `#[derive(Component)]` to implement this trait with `NAME` set to the type identifier:
///
/// ```rust,ignore
/// #[derive(Component, Default)]
/// struct AudioManager {
///     volume: f32,
/// }
///
/// assert_eq!(AudioManager::NAME, "AudioManager");
/// ```
///
/// Implement it by hand to run custom initialization once an object is registered:
///
/// ```rust,ignore
/// struct Score(u32);
///
/// impl Component for Score {
///     const NAME: &'static str = "Score";
///
///     fn on_init(&mut self) {
///         self.0 = 0;
///     }
/// }
/// ```
pub trait Component: 'static {
    /// The name used for synthesized objects and template paths.
    const NAME: &'static str;

    /// Called once on the instance that becomes the registered singleton.
    ///
    /// Duplicates rejected by the attach guard never see this call.
    fn on_init(&mut self) {}
}
