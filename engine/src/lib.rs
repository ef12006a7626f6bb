//! Singleton access for scene components.
//!
//! - [`singleton`]: accessors that lazily resolve the one shared instance of a component type,
//!   by scene lookup, lazy creation, or template instantiation, optionally persistent across
//!   scene unloads.
//! - [`scene`]: a single-threaded object graph implementing [`singleton::Host`], with template
//!   resources and scene unloading.
//! - [`core`]: log sinks.

// Lets `#[derive(Component)]` name `::rusty_singleton` from inside this crate.
extern crate self as rusty_singleton;

pub mod core;
pub mod scene;
pub mod singleton;
