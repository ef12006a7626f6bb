//! Walks a game manager and an audio service through a scene change.
//!
//! This example shows:
//! - A lazily created singleton that survives scene unloads
//! - A template-backed singleton that is torn down with its scene
//! - The duplicate guard rejecting a second manager
//! - Draining the accessor's notices through a channel logger

use log::Level;
use rusty_singleton::{
    core::log::ChannelLogger,
    scene::{Resources, Scene, Template},
    singleton::{Component, Host, SingletonFreeAlive, SingletonResource},
};

// ============================================================================
// Components
// ============================================================================

#[derive(Debug, Default)]
struct GameManager {
    level: u32,
    started: bool,
}

impl Component for GameManager {
    const NAME: &'static str = "GameManager";

    fn on_init(&mut self) {
        self.started = true;
    }
}

#[derive(Component, Debug)]
struct AudioService {
    volume: f32,
}

fn main() {
    let (logger, notices) = ChannelLogger::with_receiver();
    logger
        .with_level(Level::Debug)
        .install()
        .expect("no other logger installed");

    let resources = Resources::new();
    resources.insert(
        "Prefabs/AudioService/AudioService",
        Template::new("AudioService").with(|| AudioService { volume: 0.8 }),
    );

    let mut scene = Scene::with_resources("Level1", resources);
    let manager = SingletonFreeAlive::<GameManager>::default();
    let audio = SingletonResource::<AudioService>::default();
    manager.bind(&mut scene);
    audio.bind(&mut scene);

    println!("manager initialized before access: {}", manager.initialized());

    let manager_entity = manager.instance(&mut scene).expect("created on demand");
    if let Some(state) = manager.get_mut(&mut scene) {
        state.level = 1;
    }
    let audio_entity = audio.instance(&mut scene).expect("template is registered");
    println!(
        "manager {manager_entity} started={}, audio {audio_entity} volume={}",
        manager.get(&scene).map(|m| m.started).unwrap_or_default(),
        audio.get(&scene).map(|a| a.volume).unwrap_or_default(),
    );

    // A level script places its own manager; the guard removes it.
    let rogue = scene.spawn("RogueManager");
    scene.attach(rogue, GameManager::default());
    println!("rogue manager alive: {}", scene.is_alive(rogue));

    let removed = scene.unload();
    println!(
        "unloaded {removed} objects; manager alive: {}, audio initialized: {}",
        scene.is_alive(manager_entity),
        audio.initialized(),
    );

    println!("--- notices ---");
    for notice in notices.try_iter() {
        println!("{:<5} {}", notice.level, notice.message);
    }
}
