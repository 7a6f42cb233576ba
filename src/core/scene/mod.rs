//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene lifecycle and stack-based scene switching, and marks the
// scope boundaries at which the event dispatcher drops scene-local
// subscriptions.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<S, Box<dyn Scene>>
//     └─ stack: Vec<S>
//   SceneContext
//     ├─ dispatcher: Arc<EventDispatcher<E>>
//     └─ transitions: TransitionQueue<S>
//
// Flow:
//   update() → collect_active_scenes() → Scene::update()
//   process_transitions() → Load/Clear → EventDispatcher::cleanup()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::dispatcher::{EventDispatcher, EventKey};

//=== Module Declarations =================================================

mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_manager::{SceneKey, SceneManager, SceneTransition};
pub use transition_queue::TransitionQueue;

//=== SceneContext ========================================================

/// Shared data handed to scenes during lifecycle calls.
pub struct SceneContext<S: SceneKey, E: EventKey> {
    /// Dispatcher shared with every scene and system.
    pub dispatcher: Arc<EventDispatcher<E>>,

    /// Queue for requesting scene changes.
    pub transitions: TransitionQueue<S>,
}

impl<S: SceneKey, E: EventKey> SceneContext<S, E> {
    /// Creates a context around a shared dispatcher.
    pub fn new(dispatcher: Arc<EventDispatcher<E>>) -> Self {
        Self {
            dispatcher,
            transitions: TransitionQueue::new(),
        }
    }
}

//=== Scene Trait =========================================================

/// Defines scene behavior with lifecycle hooks and update logic.
///
/// Subscribe scene-local listeners in `on_enter`; they are dropped by the
/// dispatcher cleanup at the next level load unless their event was
/// marked permanent.
///
/// # Minimal Implementation
///
/// ```rust
/// # use aetheric_messenger::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScene { Main }
/// # impl SceneKey for GameScene {}
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameEvent { Tick }
/// # impl EventKey for GameEvent {}
/// struct MyScene;
///
/// impl Scene<GameScene, GameEvent> for MyScene {
///     fn update(&mut self, context: &mut SceneContext<GameScene, GameEvent>) {
///         let _ = context.dispatcher.publish(GameEvent::Tick, ());
///     }
/// }
/// ```
pub trait Scene<S: SceneKey, E: EventKey>: Send {
    /// Called when scene enters the active stack.
    fn on_enter(&mut self, _context: &SceneContext<S, E>) {}

    /// Called when scene exits the active stack.
    fn on_exit(&mut self, _context: &SceneContext<S, E>) {}

    /// Called every tick while scene is active on stack.
    fn update(&mut self, context: &mut SceneContext<S, E>);

    /// Whether scenes below this one should receive updates.
    ///
    /// Transparent scenes (e.g., pause menus) allow underlying scenes
    /// to continue updating. Opaque scenes block updates to lower stack.
    fn is_transparent(&self) -> bool {
        false
    }
}
