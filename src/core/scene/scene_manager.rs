//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, stack operations, and lifecycle.
//
// Scenes are stored in a HashMap by key and referenced via a stack
// of keys. This allows scenes to maintain state between activations.
//
// Load and Clear transitions are scope boundaries: every scene on the
// stack exits and the dispatcher drops non-permanent subscriptions
// before the next scene enters.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext};
use crate::core::dispatcher::EventKey;

//=== Scene Transition ====================================================

/// Encapsulates scene stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Adds a new scene to the top of the stack.
    Push(K),

    /// Removes a specific scene from the stack by key.
    Remove(K),

    /// Replaces a specific scene with another scene.
    Replace(K, K),

    /// Exits every scene, cleans up the dispatcher and enters this scene.
    Load(K),

    /// Exits every scene and cleans up the dispatcher.
    Clear,

    /// No transition occurs.
    Empty,
}

impl<K: SceneKey> Default for SceneTransition<K> {
    fn default() -> Self {
        Self::Empty
    }
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Typically implemented by game-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Manager =======================================================

/// Manages scene lifecycle and stack-based scene switching.
///
/// Scenes are registered once and referenced by key. The scene stack
/// determines which scenes are active, with the topmost scene receiving
/// updates first in priority.
pub struct SceneManager<S: SceneKey, E: EventKey> {
    scenes: HashMap<S, Box<dyn Scene<S, E>>>,
    stack: Vec<S>,
}

impl<S: SceneKey, E: EventKey> SceneManager<S, E> {
    //--- Construction -----------------------------------------------------

    /// Creates a new scene manager with an empty stack.
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            stack: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene with the manager.
    ///
    /// Scenes must be registered before being pushed to the stack.
    ///
    /// ```ignore
    /// manager.register_scene(Level::Menu, MenuScene);
    /// ```
    pub fn register_scene<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S, E> + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Enters the initial scene.
    pub fn start(&mut self, initial: S, context: &SceneContext<S, E>) {
        debug!("Starting scene manager with initial scene: {:?}", initial);
        self.push_internal(initial, context);
    }

    //--- Queries ----------------------------------------------------------

    /// Scene keys on the stack, bottom first.
    pub fn stack(&self) -> &[S] {
        &self.stack
    }

    /// Returns true if `key` is on the stack.
    pub fn is_active(&self, key: S) -> bool {
        self.stack.contains(&key)
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates active scenes.
    ///
    /// Calls update on all transparent scenes and the topmost opaque scene.
    pub fn update(&mut self, context: &mut SceneContext<S, E>) {
        if self.stack.is_empty() {
            return;
        }

        let scenes_to_update = self.collect_active_scenes();
        for key in scenes_to_update {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.update(context);
            }
        }
    }

    //--- Transition Processing --------------------------------------------

    /// Processes all queued scene transitions.
    ///
    /// Should be called at the tick boundary after scene updates.
    /// Transitions are processed in FIFO order. Transitions queued by
    /// lifecycle hooks during processing wait for the next call.
    pub fn process_transitions(&mut self, context: &mut SceneContext<S, E>) {
        let transitions = context.transitions.take();

        for transition in transitions {
            match transition {
                SceneTransition::Push(key) => self.push_internal(key, context),
                SceneTransition::Remove(key) => self.remove_internal(key, context),
                SceneTransition::Replace(old_key, new_key) => {
                    self.replace_internal(old_key, new_key, context)
                }
                SceneTransition::Load(key) => self.load_internal(key, context),
                SceneTransition::Clear => {
                    self.clear_internal(context);
                    context.dispatcher.cleanup();
                }
                SceneTransition::Empty => {}
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn push_internal(&mut self, key: S, context: &SceneContext<S, E>) {
        if self.stack.contains(&key) {
            warn!("Scene {:?} is already in the stack, skipping push", key);
            return;
        }

        let Some(scene) = self.scenes.get_mut(&key) else {
            warn!("Attempted to push unregistered scene {:?}", key);
            return;
        };

        debug!("Pushing scene {:?} onto stack", key);
        self.stack.push(key);
        scene.on_enter(context);
    }

    fn remove_internal(&mut self, key: S, context: &SceneContext<S, E>) {
        let Some(pos) = self.stack.iter().position(|&k| k == key) else {
            debug!("Scene {:?} not found in stack, skipping removal", key);
            return;
        };

        debug!("Removing scene {:?} from stack at position {}", key, pos);
        self.stack.remove(pos);

        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.on_exit(context);
        }
    }

    fn replace_internal(&mut self, old_key: S, new_key: S, context: &SceneContext<S, E>) {
        let Some(pos) = self.stack.iter().position(|&k| k == old_key) else {
            warn!("Scene {:?} not found in stack, skipping replacement", old_key);
            return;
        };

        if self.stack.contains(&new_key) {
            warn!("Scene {:?} is already in the stack, skipping replacement", new_key);
            return;
        }

        if !self.scenes.contains_key(&new_key) {
            warn!("Attempted to replace with unregistered scene {:?}", new_key);
            return;
        }

        debug!("Replacing scene {:?} with {:?} at position {}", old_key, new_key, pos);

        if let Some(scene) = self.scenes.get_mut(&old_key) {
            scene.on_exit(context);
        }

        self.stack[pos] = new_key;

        if let Some(scene) = self.scenes.get_mut(&new_key) {
            scene.on_enter(context);
        }
    }

    fn load_internal(&mut self, key: S, context: &SceneContext<S, E>) {
        if !self.scenes.contains_key(&key) {
            warn!("Attempted to load unregistered scene {:?}", key);
            return;
        }

        debug!("Loading scene {:?}", key);
        self.clear_internal(context);
        context.dispatcher.cleanup();
        self.push_internal(key, context);
    }

    fn clear_internal(&mut self, context: &SceneContext<S, E>) {
        debug!("Clearing all scenes from stack");

        // Top of the stack exits first.
        for key in std::mem::take(&mut self.stack).into_iter().rev() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_exit(context);
            }
        }
    }

    fn collect_active_scenes(&self) -> Vec<S> {
        let mut active = Vec::new();

        // Iterate stack top-down, stop at first opaque scene
        for &key in self.stack.iter().rev() {
            active.push(key);

            if let Some(scene) = self.scenes.get(&key) {
                if !scene.is_transparent() {
                    break;
                }
            }
        }

        active.reverse();
        active
    }
}

impl<S: SceneKey, E: EventKey> Default for SceneManager<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::{EventDispatcher, Listener};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        Title,
        Level,
        Pause,
    }

    impl SceneKey for TestScene {}

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestEvent {
        Tick,
        Paused,
    }

    impl EventKey for TestEvent {}

    type Journal = Arc<Mutex<Vec<String>>>;

    /// Records lifecycle calls and subscribes to `Tick` on enter.
    struct Tracer {
        name: &'static str,
        journal: Journal,
        transparent: bool,
    }

    impl Tracer {
        fn new(name: &'static str, journal: &Journal, transparent: bool) -> Self {
            Self {
                name,
                journal: Arc::clone(journal),
                transparent,
            }
        }
    }

    impl Scene<TestScene, TestEvent> for Tracer {
        fn on_enter(&mut self, context: &SceneContext<TestScene, TestEvent>) {
            self.journal.lock().push(format!("enter {}", self.name));

            let journal = Arc::clone(&self.journal);
            let name = self.name;
            let listener = Listener::nullary(move || {
                journal.lock().push(format!("tick {}", name));
                Ok(())
            });
            context.dispatcher.subscribe(TestEvent::Tick, &listener).unwrap();
        }

        fn on_exit(&mut self, _context: &SceneContext<TestScene, TestEvent>) {
            self.journal.lock().push(format!("exit {}", self.name));
        }

        fn update(&mut self, _context: &mut SceneContext<TestScene, TestEvent>) {
            self.journal.lock().push(format!("update {}", self.name));
        }

        fn is_transparent(&self) -> bool {
            self.transparent
        }
    }

    fn setup() -> (SceneManager<TestScene, TestEvent>, SceneContext<TestScene, TestEvent>, Journal) {
        let journal = Journal::default();
        let mut manager = SceneManager::new();
        manager.register_scene(TestScene::Title, Tracer::new("title", &journal, false));
        manager.register_scene(TestScene::Level, Tracer::new("level", &journal, false));
        manager.register_scene(TestScene::Pause, Tracer::new("pause", &journal, true));

        let context = SceneContext::new(Arc::new(EventDispatcher::new()));
        (manager, context, journal)
    }

    fn drain(journal: &Journal) -> Vec<String> {
        std::mem::take(&mut *journal.lock())
    }

    //--- SceneTransition Tests --------------------------------------------

    #[test]
    fn transition_default_is_empty() {
        let transition: SceneTransition<TestScene> = SceneTransition::default();
        assert_eq!(transition, SceneTransition::Empty);
    }

    //--- SceneManager Tests -----------------------------------------------

    #[test]
    fn start_enters_initial_scene() {
        let (mut manager, context, journal) = setup();
        manager.start(TestScene::Title, &context);

        assert_eq!(manager.stack(), &[TestScene::Title]);
        assert_eq!(drain(&journal), vec!["enter title"]);
        assert_eq!(context.dispatcher.listener_count(TestEvent::Tick), 1);
    }

    #[test]
    fn load_cleans_up_scene_listeners() {
        let (mut manager, mut context, journal) = setup();
        manager.start(TestScene::Title, &context);
        drain(&journal);

        context.transitions.push(SceneTransition::Load(TestScene::Level));
        manager.process_transitions(&mut context);

        assert_eq!(manager.stack(), &[TestScene::Level]);
        assert_eq!(drain(&journal), vec!["exit title", "enter level"]);

        // Title's Tick listener was dropped at the boundary.
        context.dispatcher.publish(TestEvent::Tick, ()).unwrap();
        assert_eq!(drain(&journal), vec!["tick level"]);
    }

    #[test]
    fn permanent_events_survive_load() {
        let (mut manager, mut context, journal) = setup();
        context.dispatcher.mark_permanent(TestEvent::Tick);
        manager.start(TestScene::Title, &context);

        context.transitions.push(SceneTransition::Load(TestScene::Level));
        manager.process_transitions(&mut context);
        drain(&journal);

        context.dispatcher.publish(TestEvent::Tick, ()).unwrap();
        assert_eq!(drain(&journal), vec!["tick title", "tick level"]);
    }

    #[test]
    fn push_does_not_clean_up() {
        let (mut manager, mut context, journal) = setup();
        let paused = Listener::nullary(|| Ok(()));
        context.dispatcher.subscribe(TestEvent::Paused, &paused).unwrap();
        manager.start(TestScene::Level, &context);

        context.transitions.push(SceneTransition::Push(TestScene::Pause));
        context.transitions.push(SceneTransition::Remove(TestScene::Pause));
        manager.process_transitions(&mut context);

        assert_eq!(
            drain(&journal),
            vec!["enter level", "enter pause", "exit pause"]
        );
        assert!(context.dispatcher.contains(TestEvent::Paused));
        assert_eq!(context.dispatcher.listener_count(TestEvent::Tick), 2);
    }

    #[test]
    fn clear_exits_top_first_and_cleans_up() {
        let (mut manager, mut context, journal) = setup();
        manager.start(TestScene::Level, &context);
        context.transitions.push(SceneTransition::Push(TestScene::Pause));
        manager.process_transitions(&mut context);
        drain(&journal);

        context.transitions.push(SceneTransition::Clear);
        manager.process_transitions(&mut context);

        assert!(manager.stack().is_empty());
        assert_eq!(drain(&journal), vec!["exit pause", "exit level"]);
        assert!(context.dispatcher.is_empty());
    }

    #[test]
    fn transparent_scene_lets_lower_scene_update() {
        let (mut manager, mut context, journal) = setup();
        manager.start(TestScene::Title, &context);
        context.transitions.push(SceneTransition::Push(TestScene::Level));
        context.transitions.push(SceneTransition::Push(TestScene::Pause));
        manager.process_transitions(&mut context);
        drain(&journal);

        manager.update(&mut context);
        assert_eq!(drain(&journal), vec!["update level", "update pause"]);
    }

    #[test]
    fn replace_swaps_in_place() {
        let (mut manager, mut context, journal) = setup();
        manager.start(TestScene::Title, &context);
        drain(&journal);

        context
            .transitions
            .push(SceneTransition::Replace(TestScene::Title, TestScene::Level));
        manager.process_transitions(&mut context);

        assert_eq!(manager.stack(), &[TestScene::Level]);
        assert!(!manager.is_active(TestScene::Title));
        assert_eq!(drain(&journal), vec!["exit title", "enter level"]);
    }

    #[test]
    fn loading_unregistered_scene_keeps_stack() {
        let journal = Journal::default();
        let mut manager = SceneManager::new();
        manager.register_scene(TestScene::Title, Tracer::new("title", &journal, false));
        let mut context = SceneContext::new(Arc::new(EventDispatcher::new()));
        manager.start(TestScene::Title, &context);

        context.transitions.push(SceneTransition::Load(TestScene::Level));
        manager.process_transitions(&mut context);

        assert_eq!(manager.stack(), &[TestScene::Title]);
        assert_eq!(context.dispatcher.listener_count(TestEvent::Tick), 1);
    }
}
