//=========================================================================
// Transition Queue
//=========================================================================
//
// Scenes queue transitions here during updates. The scene manager
// processes this queue at tick boundaries.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneKey, SceneTransition};

//=== Transition Queue ====================================================

/// FIFO of scene transitions awaiting the next tick boundary.
#[derive(Debug)]
pub struct TransitionQueue<S: SceneKey> {
    queue: Vec<SceneTransition<S>>,
}

impl<S: SceneKey> TransitionQueue<S> {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a scene transition to be processed at the next tick boundary.
    pub fn push(&mut self, transition: SceneTransition<S>) {
        self.queue.push(transition);
    }

    /// Returns an iterator over the queued transitions.
    pub fn iter(&self) -> impl Iterator<Item = &SceneTransition<S>> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneTransition<S>> {
        std::mem::take(&mut self.queue)
    }
}

impl<S: SceneKey> Default for TransitionQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        Title,
        Level1,
    }

    impl SceneKey for TestScene {}

    #[test]
    fn take_drains_in_fifo_order() {
        let mut queue = TransitionQueue::new();
        queue.push(SceneTransition::Load(TestScene::Title));
        queue.push(SceneTransition::Replace(TestScene::Title, TestScene::Level1));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.iter().next(), Some(&SceneTransition::Load(TestScene::Title)));

        let taken = queue.take();
        assert!(queue.is_empty());
        assert_eq!(
            taken,
            vec![
                SceneTransition::Load(TestScene::Title),
                SceneTransition::Replace(TestScene::Title, TestScene::Level1),
            ]
        );
    }
}
