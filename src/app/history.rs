//! Linear undo/redo over whole-scene snapshots.
//!
//! Entries are `Scene` values. Their collections are persistent, so keeping
//! hundreds of them costs little more than the edits between them.

use crate::scene::Scene;

pub const DEFAULT_HISTORY_LIMIT: usize = 200;

#[derive(Debug)]
pub struct History {
    // Never empty: entry 0 is the oldest state still reachable by undo.
    entries: Vec<Scene>,
    index: usize,
    limit: usize,
}

impl History {
    pub fn new(initial: Scene, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &Scene {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Drops any redo branch, appends `scene`, and makes it current.
    pub fn commit(&mut self, scene: &Scene) {
        self.entries.truncate(self.index + 1);
        self.entries.push(scene.clone());
        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(0..overflow);
        }
        self.index = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&Scene> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&Scene> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Point};

    fn with_node(scene: &Scene, label: &str) -> Scene {
        let mut next = scene.clone();
        next.add_node(Node::new(label, Point::default()));
        next
    }

    #[test]
    fn undo_restores_prior_and_redo_restores_undone() {
        let s0 = Scene::new();
        let mut history = History::new(s0.clone(), DEFAULT_HISTORY_LIMIT);
        let s1 = with_node(&s0, "a");
        history.commit(&s1);
        let s2 = with_node(&s1, "b");
        history.commit(&s2);

        assert_eq!(history.undo(), Some(&s1));
        assert_eq!(history.undo(), Some(&s0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), &s0);
        assert_eq!(history.redo(), Some(&s1));
        assert_eq!(history.redo(), Some(&s2));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn commit_after_undo_discards_future() {
        let s0 = Scene::new();
        let mut history = History::new(s0.clone(), DEFAULT_HISTORY_LIMIT);
        let s1 = with_node(&s0, "a");
        history.commit(&s1);
        history.commit(&with_node(&s1, "b"));
        history.undo();
        let branch = with_node(&s1, "c");
        history.commit(&branch);

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), &branch);
        assert_eq!(history.undo(), Some(&s1));
    }

    #[test]
    fn limit_evicts_oldest_entries() {
        let mut scene = Scene::new();
        let mut history = History::new(scene.clone(), 3);
        for label in ["a", "b", "c", "d"] {
            scene = with_node(&scene, label);
            history.commit(&scene);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current().node_count(), 2);
    }
}
