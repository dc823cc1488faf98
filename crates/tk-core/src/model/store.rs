//! Injectable snapshot container

use std::fmt;
use std::sync::Arc;

use super::ArrayModel;

/// Callback invoked with every new snapshot
pub type Subscriber = Box<dyn FnMut(&ArrayModel)>;

/// Holds the current [`ArrayModel`] snapshot and notifies subscribers when an
/// update produces a successor.
pub struct ModelStore {
    snapshot: Arc<ArrayModel>,
    subscribers: Vec<Subscriber>,
}

impl ModelStore {
    pub fn new(initial: ArrayModel) -> Self {
        Self {
            snapshot: Arc::new(initial),
            subscribers: Vec::new(),
        }
    }

    /// Shared handle to the current snapshot
    pub fn snapshot(&self) -> Arc<ArrayModel> {
        Arc::clone(&self.snapshot)
    }

    pub fn get(&self) -> &ArrayModel {
        &self.snapshot
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&ArrayModel) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Run a pure update against the current snapshot.
    ///
    /// Returns `true` when a successor was installed.
    pub fn apply(&mut self, update: impl FnOnce(&ArrayModel) -> Option<ArrayModel>) -> bool {
        match update(&self.snapshot) {
            Some(next) => {
                self.install(next);
                true
            }
            None => false,
        }
    }

    /// Install a snapshot from outside (e.g. a loaded project). Its revision is
    /// moved past the current one so downstream caches see a change.
    pub fn replace(&mut self, mut model: ArrayModel) {
        model.revision = self.snapshot.revision + 1;
        self.install(model);
    }

    fn install(&mut self, next: ArrayModel) {
        self.snapshot = Arc::new(next);
        for subscriber in &mut self.subscribers {
            subscriber(&self.snapshot);
        }
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(ArrayModel::default())
    }
}

impl fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStore")
            .field("revision", &self.snapshot.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::model::LogicalIndex;

    #[test]
    fn test_subscribers_see_successors_only() {
        let mut store = ModelStore::default();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        assert!(store.apply(|m| m.with_position(LogicalIndex(0), Vec3::X)));
        assert!(!store.apply(|m| m.with_position(LogicalIndex(0), Vec3::X)));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let mut store = ModelStore::default();
        let before = store.snapshot();
        store.apply(|m| m.with_length(400.0));
        assert_eq!(before.profile.length, 200.0);
        assert_eq!(store.get().profile.length, 400.0);
    }

    #[test]
    fn test_replace_advances_revision() {
        let mut store = ModelStore::default();
        store.apply(|m| m.with_length(400.0));
        let revision = store.get().revision();
        store.replace(ArrayModel::default());
        assert!(store.get().revision() > revision);
    }
}
