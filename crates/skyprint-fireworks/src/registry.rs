//! Bookkeeping of which fireworks are still playing

use skyprint_core::InstanceId;
use std::collections::HashSet;

/// Set of live firework handles.
///
/// The owner registers a handle when it launches a firework and unregisters
/// it when the firework completes or is torn down. Session code polls
/// [`ActiveInstanceRegistry::is_empty`] to learn that everything finished.
#[derive(Debug, Default)]
pub struct ActiveInstanceRegistry {
    active: HashSet<InstanceId>,
}

impl ActiveInstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle. Returns false if it was already registered.
    pub fn register(&mut self, id: InstanceId) -> bool {
        self.active.insert(id)
    }

    /// Remove a handle. Removing an absent handle is a no-op that returns false.
    pub fn unregister(&mut self, id: InstanceId) -> bool {
        self.active.remove(&id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.active.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Registered handles, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.active.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister() {
        let mut registry = ActiveInstanceRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register(InstanceId(1)));
        assert!(registry.register(InstanceId(2)));
        assert_eq!(registry.count(), 2);
        assert!(registry.contains(InstanceId(1)));

        assert!(registry.unregister(InstanceId(1)));
        assert_eq!(registry.count(), 1);
        assert!(!registry.contains(InstanceId(1)));
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut registry = ActiveInstanceRegistry::new();
        registry.register(InstanceId(7));
        assert!(registry.unregister(InstanceId(7)));
        assert!(!registry.unregister(InstanceId(7)));
        assert!(!registry.unregister(InstanceId(99)));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn double_register_counts_once() {
        let mut registry = ActiveInstanceRegistry::new();
        assert!(registry.register(InstanceId(3)));
        assert!(!registry.register(InstanceId(3)));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![InstanceId(3)]);
    }
}
