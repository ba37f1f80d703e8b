//! Logger registry.
//!
//! Interns logger names so that every handle for the same name shares one
//! identity. Append-only: names are never removed.

use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent map of registered logger names.
#[derive(Debug, Default)]
pub struct Registry {
    names: DashMap<String, Arc<str>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the interned identity for `name`, registering it on first use.
    ///
    /// Callers validate the name first. Concurrent first calls for the same
    /// name all receive the single inserted value.
    pub fn get_or_create(&self, name: &str) -> Arc<str> {
        if let Some(existing) = self.names.get(name) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .names
            .entry(name.to_string())
            .or_insert_with(|| Arc::from(name));
        Arc::clone(entry.value())
    }

    pub fn get(&self, name: &str) -> Option<Arc<str>> {
        self.names.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_name_same_identity() {
        let registry = Registry::new();
        let a = registry.get_or_create("peer");
        let b = registry.get_or_create("peer");
        let c = registry.get_or_create("peer.gossip");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["peer", "peer.gossip"]);
    }

    #[test]
    fn test_get_does_not_register() {
        let registry = Registry::new();
        assert!(registry.get("app").is_none());
        assert!(!registry.contains("app"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_creation_single_winner() {
        let registry = Arc::new(Registry::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_create("shared.name"))
            })
            .collect();

        let results: Vec<Arc<str>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }
        assert_eq!(registry.len(), 1);
    }
}
