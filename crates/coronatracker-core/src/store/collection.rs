// ── Keyed reactive collection ──
//
// Concurrent storage with O(1) lookups by key or alias and push-based
// change notification via an `Observable` snapshot.

use std::sync::Arc;

use dashmap::DashMap;

use crate::stream::{Observable, Subscription};

/// A concurrent, reactive collection for a single entity type.
///
/// Uses `DashMap` for lookups and an [`Observable`] snapshot for
/// subscribers. The snapshot is ordered by key so every rebuild is
/// deterministic.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    /// Primary storage: key string -> entity.
    by_key: DashMap<String, Arc<T>>,

    /// Secondary index: lowercase alias -> key string.
    /// Aliases are ISO codes for countries.
    alias_to_key: DashMap<String, String>,

    /// Reverse of `alias_to_key` for efficient removal.
    key_to_aliases: DashMap<String, Vec<String>>,

    /// Sorted snapshot, rebuilt on mutation.
    snapshot: Observable<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        Self {
            by_key: DashMap::new(),
            alias_to_key: DashMap::new(),
            key_to_aliases: DashMap::new(),
            snapshot: Observable::new(Arc::new(Vec::new())),
        }
    }

    /// Upsert all incoming entities, then prune keys not in the incoming set.
    ///
    /// Subscribers see a single snapshot for the whole batch, never the
    /// intermediate or empty states.
    pub(crate) fn replace_all(&self, items: Vec<(String, Vec<String>, T)>) {
        let incoming: std::collections::HashSet<String> =
            items.iter().map(|(k, _, _)| k.clone()).collect();
        for (key, aliases, entity) in items {
            self.insert_entry(key, aliases, entity);
        }
        for existing in self.keys() {
            if !incoming.contains(&existing) {
                let _ = self.remove_entry(&existing);
            }
        }
        self.rebuild_snapshot();
    }

    /// Look up an entity by its primary key string.
    pub(crate) fn get_by_key(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Look up an entity by alias (case-insensitive).
    pub(crate) fn get_by_alias(&self, alias: &str) -> Option<Arc<T>> {
        let key = self.alias_to_key.get(&alias.to_ascii_lowercase())?;
        self.by_key
            .get(key.value().as_str())
            .map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.get()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> Subscription<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Return all current primary keys in the collection.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.by_key.iter().map(|r| r.key().clone()).collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn insert_entry(&self, key: String, aliases: Vec<String>, entity: T) {
        // Drop stale aliases if the key already existed.
        if let Some((_, old)) = self.key_to_aliases.remove(&key) {
            for alias in old {
                self.alias_to_key.remove_if(&alias, |_, owner| *owner == key);
            }
        }

        let aliases: Vec<String> = aliases.iter().map(|a| a.to_ascii_lowercase()).collect();
        for alias in &aliases {
            self.alias_to_key.insert(alias.clone(), key.clone());
        }

        self.by_key.insert(key.clone(), Arc::new(entity));
        self.key_to_aliases.insert(key, aliases);
    }

    fn remove_entry(&self, key: &str) -> Option<Arc<T>> {
        let removed = self.by_key.remove(key).map(|(_, v)| v)?;
        if let Some((_, aliases)) = self.key_to_aliases.remove(key) {
            for alias in aliases {
                self.alias_to_key.remove_if(&alias, |_, owner| owner == key);
            }
        }
        Some(removed)
    }

    /// Collect all values into a sorted snapshot and broadcast it.
    fn rebuild_snapshot(&self) {
        let mut entries: Vec<(String, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let values = entries.into_iter().map(|(_, v)| v).collect();
        self.snapshot.publish(Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(key: &str, codes: &[&str], value: &str) -> (String, Vec<String>, String) {
        (
            key.to_owned(),
            codes.iter().map(|c| (*c).to_owned()).collect(),
            value.to_owned(),
        )
    }

    #[test]
    fn lookup_by_key_and_alias() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.replace_all(vec![item("Poland", &["PL", "POL"], "pl")]);

        assert_eq!(*col.get_by_key("Poland").unwrap(), "pl");
        assert_eq!(*col.get_by_alias("pl").unwrap(), "pl");
        assert_eq!(*col.get_by_alias("Pol").unwrap(), "pl");
        assert!(col.get_by_alias("DE").is_none());
        assert!(col.get_by_key("poland").is_none());
    }

    #[test]
    fn changed_aliases_drop_old_ones() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.replace_all(vec![item("Czechia", &["CS"], "v1")]);
        col.replace_all(vec![item("Czechia", &["CZ"], "v2")]);

        assert!(col.get_by_alias("CS").is_none());
        assert_eq!(*col.get_by_alias("CZ").unwrap(), "v2");
    }

    #[test]
    fn snapshot_is_sorted_by_key() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.replace_all(vec![
            item("Poland", &[], "p"),
            item("Germany", &[], "g"),
            item("Austria", &[], "a"),
        ]);

        let snap: Vec<String> = col.snapshot().iter().map(|v| (**v).clone()).collect();
        assert_eq!(snap, vec!["a", "g", "p"]);
    }

    #[test]
    fn replace_all_prunes_and_emits_once() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.replace_all(vec![item("Atlantis", &["AT"], "x")]);
        assert!(!col.is_empty());

        let mut sub = col.subscribe();
        col.replace_all(vec![item("Poland", &["PL"], "p"), item("Germany", &["DE"], "g")]);

        let snap = sub.try_changed().unwrap();
        assert_eq!(snap.len(), 2);
        assert!(sub.try_changed().is_none());
        assert!(col.get_by_key("Atlantis").is_none());
        assert!(col.get_by_alias("AT").is_none());
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn replace_with_nothing_empties() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.replace_all(vec![item("a", &["x"], "1")]);
        col.replace_all(Vec::new());

        assert!(col.is_empty());
        assert!(col.snapshot().is_empty());
        assert!(col.get_by_alias("x").is_none());
        assert!(col.keys().is_empty());
    }
}
