//! Connection registry: which datasources are open right now.
//!
//! A plain name → handle map behind a lock. It performs no IO and no
//! cleanup: replacing or removing an entry never closes the old handle.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use kvsource_domain::name::DatasourceName;
use kvsource_domain::time::{Timestamp, now};

#[derive(Debug, Clone)]
struct Entry<H> {
    handle: H,
    opened_at: Timestamp,
}

/// At most one live handle per datasource name.
///
/// Absence of a key means "not currently open", not "never existed".
#[derive(Debug)]
pub struct ConnectionRegistry<H> {
    entries: Mutex<BTreeMap<DatasourceName, Entry<H>>>,
}

impl<H> Default for ConnectionRegistry<H> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<H: Clone> ConnectionRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle currently stored for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<H> {
        self.entries.lock().get(name).map(|e| e.handle.clone())
    }

    /// Store `handle` under `name`, silently replacing any previous entry.
    pub fn set(&self, name: DatasourceName, handle: H) {
        let entry = Entry {
            handle,
            opened_at: now(),
        };
        self.entries.lock().insert(name, entry);
    }

    /// Forget `name`. Removing an absent key is a no-op.
    pub fn remove(&self, name: &str) -> Option<H> {
        self.entries.lock().remove(name).map(|e| e.handle)
    }

    /// Forget `name`, returning its handle together with when it was opened.
    pub fn take(&self, name: &str) -> Option<(H, Timestamp)> {
        self.entries
            .lock()
            .remove(name)
            .map(|e| (e.handle, e.opened_at))
    }

    /// Put back an entry obtained from [`take`](Self::take), keeping its
    /// original open time.
    pub fn restore(&self, name: DatasourceName, handle: H, opened_at: Timestamp) {
        self.entries
            .lock()
            .insert(name, Entry { handle, opened_at });
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Names of every open datasource, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<DatasourceName> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Point-in-time copy of `(name, handle, opened_at)`, sorted by name.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(DatasourceName, H, Timestamp)> {
        self.entries
            .lock()
            .iter()
            .map(|(name, e)| (name.clone(), e.handle.clone(), e.opened_at))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DatasourceName {
        DatasourceName::new(s).unwrap()
    }

    #[test]
    fn should_return_none_when_name_was_never_set() {
        let registry: ConnectionRegistry<u32> = ConnectionRegistry::new();
        assert_eq!(registry.get("default"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn should_return_stored_handle() {
        let registry = ConnectionRegistry::new();
        registry.set(name("alt"), 1_u32);
        assert_eq!(registry.get("alt"), Some(1));
        assert!(registry.contains("alt"));
    }

    #[test]
    fn should_overwrite_silently_when_set_twice() {
        let registry = ConnectionRegistry::new();
        registry.set(name("alt"), 1_u32);
        registry.set(name("alt"), 2_u32);
        assert_eq!(registry.get("alt"), Some(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn should_ignore_remove_of_absent_name() {
        let registry: ConnectionRegistry<u32> = ConnectionRegistry::new();
        assert_eq!(registry.remove("ghost"), None);
        assert_eq!(registry.remove("ghost"), None);
    }

    #[test]
    fn should_return_removed_handle() {
        let registry = ConnectionRegistry::new();
        registry.set(name("alt"), 3_u32);
        assert_eq!(registry.remove("alt"), Some(3));
        assert!(!registry.contains("alt"));
    }

    #[test]
    fn should_keep_open_time_when_taken_and_restored() {
        let registry = ConnectionRegistry::new();
        registry.set(name("alt"), 4_u32);
        let opened_at = registry.snapshot()[0].2;

        let (handle, taken_at) = registry.take("alt").unwrap();
        assert!(registry.is_empty());
        registry.restore(name("alt"), handle, taken_at);

        assert_eq!(registry.get("alt"), Some(4));
        assert_eq!(registry.snapshot()[0].2, opened_at);
    }

    #[test]
    fn should_keep_names_independent() {
        let registry = ConnectionRegistry::new();
        registry.set(name("default"), 1_u32);
        registry.set(name("alt"), 2_u32);
        registry.remove("default");
        assert_eq!(registry.get("alt"), Some(2));
        assert_eq!(registry.names(), vec![name("alt")]);
    }

    #[test]
    fn should_snapshot_sorted_by_name() {
        let registry = ConnectionRegistry::new();
        registry.set(name("zeta"), 1_u32);
        registry.set(name("alpha"), 2_u32);

        let snapshot = registry.snapshot();
        let names: Vec<_> = snapshot.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(snapshot[0].1, 2);
    }
}
