// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tess_app_core::config::{ConfigError, ConfigStore};

/// In-memory [`ConfigStore`] with call counters and injectable failures.
///
/// Clones share state, so a test can keep one handle for assertions and give
/// the other to the code under test.
///
/// ```
/// use tess_app_core::config::ConfigService;
/// use tess_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// service.save("editor", &serde_json::json!({"show_labels": true})).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key("editor"));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    shared: Arc<Mutex<Shared>>,
}

#[derive(Default)]
struct Shared {
    blobs: BTreeMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    fail_loads: bool,
    fail_saves: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores a blob directly, bypassing counters and failure flags.
    pub fn insert_raw(&self, key: &str, data: &[u8]) {
        self.lock().blobs.insert(key.to_owned(), data.to_vec());
    }

    /// Reads a blob directly, bypassing counters and failure flags.
    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().blobs.get(key).cloned()
    }

    /// Makes every subsequent `load_raw` fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_loads = fail;
    }

    /// Makes every subsequent `save_raw` fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Number of `load_raw` attempts, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().loads
    }

    /// Number of `save_raw` attempts, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().blobs.keys().cloned().collect()
    }

    /// `true` when a blob is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().blobs.contains_key(key)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut shared = self.lock();
        shared.loads += 1;
        if shared.fail_loads {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        shared.blobs.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut shared = self.lock();
        shared.saves += 1;
        if shared.fail_saves {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        shared.blobs.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn saves_are_visible_through_clones() {
        let store = InMemoryConfigStore::new();
        let other = store.clone();
        store.save_raw("a", b"1").unwrap();
        assert_eq!(other.load_raw("a").unwrap(), b"1");
        assert_eq!(other.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn missing_keys_are_not_found() {
        let store = InMemoryConfigStore::new();
        assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn failures_still_count_and_store_nothing() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(store.save_raw("k", b"v").is_err());
        assert_eq!(store.save_count(), 1);
        assert!(store.keys().is_empty());

        store.set_fail_on_save(false);
        store.set_fail_on_load(true);
        store.save_raw("k", b"v").unwrap();
        assert!(matches!(store.load_raw("k"), Err(ConfigError::Other(_))));
        assert_eq!(store.get_raw("k").unwrap(), b"v");
    }
}
