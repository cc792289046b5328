use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::KeyValueStore;

/// File-backed store: one file per key under a base directory. This is the
/// crate's stand-in for the browser's localStorage — it survives process
/// restarts on the same machine, nothing more.
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&base) {
            log::warn!("⚠️  Could not create store directory {:?}: {}", base, e);
        }
        Self { base }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::write(self.path(key), value) {
            log::warn!("⚠️  Could not persist key '{}': {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.path(key)) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("⚠️  Could not remove key '{}': {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store"));

        assert_eq!(store.get("user"), None);

        store.set("user", r#"{"id":"1"}"#);
        assert_eq!(store.get("user"), Some(r#"{"id":"1"}"#.to_string()));

        store.remove("user");
        assert_eq!(store.get("user"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("store");

        let store = FileStore::new(base.clone());
        store.set("authToken", "mock-token-1-1700000000000");

        let reopened = FileStore::new(base);
        assert_eq!(
            reopened.get("authToken"),
            Some("mock-token-1-1700000000000".to_string())
        );
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store"));
        store.remove("never-set");
        assert_eq!(store.get("never-set"), None);
    }
}
