//! Storage port and its backends
//!
//! The gallery persists state as whole JSON documents under a handful of
//! string keys, the same shape as a browser's per-origin key-value store.
//! Backends only move bytes; they never interpret them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use crate::error::{err, Result};

/// Narrow key-value port used by the session and favorites stores
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    /// Returns whether the key was present
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

impl<T: Storage + ?Sized> Storage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

/// In-memory backend for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.slots().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.slots().remove(key).is_some())
    }
}

/// Durable LMDB backend. Each write commits its own transaction.
pub struct LmdbStorage {
    env: Env,
    kv: Database<Str, Bytes>,
}

impl LmdbStorage {
    /// Open (or create) the store under `path`
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        // SAFETY: LMDB requires no other processes access this path concurrently during open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path)
                .map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let kv = env.create_database(&mut tx, Some("kv")).map_err(err)?;
        tx.commit().map_err(err)?;
        tracing::debug!(path = %path.display(), "opened lmdb store");
        Ok(Self { env, kv })
    }
}

impl Storage for LmdbStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let tx = self.env.read_txn().map_err(err)?;
        Ok(self.kv.get(&tx, key).map_err(err)?.map(|v| v.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut tx = self.env.write_txn().map_err(err)?;
        self.kv.put(&mut tx, key, value).map_err(err)?;
        tx.commit().map_err(err)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut tx = self.env.write_txn().map_err(err)?;
        let r = self.kv.delete(&mut tx, key).map_err(err)?;
        tx.commit().map_err(err)?;
        Ok(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let s = MemoryStorage::new();
        assert_eq!(s.get("k").unwrap(), None);
        s.set("k", b"v1").unwrap();
        s.set("k", b"v2").unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some(&b"v2"[..]));
        assert_eq!(s.len(), 1);
        assert!(s.remove("k").unwrap());
        assert!(!s.remove("k").unwrap());
        assert!(s.is_empty());
    }

    #[test]
    fn test_shared_handle_sees_same_slots() {
        let s = Arc::new(MemoryStorage::new());
        let other = Arc::clone(&s);
        s.set("k", b"x").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some(&b"x"[..]));
    }
}
