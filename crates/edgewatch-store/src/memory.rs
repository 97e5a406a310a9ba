// memory.rs — MemoryStore: in-process StoreClient.
//
// Holds hashes and a publish log in memory. Each operation can be switched
// to fail, which lets tests (and `edgewatch --dry-run`) exercise the
// watcher's error paths without a Redis server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::StoreClient;
use crate::error::StoreError;

/// A message recorded by [`MemoryStore::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub message: String,
}

/// In-memory implementation of [`StoreClient`].
#[derive(Default)]
pub struct MemoryStore {
    hashes: Mutex<HashMap<String, HashMap<String, String>>>,
    published: Mutex<Vec<Published>>,
    fail_ping: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_publish: AtomicBool,
    reads: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `field` from the hash at `key`.
    pub async fn remove_field(&self, key: &str, field: &str) {
        let mut hashes = self.hashes.lock().await;
        if let Some(hash) = hashes.get_mut(key) {
            hash.remove(field);
            if hash.is_empty() {
                hashes.remove(key);
            }
        }
    }

    /// Every message published so far, oldest first.
    pub async fn published(&self) -> Vec<Published> {
        self.published.lock().await.clone()
    }

    /// Number of `get_field` calls made, including failed ones.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_ping(&self, fail: bool) {
        self.fail_ping.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("ping refused".to_string()));
        }
        Ok(())
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("read of {}.{} refused", key, field)));
        }
        let hashes = self.hashes.lock().await;
        Ok(hashes.get(key).and_then(|hash| hash.get(field)).cloned())
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write of {}.{} refused", key, field)));
        }
        self.hashes
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<(), StoreError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("publish to {} refused", topic)));
        }
        self.published.lock().await.push(Published {
            topic: topic.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn endpoint(&self) -> String {
        "memory".to_string()
    }
}
