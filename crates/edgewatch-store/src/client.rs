// client.rs — The StoreClient capability trait.
//
// Everything the watcher does to the outside world goes through this trait.
// Backends own their connection handling; the watcher never sees a socket.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;

/// Capability object for a hash-field store with pub/sub.
///
/// Implementations must be usable from a single task with `&self`; any
/// internal connection state is the backend's concern.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Verify connectivity. Called once before watching starts.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Read `field` of the hash at `key`.
    ///
    /// Returns `Ok(None)` when the key or the field does not exist.
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Write `field` of the hash at `key`, creating it if needed.
    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// Publish `message` on `topic`.
    async fn publish(&self, topic: &str, message: &str) -> Result<(), StoreError>;

    /// Human-readable location of the store, for log lines.
    fn endpoint(&self) -> String;
}

/// Shared handles delegate to the inner client, so a store can be watched
/// and inspected at the same time.
#[async_trait]
impl<T: StoreClient + ?Sized> StoreClient for Arc<T> {
    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        (**self).get_field(key, field).await
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_field(key, field, value).await
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<(), StoreError> {
        (**self).publish(topic, message).await
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}
