//! Process-wide record of the last successful refresh.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Shared handle to the last-refresh timestamp.
///
/// Cloning shares the underlying value. The marker is only written after a
/// refresh has committed its countries, so it never runs ahead of the
/// store.
#[derive(Debug, Clone, Default)]
pub struct RefreshMarker {
    inner: Arc<RwLock<Option<String>>>,
}

impl RefreshMarker {
    /// A marker that has never been set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A marker seeded with an existing timestamp (e.g. read from the store
    /// at startup).
    pub fn with_timestamp(timestamp: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(timestamp)),
        }
    }

    /// The last refresh timestamp, if any.
    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    /// Record a completed refresh.
    pub async fn set(&self, timestamp: String) {
        *self.inner.write().await = Some(timestamp);
    }
}
