// # Memory IP Cache
//
// In-memory implementation of IpCache.
//
// ## When to Use
//
// - Tests
// - Embedding cfzone in a long-running process that keeps its own state

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::IpCache;

/// In-memory IP cache
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the engine stored.
#[derive(Debug, Clone, Default)]
pub struct MemoryIpCache {
    inner: Arc<RwLock<Option<String>>>,
}

impl MemoryIpCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that already holds `value`
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(value.into()))),
        }
    }
}

#[async_trait]
impl IpCache for MemoryIpCache {
    async fn load(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.read().await.as_ref().map(|v| v.trim().to_string()))
    }

    async fn store(&self, ip: IpAddr) -> Result<(), Error> {
        *self.inner.write().await = Some(ip.to_string());
        Ok(())
    }
}
