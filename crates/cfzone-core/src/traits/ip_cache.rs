// # IP Cache Trait
//
// Defines the interface for remembering the last applied public IP.
//
// ## Purpose
//
// Dynamic-DNS runs are usually scheduled (cron, systemd timers). The cache
// makes repeated runs no-ops while the public IP stays the same:
//
// - No cached value: the fresh IP is stored and nothing is reconciled
// - Cached value equals fresh IP: nothing happens
// - Cached value differs: records are reconciled, then the cache is updated
//
// ## Implementations
//
// - `FileIpCache`: single-line text file
// - `MemoryIpCache`: in-process, for tests and embedding

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP change cache implementations
///
/// Only one process is expected to use a given cache at a time; no
/// cross-process locking is performed.
#[async_trait]
pub trait IpCache: Send + Sync {
    /// Load the cached IP, trimmed
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The cached value, compared textually by callers
    /// - `Ok(None)`: Nothing cached yet, or the cache could not be read
    /// - `Err(Error)`: Unexpected storage error
    async fn load(&self) -> Result<Option<String>, crate::Error>;

    /// Replace the cached IP
    async fn store(&self, ip: IpAddr) -> Result<(), crate::Error>;
}
