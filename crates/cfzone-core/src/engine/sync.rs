//! Public IP sync
//!
//! Combines the IP source, the IP change cache and the reconciler so that a
//! scheduled run only touches the provider when the public IP has changed.

use std::net::IpAddr;

use tracing::info;

use super::{DomainWhitelist, ReconcileSummary, ZoneEngine};
use crate::error::Result;
use crate::traits::IpCache;

/// What [`ZoneEngine::sync_public_ip`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing was cached; the IP was stored and no records were touched
    Initialized { ip: IpAddr },
    /// The cached IP matches; no records were touched
    Unchanged { ip: IpAddr },
    /// The IP changed; records were reconciled and the cache updated
    Updated { ip: IpAddr, summary: ReconcileSummary },
}

impl ZoneEngine {
    /// Resolve the public IP and reconcile records if it differs from the cache
    ///
    /// The cache is only overwritten after reconciliation succeeded, so a
    /// failed run is retried on the next invocation.
    pub async fn sync_public_ip(
        &self,
        cache: &dyn IpCache,
        whitelist: &DomainWhitelist,
    ) -> Result<SyncOutcome> {
        let ip = self.ip_source.current().await?;
        info!("Public IP is {} (via {})", ip, self.ip_source.source_name());

        let Some(cached) = cache.load().await? else {
            cache.store(ip).await?;
            info!("No cached IP, stored {} without updating records", ip);
            return Ok(SyncOutcome::Initialized { ip });
        };

        if cached == ip.to_string() {
            info!("IP unchanged ({}), nothing to do", ip);
            return Ok(SyncOutcome::Unchanged { ip });
        }

        info!("IP changed from {} to {}", cached, ip);
        let summary = self.update_ip(ip, whitelist).await?;
        cache.store(ip).await?;
        Ok(SyncOutcome::Updated { ip, summary })
    }
}
