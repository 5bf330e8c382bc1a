//! Zone reconciliation engine
//!
//! The ZoneEngine is responsible for:
//! - Bootstrapping new zones with default records
//! - Stripping the proxy flag from existing records
//! - Pushing zone-level settings
//! - Rewriting whitelisted address records to the current public IP
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐        ┌──────────────┐        ┌──────────────┐
//! │  IpSource   │──ip──▶ │  ZoneEngine  │◀─load──│   IpCache    │
//! └─────────────┘        └──────────────┘──store─▶──────────────┘
//!                               │
//!                 paginate / build_patch
//!                               │
//!                               ▼
//!                       ┌──────────────┐
//!                       │ ZoneProvider │
//!                       └──────────────┘
//! ```
//!
//! ## Execution Model
//!
//! Every operation is a single pass: one provider call in flight at a time,
//! zones and records handled in provider order. Nothing is retried; the
//! only recovered error is the provider's "Record already exists." answer
//! during IP reconciliation.

mod bootstrap;
mod deproxify;
mod reconcile;
mod settings;
mod sync;

pub use bootstrap::BootstrapChanges;
pub use deproxify::ProxyUpdate;
pub use reconcile::{DomainWhitelist, ReconcileSummary};
pub use settings::default_zone_settings;
pub use sync::SyncOutcome;

use tracing::info;

use crate::config::RecordDefaults;
use crate::error::Result;
use crate::model::{DnsRecord, RecordFilter, Zone, ZoneQuery};
use crate::paginate::paginate;
use crate::traits::{IpSource, ZoneProvider};

/// Defaults applied to records the engine writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// TTL for created and reconciled address records
    pub ttl: u32,
    /// Proxy flag for created records
    pub proxied: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ttl: 60,
            proxied: false,
        }
    }
}

impl From<&RecordDefaults> for EngineSettings {
    fn from(defaults: &RecordDefaults) -> Self {
        Self {
            ttl: defaults.ttl,
            proxied: defaults.proxied,
        }
    }
}

/// Everything `add_zone` did to a freshly registered zone
#[derive(Debug)]
pub struct AddZoneReport {
    pub zone: Zone,
    pub records: BootstrapChanges,
    pub proxy_updates: Vec<ProxyUpdate>,
}

/// Core zone engine
///
/// ## Lifecycle
///
/// 1. Create with [`ZoneEngine::new()`]
/// 2. Call one operation per invocation (`add_zone`, `update_ip`, ...)
/// 3. Drop
pub struct ZoneEngine {
    /// Provider API for zones, records and settings
    provider: Box<dyn ZoneProvider>,

    /// Public IP discovery
    ip_source: Box<dyn IpSource>,

    /// Record defaults
    settings: EngineSettings,
}

impl ZoneEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `provider`: Zone provider implementation
    /// - `ip_source`: IP source implementation
    /// - `settings`: TTL/proxied defaults for written records
    pub fn new(
        provider: Box<dyn ZoneProvider>,
        ip_source: Box<dyn IpSource>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            provider,
            ip_source,
            settings,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Register a zone and prepare it for use
    ///
    /// Runs [`bootstrap`](Self::bootstrap), then [`deproxify`](Self::deproxify)
    /// and [`configure`](Self::configure) on the new zone. Proxy update
    /// failures are reported in the result; every other failure aborts.
    pub async fn add_zone(&self, zone_name: &str) -> Result<AddZoneReport> {
        let (zone, records) = self.bootstrap_zone(zone_name).await?;
        let proxy_updates = self.deproxify(&zone.id).await?;
        self.configure(&zone.id).await?;

        info!("Zone {} is ready", zone.name);
        Ok(AddZoneReport {
            zone,
            records,
            proxy_updates,
        })
    }

    /// Every zone visible to the provider credentials, matching `query`
    pub async fn list_zones(&self, query: &ZoneQuery) -> Result<Vec<Zone>> {
        let zones = paginate(|page| self.provider.list_zones(query, page))
            .collect_all()
            .await?;
        tracing::debug!(
            "Listed {} zone(s) from {}",
            zones.len(),
            self.provider.provider_name()
        );
        Ok(zones)
    }

    /// Snapshot of a zone's records matching `filter`
    async fn snapshot_records(&self, zone_id: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        paginate(|page| self.provider.list_records(zone_id, filter, page))
            .collect_all()
            .await
    }
}
