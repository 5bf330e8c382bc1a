// # Zone Provider Trait
//
// Defines the interface for zone and DNS record operations on the provider.
//
// ## Implementations
//
// - Cloudflare API v4: `cfzone-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfzone_core::{paginate, ZoneProvider};
// use cfzone_core::model::ZoneQuery;
//
// async fn print_zones(provider: &dyn ZoneProvider) -> cfzone_core::Result<()> {
//     let query = ZoneQuery::default();
//     let mut zones = paginate(|page| provider.list_zones(&query, page));
//     while let Some(zone) = zones.next().await? {
//         println!("{}", zone.name);
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{
    DnsRecord, NewRecord, Page, RecordFilter, RecordPayload, UpdateResponse, Zone, ZoneQuery,
    ZoneSetting,
};

/// Trait for the provider's zone/record API
///
/// Each method maps to exactly one API request. Implementations do not retry,
/// cache, or paginate; paging is driven by [`crate::paginate`] and every
/// decision about what to change lives in [`crate::ZoneEngine`].
///
/// # Errors
///
/// Non-2xx responses carrying a structured error body must surface as
/// [`crate::Error::Api`] with the provider's first error message verbatim, so
/// that [`crate::Error::is_record_already_exists`] can recognise duplicates.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Register a new zone; `jump_start` asks the provider to import existing records
    async fn create_zone(&self, name: &str, jump_start: bool) -> Result<Zone, crate::Error>;

    /// One page of the zone listing (pages start at 1)
    async fn list_zones(&self, query: &ZoneQuery, page: u32) -> Result<Page<Zone>, crate::Error>;

    /// One page of a zone's DNS records (pages start at 1)
    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
        page: u32,
    ) -> Result<Page<DnsRecord>, crate::Error>;

    /// Create a DNS record
    async fn create_record(
        &self,
        zone_id: &str,
        record: &NewRecord,
    ) -> Result<DnsRecord, crate::Error>;

    /// Update a DNS record with a complete payload
    ///
    /// A 2xx response is returned as-is, including `success: false` bodies;
    /// judging them is up to the caller.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<UpdateResponse, crate::Error>;

    /// Delete a DNS record
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Change a single zone setting
    async fn update_setting(&self, zone_id: &str, setting: ZoneSetting)
    -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
