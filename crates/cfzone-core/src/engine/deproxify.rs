//! Proxy stripping
//!
//! Turns the provider's reverse proxy off for every record in a zone. Each
//! record is patched independently; one failure does not stop the rest.

use tracing::{info, warn};

use super::ZoneEngine;
use crate::error::{Error, Result};
use crate::model::{RecordFilter, UpdateResponse};
use crate::patch::{RecordChanges, build_patch};

/// Outcome of un-proxying one record
#[derive(Debug)]
pub struct ProxyUpdate {
    /// Name of the patched record
    pub name: String,
    pub result: Result<UpdateResponse>,
}

impl ProxyUpdate {
    /// Whether the provider accepted the change
    pub fn succeeded(&self) -> bool {
        matches!(&self.result, Ok(response) if response.success)
    }
}

impl ZoneEngine {
    /// Set `proxied = false` on every proxied record of `zone_id`
    ///
    /// Listing the records can fail the whole call; individual patch
    /// failures are collected in the returned list instead.
    pub async fn deproxify(&self, zone_id: &str) -> Result<Vec<ProxyUpdate>> {
        let records = self.snapshot_records(zone_id, &RecordFilter::all()).await?;

        let mut updates = Vec::new();
        for record in records.iter().filter(|record| record.proxied) {
            let payload = build_patch(record, RecordChanges::new().with_proxied(false));
            let result = self
                .provider
                .update_record(zone_id, &record.id, &payload)
                .await;

            match &result {
                Ok(response) if response.success => {
                    info!("Disabled proxy on {}", record.name);
                }
                Ok(response) => {
                    warn!(
                        "Provider rejected proxy change on {}: {}",
                        record.name,
                        Error::ProviderValidation(response.errors.clone())
                    );
                }
                Err(e) => {
                    warn!("Failed to disable proxy on {}: {}", record.name, e);
                }
            }

            updates.push(ProxyUpdate {
                name: record.name.clone(),
                result,
            });
        }

        if updates.is_empty() {
            info!("No proxied records in zone {}", zone_id);
        }
        Ok(updates)
    }
}
