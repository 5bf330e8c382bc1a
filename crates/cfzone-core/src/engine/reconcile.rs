//! IP reconciliation
//!
//! Walks every zone, takes the address records whose name is whitelisted and
//! rewrites them to point at a new IP with the default TTL.

use std::collections::BTreeSet;
use std::net::IpAddr;

use tracing::{debug, info};

use super::ZoneEngine;
use crate::error::{Error, Result};
use crate::model::{RecordFilter, RecordType, ZoneQuery};
use crate::paginate::paginate;
use crate::patch::{RecordChanges, build_patch};

/// Record names eligible for IP updates
///
/// Names are compared case-insensitively and without a trailing dot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainWhitelist {
    names: BTreeSet<String>,
}

impl DomainWhitelist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| normalize(n.as_ref())).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for DomainWhitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Counts from one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Zones walked
    pub zones: usize,
    /// Records patched successfully
    pub updated: usize,
    /// Records skipped because the provider reported them as already existing
    pub skipped: usize,
}

impl ZoneEngine {
    /// Point every whitelisted address record at `ip`
    ///
    /// Records are patched with `content = ip` and the default TTL; the
    /// record type follows the IP family (`A` or `AAAA`).
    ///
    /// # Errors
    ///
    /// - `Error::ProviderValidation` when the provider answers `success: false`
    /// - any listing or update error other than "Record already exists."
    ///
    /// Processing stops at the first error; records already patched stay patched.
    pub async fn update_ip(&self, ip: IpAddr, whitelist: &DomainWhitelist) -> Result<ReconcileSummary> {
        let record_type = RecordType::for_address(&ip);
        let content = ip.to_string();
        let mut summary = ReconcileSummary::default();

        if whitelist.is_empty() {
            info!("Domain whitelist is empty, no records will be updated");
        }

        let query = ZoneQuery::default();
        let mut zones = paginate(|page| self.provider.list_zones(&query, page));

        while let Some(zone) = zones.next().await? {
            summary.zones += 1;
            debug!("Scanning {} records in zone {}", record_type, zone.name);

            // Patching can reorder the listing, so every page is read first.
            let filter = RecordFilter::of_type(record_type.clone());
            let records = self.snapshot_records(&zone.id, &filter).await?;

            for record in records.iter().filter(|r| whitelist.contains(&r.name)) {
                let payload = build_patch(
                    record,
                    RecordChanges::new()
                        .with_content(content.clone())
                        .with_ttl(self.settings.ttl),
                );

                match self
                    .provider
                    .update_record(&zone.id, &record.id, &payload)
                    .await
                {
                    Ok(response) if response.success => {
                        info!("Updated {} {} -> {}", record.record_type, record.name, content);
                        summary.updated += 1;
                    }
                    Ok(response) => return Err(Error::ProviderValidation(response.errors)),
                    Err(e) if e.is_record_already_exists() => {
                        info!("{} {} already up to date, skipping", record.record_type, record.name);
                        summary.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            "Reconciled {} zone(s): {} updated, {} skipped",
            summary.zones, summary.updated, summary.skipped
        );
        Ok(summary)
    }
}
