//! Zone bootstrapping
//!
//! A new zone gets, based on one snapshot of its records:
//! - an address record `zone -> public IP`, unless the apex already has a record
//! - a wildcard `CNAME *.zone -> zone`, unless one exists
//! - no `www` records
//!
//! Applying the defaults a second time changes nothing.

use tracing::{debug, info};

use super::ZoneEngine;
use crate::error::Result;
use crate::model::{DnsRecord, NewRecord, RecordFilter, RecordType, Zone};
use crate::validate;

/// Record mutations made while applying the default records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapChanges {
    pub created: Vec<DnsRecord>,
    pub deleted: Vec<DnsRecord>,
}

impl BootstrapChanges {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

impl ZoneEngine {
    /// Register `zone_name` with jump-start and apply the default records
    ///
    /// The name is validated before anything is sent. Registering a zone the
    /// account already holds fails with the provider's error.
    pub async fn bootstrap(&self, zone_name: &str) -> Result<Zone> {
        let (zone, _) = self.bootstrap_zone(zone_name).await?;
        Ok(zone)
    }

    pub(super) async fn bootstrap_zone(&self, zone_name: &str) -> Result<(Zone, BootstrapChanges)> {
        validate::domain_name(zone_name)?;

        let zone = self.provider.create_zone(zone_name, true).await?;
        info!("Created zone {} ({})", zone.name, zone.id);
        if zone.name_servers.is_empty() {
            info!("Provider returned no name servers for {}", zone.name);
        } else {
            info!("Name servers: {}", zone.name_servers.join(", "));
        }

        let changes = self.apply_default_records(&zone).await?;
        Ok((zone, changes))
    }

    /// Bring an existing zone's records in line with the defaults
    pub async fn apply_default_records(&self, zone: &Zone) -> Result<BootstrapChanges> {
        let snapshot = self.snapshot_records(&zone.id, &RecordFilter::all()).await?;
        debug!("Zone {} has {} record(s)", zone.name, snapshot.len());

        let wildcard = format!("*.{}", zone.name);
        let www = format!("www.{}", zone.name);
        let mut changes = BootstrapChanges::default();

        if !has_record_named(&snapshot, &zone.name) {
            let ip = self.ip_source.current().await?;
            info!("Creating {} record {} -> {}", RecordType::for_address(&ip), zone.name, ip);
            let record = NewRecord {
                record_type: RecordType::for_address(&ip),
                name: zone.name.clone(),
                content: ip.to_string(),
                ttl: self.settings.ttl,
                proxied: self.settings.proxied,
            };
            changes
                .created
                .push(self.provider.create_record(&zone.id, &record).await?);
        }

        if !has_record_named(&snapshot, &wildcard) {
            info!("Creating CNAME {} -> {}", wildcard, zone.name);
            let record = NewRecord {
                record_type: RecordType::Cname,
                name: wildcard,
                content: zone.name.clone(),
                ttl: self.settings.ttl,
                proxied: self.settings.proxied,
            };
            changes
                .created
                .push(self.provider.create_record(&zone.id, &record).await?);
        }

        for record in snapshot
            .into_iter()
            .filter(|record| record.name == "www" || record.name == www)
        {
            info!("Deleting {}", record);
            self.provider.delete_record(&zone.id, &record.id).await?;
            changes.deleted.push(record);
        }

        Ok(changes)
    }
}

fn has_record_named(records: &[DnsRecord], name: &str) -> bool {
    records.iter().any(|record| record.name == name)
}
