//! Test doubles and common utilities for engine contract tests
//!
//! `FakeZoneProvider` keeps zones and records in memory, pages listings like
//! the real API and records every call so tests can assert on exactly which
//! requests the engine made.

#![allow(dead_code)]

use async_trait::async_trait;
use cfzone_core::error::{Error, Result};
use cfzone_core::model::{
    ApiMessage, ApiResponse, DnsRecord, NewRecord, Page, RecordFilter, RecordPayload, RecordType,
    UpdateResponse, Zone, ZoneQuery, ZoneSetting,
};
use cfzone_core::{EngineSettings, IpSource, ZoneEngine, ZoneProvider};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider request observed by the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateZone { name: String, jump_start: bool },
    ListZones { page: u32 },
    ListRecords { zone_id: String, page: u32 },
    CreateRecord { zone_id: String, record: NewRecord },
    UpdateRecord { zone_id: String, record_id: String, payload: RecordPayload },
    DeleteRecord { zone_id: String, record_id: String },
    UpdateSetting { zone_id: String, setting: ZoneSetting },
}

impl Call {
    /// Whether this call changes provider state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::ListZones { .. } | Call::ListRecords { .. })
    }
}

/// How an update of a given record should fail
#[derive(Debug, Clone)]
pub enum UpdateFailure {
    /// HTTP 400 with "Record already exists."
    AlreadyExists,
    /// HTTP 200 with `success: false`
    Rejected(String),
    /// HTTP 400 with an arbitrary message
    Api(String),
}

#[derive(Debug, Default)]
struct FakeState {
    zones: Vec<Zone>,
    records: HashMap<String, Vec<DnsRecord>>,
    calls: Vec<Call>,
    update_failures: HashMap<String, UpdateFailure>,
    fail_settings: bool,
    records_by_content: bool,
    next_id: usize,
}

/// In-memory provider; clones share state
#[derive(Debug, Clone)]
pub struct FakeZoneProvider {
    state: Arc<Mutex<FakeState>>,
    page_size: usize,
}

impl Default for FakeZoneProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeZoneProvider {
    pub fn new() -> Self {
        Self::with_page_size(100)
    }

    /// Listings return at most `page_size` items per page
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            page_size,
        }
    }

    /// Add an existing zone
    pub fn add_zone(&self, id: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.zones.push(Zone {
            id: id.to_string(),
            name: name.to_string(),
            name_servers: vec![],
            status: "active".to_string(),
        });
        state.records.entry(id.to_string()).or_default();
    }

    /// Add an existing record and return its id
    pub fn add_record(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name: &str,
        content: &str,
        proxied: bool,
    ) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("rec-{}", state.next_id);
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(DnsRecord {
                id: id.clone(),
                zone_id: zone_id.to_string(),
                zone_name: String::new(),
                record_type,
                name: name.to_string(),
                content: content.to_string(),
                ttl: 300,
                proxied,
            });
        id
    }

    /// Make every update of `record_id` fail
    pub fn fail_update(&self, record_id: &str, failure: UpdateFailure) {
        self.state
            .lock()
            .unwrap()
            .update_failures
            .insert(record_id.to_string(), failure);
    }

    /// List records sorted by content, so updates move records between pages
    pub fn order_records_by_content(&self) {
        self.state.lock().unwrap().records_by_content = true;
    }

    /// Make every settings update fail
    pub fn fail_settings(&self) {
        self.state.lock().unwrap().fail_settings = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    /// `(record_id, payload)` of every update call, in order
    pub fn updates(&self) -> Vec<(String, RecordPayload)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateRecord {
                    record_id, payload, ..
                } => Some((record_id, payload)),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> Vec<NewRecord> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateRecord { record, .. } => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteRecord { record_id, .. } => Some(record_id),
                _ => None,
            })
            .collect()
    }

    pub fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn zone_by_name(&self, name: &str) -> Option<Zone> {
        self.state
            .lock()
            .unwrap()
            .zones
            .iter()
            .find(|zone| zone.name == name)
            .cloned()
    }

    fn page_of<T: Clone>(&self, items: &[T], page: u32) -> Page<T> {
        let total_pages = items.len().div_ceil(self.page_size) as u32;
        let start = (page.saturating_sub(1) as usize) * self.page_size;
        let result = items
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        Page::new(result, page, total_pages)
    }
}

fn api_error(message: &str) -> Error {
    Error::api("fake", 400, Some(81057), message)
}

#[async_trait]
impl ZoneProvider for FakeZoneProvider {
    async fn create_zone(&self, name: &str, jump_start: bool) -> Result<Zone> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateZone {
            name: name.to_string(),
            jump_start,
        });

        if state.zones.iter().any(|zone| zone.name == name) {
            return Err(Error::api(
                "fake",
                400,
                Some(1061),
                format!("{} already exists", name),
            ));
        }

        state.next_id += 1;
        let zone = Zone {
            id: format!("zone-{}", state.next_id),
            name: name.to_string(),
            name_servers: vec![
                "ada.ns.cloudflare.com".to_string(),
                "bob.ns.cloudflare.com".to_string(),
            ],
            status: "pending".to_string(),
        };
        state.zones.push(zone.clone());
        state.records.entry(zone.id.clone()).or_default();
        Ok(zone)
    }

    async fn list_zones(&self, query: &ZoneQuery, page: u32) -> Result<Page<Zone>> {
        let zones: Vec<Zone> = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::ListZones { page });
            state
                .zones
                .iter()
                .filter(|zone| query.name.as_ref().is_none_or(|name| &zone.name == name))
                .cloned()
                .collect()
        };
        Ok(self.page_of(&zones, page))
    }

    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
        page: u32,
    ) -> Result<Page<DnsRecord>> {
        let records: Vec<DnsRecord> = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::ListRecords {
                zone_id: zone_id.to_string(),
                page,
            });
            let by_content = state.records_by_content;
            let mut records: Vec<DnsRecord> = state
                .records
                .get(zone_id)
                .map(|records| {
                    records
                        .iter()
                        .filter(|r| filter.record_type.as_ref().is_none_or(|t| &r.record_type == t))
                        .filter(|r| filter.name.as_ref().is_none_or(|n| &r.name == n))
                        .filter(|r| filter.content.as_ref().is_none_or(|c| &r.content == c))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            if by_content {
                records.sort_by(|a, b| a.content.cmp(&b.content));
            }
            records
        };
        Ok(self.page_of(&records, page))
    }

    async fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<DnsRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateRecord {
            zone_id: zone_id.to_string(),
            record: record.clone(),
        });

        state.next_id += 1;
        let created = DnsRecord {
            id: format!("rec-{}", state.next_id),
            zone_id: zone_id.to_string(),
            zone_name: String::new(),
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
            ttl: record.ttl,
            proxied: record.proxied,
        };
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<UpdateResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateRecord {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            payload: payload.clone(),
        });

        match state.update_failures.get(record_id).cloned() {
            Some(UpdateFailure::AlreadyExists) => return Err(api_error("Record already exists.")),
            Some(UpdateFailure::Api(message)) => return Err(api_error(&message)),
            Some(UpdateFailure::Rejected(message)) => {
                return Ok(ApiResponse {
                    success: false,
                    errors: vec![ApiMessage {
                        code: 9000,
                        message,
                    }],
                    messages: vec![],
                    result: None,
                });
            }
            None => {}
        }

        let record = state
            .records
            .get_mut(zone_id)
            .and_then(|records| records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| Error::api("fake", 404, Some(81044), "Record does not exist."))?;

        record.record_type = payload.record_type.clone();
        record.name = payload.name.clone();
        record.content = payload.content.clone();
        record.ttl = payload.ttl;
        if let Some(proxied) = payload.proxied {
            record.proxied = proxied;
        }

        Ok(ApiResponse {
            success: true,
            errors: vec![],
            messages: vec![],
            result: Some(record.clone()),
        })
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteRecord {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
        });
        if let Some(records) = state.records.get_mut(zone_id) {
            records.retain(|r| r.id != record_id);
        }
        Ok(())
    }

    async fn update_setting(&self, zone_id: &str, setting: ZoneSetting) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateSetting {
            zone_id: zone_id.to_string(),
            setting,
        });
        if state.fail_settings {
            return Err(api_error("Setting is read-only."));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// An IpSource that counts how often it is consulted
#[derive(Debug, Clone)]
pub struct CountingIpSource {
    ip: IpAddr,
    calls: Arc<AtomicUsize>,
}

impl CountingIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for CountingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

/// An IpSource whose every lookup fails
pub struct UnavailableIpSource;

#[async_trait]
impl IpSource for UnavailableIpSource {
    async fn current(&self) -> Result<IpAddr> {
        Err(Error::NoIpSourceAvailable { attempted: 2 })
    }

    fn source_name(&self) -> &'static str {
        "unavailable"
    }
}

/// Engine over a shared fake provider and a counting IP source
pub fn engine_with(provider: &FakeZoneProvider, ip_source: &CountingIpSource) -> ZoneEngine {
    ZoneEngine::new(
        Box::new(provider.clone()),
        Box::new(ip_source.clone()),
        EngineSettings::default(),
    )
}

pub fn ip(value: &str) -> IpAddr {
    value.parse().unwrap()
}
