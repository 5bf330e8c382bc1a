//! Record update payloads
//!
//! Cloudflare requires `type`, `name`, `content` and `ttl` on every record
//! update, even when only one of them changes. [`build_patch`] completes a
//! sparse [`RecordChanges`] into a full [`RecordPayload`].

use crate::model::{DnsRecord, RecordPayload, RecordType};

/// Fields to change on an existing record; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub record_type: Option<RecordType>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub ttl: Option<u32>,
    pub proxied: Option<bool>,
}

impl RecordChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = Some(proxied);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }
}

/// Overlay `changes` on the mandatory fields of `existing`
pub fn build_patch(existing: &DnsRecord, changes: RecordChanges) -> RecordPayload {
    RecordPayload {
        record_type: changes
            .record_type
            .unwrap_or_else(|| existing.record_type.clone()),
        name: changes.name.unwrap_or_else(|| existing.name.clone()),
        content: changes.content.unwrap_or_else(|| existing.content.clone()),
        ttl: changes.ttl.unwrap_or(existing.ttl),
        proxied: changes.proxied,
    }
}
