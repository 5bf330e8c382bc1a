//! Typed provider entities
//!
//! Everything the provider returns is deserialized into these types at the
//! HTTP boundary; nothing untyped travels into the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// A DNS zone registered with the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-issued zone identifier
    pub id: String,
    /// Zone apex, e.g. `example.com`
    pub name: String,
    /// Authoritative name servers assigned by the provider
    #[serde(default)]
    pub name_servers: Vec<String>,
    /// Activation status (`pending`, `active`, ...)
    #[serde(default)]
    pub status: String,
}

/// DNS record type
///
/// Unknown types are kept verbatim in [`RecordType::Other`] so that a record
/// read from the provider can always be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Ns,
    Other(String),
}

impl RecordType {
    /// Address record type matching the family of `ip`
    pub fn for_address(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Other(other) => other,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "TXT" => RecordType::Txt,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            _ => RecordType::Other(value),
        }
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record identifier, unique within its zone
    pub id: String,
    /// Owning zone id (the provider may omit it)
    #[serde(default)]
    pub zone_id: String,
    /// Owning zone name (the provider may omit it)
    #[serde(default)]
    pub zone_name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Fully-qualified name or `@`
    pub name: String,
    pub content: String,
    /// TTL in seconds, `1` meaning "automatic"
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.record_type, self.name, self.content)
    }
}

/// Body of a record create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

/// Full record update payload, as produced by [`crate::patch::build_patch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

/// A single error or informational message from the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Standard response envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
}

/// Result of a record update call
pub type UpdateResponse = ApiResponse<DnsRecord>;

/// Pagination metadata attached to listing responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    #[serde(default)]
    pub result_info: ResultInfo,
}

impl<T> Page<T> {
    pub fn new(result: Vec<T>, page: u32, total_pages: u32) -> Self {
        let count = result.len() as u32;
        Self {
            result,
            result_info: ResultInfo {
                page,
                per_page: count,
                count,
                total_count: 0,
                total_pages,
            },
        }
    }
}

/// Filters for `GET zones`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneQuery {
    pub name: Option<String>,
    pub status: Option<String>,
    pub per_page: u32,
    pub order: Option<String>,
    pub direction: Option<String>,
    /// `all` or `any`
    pub match_mode: String,
}

impl Default for ZoneQuery {
    fn default() -> Self {
        Self {
            name: None,
            status: None,
            per_page: 20,
            order: None,
            direction: None,
            match_mode: "all".to_string(),
        }
    }
}

/// Filters for `GET zones/{id}/dns_records`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub record_type: Option<RecordType>,
    pub name: Option<String>,
    pub content: Option<String>,
}

impl RecordFilter {
    /// Every record in the zone
    pub fn all() -> Self {
        Self::default()
    }

    /// Only records of the given type
    pub fn of_type(record_type: RecordType) -> Self {
        Self {
            record_type: Some(record_type),
            ..Self::default()
        }
    }
}

/// On/off value used by most zone settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    Off,
}

/// Zone-level settings pushed when a zone is added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSetting {
    AutomaticHttpsRewrites(Toggle),
    AlwaysUseHttps(Toggle),
    Minify { css: Toggle, html: Toggle, js: Toggle },
    Brotli(Toggle),
}

impl ZoneSetting {
    /// Setting identifier used in `zones/{id}/settings/{id}`
    pub fn id(&self) -> &'static str {
        match self {
            ZoneSetting::AutomaticHttpsRewrites(_) => "automatic_https_rewrites",
            ZoneSetting::AlwaysUseHttps(_) => "always_use_https",
            ZoneSetting::Minify { .. } => "minify",
            ZoneSetting::Brotli(_) => "brotli",
        }
    }

    /// JSON `value` sent in the PATCH body
    pub fn value(&self) -> serde_json::Value {
        match self {
            ZoneSetting::AutomaticHttpsRewrites(t)
            | ZoneSetting::AlwaysUseHttps(t)
            | ZoneSetting::Brotli(t) => serde_json::json!(t),
            ZoneSetting::Minify { css, html, js } => serde_json::json!({
                "css": css,
                "html": html,
                "js": js,
            }),
        }
    }
}
