// # Cloudflare Zone Provider
//
// This crate implements `ZoneProvider` over the Cloudflare API v4.
//
// ## Behaviour
//
// - One HTTP request per trait call; no retries, no caching, no paging
// - Responses are deserialized into `cfzone_core::model` types here, at the boundary
// - HTTP timeout configured (30 seconds)
// - Non-2xx answers are mapped to typed errors:
//   - 401/403: `Error::Authentication`
//   - 429: `Error::RateLimited`
//   - body with `errors[0]`: `Error::Api` carrying the message verbatim
//   - anything else: `Error::Provider`
// - A 2xx update with `success: false` is handed back to the engine unchanged;
//   for every other call it becomes `Error::ProviderValidation`
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider fails fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Create Zone: POST `/zones`
// - List Zones: GET `/zones?name=...&page=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=...&page=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`
// - Edit Zone Setting: PATCH `/zones/:zone_id/settings/:setting_id`

use async_trait::async_trait;
use cfzone_core::model::{
    ApiMessage, ApiResponse, DnsRecord, NewRecord, Page, RecordFilter, RecordPayload, ResultInfo,
    UpdateResponse, Zone, ZoneQuery, ZoneSetting,
};
use cfzone_core::traits::ZoneProvider;
use cfzone_core::{Error, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider name used in errors and logs
const PROVIDER: &str = "cloudflare";

/// Longest slice of an unstructured error body kept in error messages
const MAX_ERROR_BODY: usize = 200;

/// Listing envelope: `result` plus pagination metadata
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default = "Vec::new")]
    result: Vec<T>,
    #[serde(default)]
    result_info: ResultInfo,
}

/// Just the errors of a failed response
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

/// Cloudflare zone provider
///
/// Stateless apart from the HTTP connection pool; cheap to share behind a
/// reference for the whole run.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API root, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider talking to the public Cloudflare API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Edit and DNS:Edit permissions
    ///
    /// # Errors
    ///
    /// `Error::Config` if the token is empty or the HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a provider against a different API root (tests, proxies)
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Authenticated request builder for `path` (relative to the API root)
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.api_token)
    }

    /// Send a request and deserialize a 2xx body as `T`
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to Cloudflare failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read Cloudflare response: {}", e)))?;

        if !status.is_success() {
            return Err(error_for_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request whose envelope must report success
    async fn execute_checked<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response: ApiResponse<T> = self.execute(request).await?;
        if !response.success {
            return Err(Error::ProviderValidation(response.errors));
        }
        response
            .result
            .ok_or_else(|| Error::provider(PROVIDER, "Response has no result"))
    }

    /// Send a request whose envelope must report success, ignoring `result`
    async fn execute_ack(&self, request: RequestBuilder) -> Result<()> {
        let response: ApiResponse<Value> = self.execute(request).await?;
        if !response.success {
            return Err(Error::ProviderValidation(response.errors));
        }
        Ok(())
    }

    /// Send a listing request and return its page
    async fn execute_list<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Page<T>> {
        let response: ListResponse<T> = self.execute(request).await?;
        if !response.success {
            return Err(Error::ProviderValidation(response.errors));
        }
        Ok(Page {
            result: response.result,
            result_info: response.result_info,
        })
    }
}

/// Map a non-2xx response to an error
fn error_for_status(status: StatusCode, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions (HTTP {})",
            status
        )),
        429 => Error::rate_limited(format!(
            "Cloudflare rate limit exceeded (HTTP {})",
            status
        )),
        code => {
            let first = serde_json::from_str::<ErrorBody>(body)
                .unwrap_or_default()
                .errors
                .into_iter()
                .next();
            match first {
                Some(message) => Error::api(PROVIDER, code, Some(message.code), message.message),
                None => Error::provider(
                    PROVIDER,
                    format!("HTTP {}: {}", status, truncate(body.trim(), MAX_ERROR_BODY)),
                ),
            }
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[async_trait]
impl ZoneProvider for CloudflareProvider {
    async fn create_zone(&self, name: &str, jump_start: bool) -> Result<Zone> {
        tracing::debug!("Creating zone {} (jump_start={})", name, jump_start);
        let request = self
            .request(Method::POST, "zones")
            .json(&json!({ "name": name, "jump_start": jump_start }));
        self.execute_checked(request).await
    }

    async fn list_zones(&self, query: &ZoneQuery, page: u32) -> Result<Page<Zone>> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", query.per_page.to_string()),
            ("match", query.match_mode.clone()),
        ];
        let optional = [
            ("name", &query.name),
            ("status", &query.status),
            ("order", &query.order),
            ("direction", &query.direction),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.push((key, value.clone()));
            }
        }

        tracing::trace!("Listing zones, page {}", page);
        let request = self.request(Method::GET, "zones").query(&params);
        self.execute_list(request).await
    }

    async fn list_records(
        &self,
        zone_id: &str,
        filter: &RecordFilter,
        page: u32,
    ) -> Result<Page<DnsRecord>> {
        let mut params: Vec<(&str, String)> = vec![("page", page.to_string())];
        if let Some(record_type) = &filter.record_type {
            params.push(("type", record_type.to_string()));
        }
        if let Some(name) = &filter.name {
            params.push(("name", name.clone()));
        }
        if let Some(content) = &filter.content {
            params.push(("content", content.clone()));
        }

        tracing::trace!("Listing records of zone {}, page {}", zone_id, page);
        let request = self
            .request(Method::GET, &format!("zones/{}/dns_records", zone_id))
            .query(&params);
        self.execute_list(request).await
    }

    async fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<DnsRecord> {
        let request = self
            .request(Method::POST, &format!("zones/{}/dns_records", zone_id))
            .json(record);
        self.execute_checked(request).await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<UpdateResponse> {
        let request = self
            .request(
                Method::PATCH,
                &format!("zones/{}/dns_records/{}", zone_id, record_id),
            )
            .json(payload);
        self.execute(request).await
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let request = self.request(
            Method::DELETE,
            &format!("zones/{}/dns_records/{}", zone_id, record_id),
        );
        self.execute_ack(request).await
    }

    async fn update_setting(&self, zone_id: &str, setting: ZoneSetting) -> Result<()> {
        let request = self
            .request(
                Method::PATCH,
                &format!("zones/{}/settings/{}", zone_id, setting.id()),
            )
            .json(&json!({ "value": setting.value() }));
        self.execute_ack(request).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
