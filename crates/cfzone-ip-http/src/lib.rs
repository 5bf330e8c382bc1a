// # HTTP IP Source
//
// This crate provides the public-IP resolver for cfzone.
//
// ## Architecture
//
// Asks plain-text echo services (e.g., api.ipify.org, icanhazip.com) for the
// caller's address. The configured URLs are tried in a random order so that
// load spreads across services; the first body that parses as an IPv4 or
// IPv6 address wins. A failing service is logged and the next one is tried.
//
// Each URL gets exactly one attempt per lookup. When every URL failed the
// lookup ends with `Error::NoIpSourceAvailable`.

use cfzone_core::traits::IpSource;
use cfzone_core::{Error, Result};

use rand::seq::SliceRandom;
use std::net::IpAddr;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Public IP resolver over HTTP echo services
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// Echo service URLs, tried in random order
    urls: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `urls`: Echo services returning the caller's IP as the response body
    /// - `timeout`: Per-request timeout
    ///
    /// # Errors
    ///
    /// `Error::Config` when `urls` is empty or the HTTP client cannot be built.
    pub fn new(urls: Vec<String>, timeout: Duration) -> Result<Self> {
        if urls.is_empty() {
            return Err(Error::config("At least one IP source URL is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cfzone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { urls, client })
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Fetch and parse one service's answer
    async fn fetch_ip(&self, url: &str) -> Result<IpAddr> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "{} answered with HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", url, e)))?;

        let ip_text = body.trim();
        ip_text
            .parse()
            .map_err(|_| Error::http(format!("{} returned an invalid IP address: {:?}", url, ip_text)))
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let mut order: Vec<&str> = self.urls.iter().map(String::as_str).collect();
        order.shuffle(&mut rand::thread_rng());

        for url in &order {
            match self.fetch_ip(url).await {
                Ok(ip) => {
                    tracing::debug!("Resolved public IP {} via {}", ip, url);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("IP source failed, trying next: {}", e);
                }
            }
        }

        Err(Error::NoIpSourceAvailable {
            attempted: order.len(),
        })
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
