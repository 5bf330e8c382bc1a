//! Configuration types for cfzone
//!
//! The configuration lives in a TOML file with four sections:
//!
//! ```toml
//! [api]
//! token = "..."
//!
//! [ip]
//! urls = ["https://api.ipify.org", "https://icanhazip.com"]
//! timeout_secs = 10
//!
//! [update]
//! domains = ["example.com", "api.example.com"]
//! cache = "/tmp/.current-ip"
//!
//! [records]
//! ttl = 60
//! proxied = false
//! ```
//!
//! Every section is optional at parse time; [`AppConfig::validate`] and the
//! `require_*` accessors decide what a given command actually needs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::default_cache_path;

/// Environment variable that overrides `[api] token`
pub const TOKEN_ENV: &str = "CFZONE_API_TOKEN";

/// Main cfzone configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Public-IP echo services
    #[serde(default)]
    pub ip: IpConfig,

    /// Dynamic-DNS update targets
    #[serde(default)]
    pub update: UpdateConfig,

    /// Defaults for records the engine creates or rewrites
    #[serde(default)]
    pub records: RecordDefaults,
}

impl AppConfig {
    /// Load and validate a configuration file
    ///
    /// The API token from [`TOKEN_ENV`] takes precedence over the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_toml(&raw)?;
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            config.api.token = token;
        }

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text without validating it
    pub fn from_toml(raw: &str) -> Result<Self, crate::Error> {
        toml::from_str(raw).map_err(|e| crate::Error::config(format!("Invalid config: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.api.validate()?;
        self.ip.validate()?;
        self.records.validate()?;

        for domain in &self.update.domains {
            crate::validate::record_name(domain)
                .map_err(|e| crate::Error::config(format!("[update] domains: {}", e)))?;
        }

        Ok(())
    }

    /// IP echo URLs, failing when none are configured
    pub fn require_ip_urls(&self) -> Result<&[String], crate::Error> {
        if self.ip.urls.is_empty() {
            return Err(crate::Error::config(
                "No IP source URLs configured ([ip] urls)",
            ));
        }
        Ok(&self.ip.urls)
    }

    /// Path of the IP change cache
    pub fn cache_path(&self) -> PathBuf {
        self.update
            .cache
            .clone()
            .unwrap_or_else(default_cache_path)
    }
}

/// `[api]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Cloudflare API token
    #[serde(default)]
    pub token: String,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.token.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "API token is missing (set [api] token or {})",
                TOKEN_ENV
            )));
        }
        Ok(())
    }
}

/// `[ip]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpConfig {
    /// Echo services returning the caller's address as plain text
    #[serde(default)]
    pub urls: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_ip_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpConfig {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("[ip] timeout_secs must be > 0"));
        }
        if self.urls.iter().any(|url| url.trim().is_empty()) {
            return Err(crate::Error::config("[ip] urls cannot contain empty entries"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IpConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            timeout_secs: default_ip_timeout_secs(),
        }
    }
}

/// `[update]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Whitelisted record names rewritten by `--update-ip`
    #[serde(default)]
    pub domains: Vec<String>,

    /// Cache file path, defaults to `.current-ip` in the temp directory
    #[serde(default)]
    pub cache: Option<PathBuf>,
}

/// `[records]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDefaults {
    /// TTL applied to created and reconciled address records
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Proxy flag for created records
    #[serde(default)]
    pub proxied: bool,
}

impl RecordDefaults {
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.ttl == 0 {
            return Err(crate::Error::config("[records] ttl must be > 0"));
        }
        Ok(())
    }
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            proxied: false,
        }
    }
}

fn default_ttl() -> u32 {
    60
}

fn default_ip_timeout_secs() -> u64 {
    10
}
