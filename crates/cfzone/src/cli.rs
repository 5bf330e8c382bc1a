//! Command-line interface

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Cloudflare zone bootstrap and dynamic DNS
#[derive(Parser, Debug)]
#[command(name = "cfzone")]
#[command(version)]
#[command(about = "Bootstrap Cloudflare zones and keep address records on your public IP", long_about = None)]
#[command(group(ArgGroup::new("action").args(["add_zone", "update_ip", "list_zones"])))]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, env = "CFZONE_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Register a zone, create default records, disable proxying and apply settings
    #[arg(long, value_name = "DOMAIN")]
    pub add_zone: Option<String>,

    /// Point whitelisted records at IP, or at the detected public IP when it changed
    #[arg(long, value_name = "IP", num_args = 0..=1, require_equals = true)]
    pub update_ip: Option<Option<String>>,

    /// List zones visible to the API token
    #[arg(long)]
    pub list_zones: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CFZONE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddZone(String),
    /// `None` detects the public IP and consults the cache
    UpdateIp(Option<String>),
    ListZones,
}

impl Cli {
    /// The requested action, `None` when no action flag was given
    pub fn action(&self) -> Option<Action> {
        if let Some(domain) = &self.add_zone {
            return Some(Action::AddZone(domain.clone()));
        }
        if let Some(ip) = &self.update_ip {
            return Some(Action::UpdateIp(ip.clone()));
        }
        if self.list_zones {
            return Some(Action::ListZones);
        }
        None
    }
}
