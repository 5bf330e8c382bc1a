//! Core traits for cfzone
//!
//! This module defines the seams between the engine and the outside world.
//!
//! - [`IpSource`]: Discover the caller's public IP address
//! - [`ZoneProvider`]: Zone and DNS record operations on the provider API
//! - [`IpCache`]: Persist the last applied public IP between invocations

pub mod ip_cache;
pub mod ip_source;
pub mod zone_provider;

pub use ip_cache::IpCache;
pub use ip_source::{IpSource, StaticIpSource};
pub use zone_provider::ZoneProvider;
