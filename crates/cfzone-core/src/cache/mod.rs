// # IP Cache Implementations
//
// This module provides implementations of the IpCache trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::{FileIpCache, default_cache_path};
pub use memory::MemoryIpCache;
