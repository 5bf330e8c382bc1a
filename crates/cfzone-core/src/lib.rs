// # cfzone-core
//
// Core library for Cloudflare zone bootstrapping and dynamic-DNS reconciliation.
//
// ## Architecture Overview
//
// - **ZoneProvider**: Trait over the provider's zone, record and settings API
// - **IpSource**: Trait for discovering the caller's public IP
// - **IpCache**: Trait for remembering the last applied IP between runs
// - **Paginator**: Lazy single-pass walk over page-based listings
// - **build_patch**: Complete record update payloads from partial changes
// - **ZoneEngine**: Bootstrap, proxy stripping, settings and IP reconciliation
//
// ## Design Principles
//
// 1. **Library-First**: The binary only parses arguments and wires implementations
// 2. **Typed Boundary**: Provider JSON is deserialized into `model` types at the HTTP edge
// 3. **Single Pass**: No retries, no concurrency; the first fatal error stops the run
// 4. **Testable Seams**: Provider, IP source and cache are traits with in-memory stand-ins

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod paginate;
pub mod patch;
pub mod traits;
pub mod validate;

// Re-export core types for convenience
pub use cache::{FileIpCache, MemoryIpCache};
pub use config::AppConfig;
pub use engine::{
    AddZoneReport, BootstrapChanges, DomainWhitelist, EngineSettings, ProxyUpdate,
    ReconcileSummary, SyncOutcome, ZoneEngine,
};
pub use error::{Error, Result};
pub use paginate::{Paginator, paginate};
pub use patch::{RecordChanges, build_patch};
pub use traits::{IpCache, IpSource, StaticIpSource, ZoneProvider};
