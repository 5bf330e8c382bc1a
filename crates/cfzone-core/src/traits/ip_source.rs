// # IP Source Trait
//
// Defines the interface for discovering the caller's public IP address.
//
// ## Implementations
//
// - HTTP echo services with fallback: `cfzone-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfzone_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//     let ip = source.current().await?;
//     println!("public IP: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public-IP discovery
///
/// Implementations are consulted once per invocation; they do not watch for
/// changes. Comparing against the previous address is the job of the
/// [`IpCache`](crate::traits::IpCache) and the engine.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public IP address
    /// - `Err(Error::NoIpSourceAvailable)`: Every underlying source failed
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Short name for logging
    fn source_name(&self) -> &'static str;
}

/// Fixed address, for callers that already know their IP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticIpSource(pub IpAddr);

#[async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<IpAddr, crate::Error> {
        Ok(self.0)
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
