// # cfzone - Cloudflare zone tool
//
// Thin integration layer: parses arguments, loads the configuration, wires the
// Cloudflare provider and the HTTP IP source into `ZoneEngine` and prints the
// outcome. All zone and record logic lives in cfzone-core.
//
// ## Usage
//
// ```bash
// export CFZONE_API_TOKEN=your_token
//
// cfzone --add-zone example.com          # register and prepare a zone
// cfzone --update-ip                     # sync records when the public IP changed
// cfzone --update-ip=203.0.113.5         # force records to a given IP
// cfzone --list-zones
// ```
//
// ## Exit Codes
//
// - 0: Success (or no action requested)
// - 1: Configuration or input error, reported before any network call
// - 2: Runtime error (provider, network, cache)

mod cli;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cfzone_core::model::ZoneQuery;
use cfzone_core::{
    AppConfig, DomainWhitelist, EngineSettings, FileIpCache, IpSource, StaticIpSource,
    SyncOutcome, ZoneEngine, validate,
};
use cfzone_ip_http::HttpIpSource;
use cfzone_provider_cloudflare::CloudflareProvider;
use clap::{CommandFactory, Parser};
use std::net::IpAddr;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use cli::{Action, Cli};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum CfzoneExitCode {
    /// Action completed
    Success = 0,
    /// Configuration or input error
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<CfzoneExitCode> for ExitCode {
    fn from(code: CfzoneExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl CfzoneExitCode {
    /// Classify a failed run
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<cfzone_core::Error>() {
            Some(e) if e.is_usage_error() => CfzoneExitCode::ConfigError,
            _ => CfzoneExitCode::RuntimeError,
        }
    }
}

/// IP source for commands that never consult the public IP
struct UnconfiguredIpSource;

#[async_trait]
impl IpSource for UnconfiguredIpSource {
    async fn current(&self) -> cfzone_core::Result<IpAddr> {
        Err(cfzone_core::Error::config(
            "Public IP needed but no IP source URLs configured ([ip] urls)",
        ))
    }

    fn source_name(&self) -> &'static str {
        "unconfigured"
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout carries only results
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfzoneExitCode::ConfigError.into();
    }

    let Some(action) = cli.action() else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print usage: {}", e);
        }
        return CfzoneExitCode::Success.into();
    };

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return CfzoneExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfzoneExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run(action, config)) {
        Ok(()) => CfzoneExitCode::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            CfzoneExitCode::for_error(&e).into()
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Run one action
async fn run(action: Action, config: AppConfig) -> Result<()> {
    let provider = CloudflareProvider::new(config.api.token.clone())?;
    let settings = EngineSettings::from(&config.records);

    match action {
        Action::AddZone(domain) => {
            validate::domain_name(&domain)?;
            // Registration cannot be repeated, so a missing IP source must
            // surface before the zone is created.
            let engine = ZoneEngine::new(Box::new(provider), ip_source(&config)?, settings);

            let report = engine
                .add_zone(&domain)
                .await
                .with_context(|| format!("Adding zone {} failed", domain))?;

            println!("Zone {} added ({})", report.zone.name, report.zone.id);
            for ns in &report.zone.name_servers {
                println!("  name server: {}", ns);
            }
            for record in &report.records.created {
                println!("  created: {}", record);
            }
            for record in &report.records.deleted {
                println!("  deleted: {}", record);
            }
            let failed = report.proxy_updates.iter().filter(|u| !u.succeeded()).count();
            println!(
                "  proxy disabled on {} record(s), {} failed",
                report.proxy_updates.len() - failed,
                failed
            );
        }

        Action::UpdateIp(Some(explicit)) => {
            let ip = validate::ip_address(&explicit)?;
            let whitelist = DomainWhitelist::new(&config.update.domains);
            let engine = ZoneEngine::new(Box::new(provider), Box::new(StaticIpSource(ip)), settings);

            let summary = engine.update_ip(ip, &whitelist).await?;
            println!(
                "Set {} record(s) to {} ({} already up to date)",
                summary.updated, ip, summary.skipped
            );
        }

        Action::UpdateIp(None) => {
            let source = ip_source(&config)?;
            let whitelist = DomainWhitelist::new(&config.update.domains);
            let cache = FileIpCache::new(config.cache_path());
            let engine = ZoneEngine::new(Box::new(provider), source, settings);

            match engine.sync_public_ip(&cache, &whitelist).await? {
                SyncOutcome::Initialized { ip } => {
                    println!("Cached public IP {} (records not changed on first run)", ip);
                }
                SyncOutcome::Unchanged { ip } => {
                    println!("Public IP {} unchanged", ip);
                }
                SyncOutcome::Updated { ip, summary } => {
                    println!(
                        "Public IP changed to {}: {} record(s) updated, {} already up to date",
                        ip, summary.updated, summary.skipped
                    );
                }
            }
        }

        Action::ListZones => {
            let engine = ZoneEngine::new(Box::new(provider), Box::new(UnconfiguredIpSource), settings);
            let zones = engine.list_zones(&ZoneQuery::default()).await?;

            info!("{} zone(s)", zones.len());
            for zone in zones {
                println!(
                    "{}\t{}\t{}\t{}",
                    zone.name,
                    zone.id,
                    zone.status,
                    zone.name_servers.join(",")
                );
            }
        }
    }

    Ok(())
}

/// HTTP IP source over the configured echo URLs
fn ip_source(config: &AppConfig) -> Result<Box<dyn IpSource>> {
    let urls = config.require_ip_urls()?.to_vec();
    let source = HttpIpSource::new(urls, config.ip.timeout())?;
    Ok(Box::new(source))
}
