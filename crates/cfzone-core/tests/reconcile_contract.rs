//! Contract Test: IP Reconciliation
//!
//! Constraints verified:
//! - Only whitelisted address records are patched, with content = IP and TTL 60
//! - Every page of zones and records is walked exactly once
//! - A zone's records are listed in full before the first patch
//! - "Record already exists." is skipped; any other error stops processing
//! - A `success: false` response is fatal and carries the provider's errors

mod common;

use cfzone_core::model::{RecordPayload, RecordType, ZoneQuery};
use cfzone_core::{DomainWhitelist, EngineSettings, Error, StaticIpSource, ZoneEngine};
use common::*;
use tokio_test::{assert_err, assert_ok};

fn whitelist(names: &[&str]) -> DomainWhitelist {
    names.iter().collect()
}

#[tokio::test]
async fn only_whitelisted_records_are_patched() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    let apex = provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);
    let api = provider.add_record("z1", RecordType::A, "api.example.com", "198.51.100.1", true);
    provider.add_record("z1", RecordType::A, "mail.example.com", "198.51.100.1", false);
    provider.add_record("z1", RecordType::Cname, "www.example.com", "example.com", false);

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let summary = assert_ok!(
        engine
            .update_ip(ip("203.0.113.5"), &whitelist(&["example.com", "api.example.com"]))
            .await
    );

    assert_eq!(summary.updated, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(
        provider.updates(),
        vec![
            (
                apex,
                RecordPayload {
                    record_type: RecordType::A,
                    name: "example.com".to_string(),
                    content: "203.0.113.5".to_string(),
                    ttl: 60,
                    proxied: None,
                }
            ),
            (
                api,
                RecordPayload {
                    record_type: RecordType::A,
                    name: "api.example.com".to_string(),
                    content: "203.0.113.5".to_string(),
                    ttl: 60,
                    proxied: None,
                }
            ),
        ]
    );
}

#[tokio::test]
async fn walks_every_page_of_every_zone() {
    let provider = FakeZoneProvider::with_page_size(1);
    provider.add_zone("z1", "example.com");
    provider.add_zone("z2", "example.net");
    provider.add_zone("z3", "example.org");
    provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);
    provider.add_record("z1", RecordType::A, "a.example.com", "198.51.100.1", false);
    provider.add_record("z3", RecordType::A, "example.org", "198.51.100.1", false);

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let summary = assert_ok!(
        engine
            .update_ip(
                ip("203.0.113.5"),
                &whitelist(&["example.com", "a.example.com", "example.org"])
            )
            .await
    );

    assert_eq!(summary.zones, 3);
    assert_eq!(summary.updated, 3);

    let zone_pages: Vec<u32> = provider
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::ListZones { page } => Some(page),
            _ => None,
        })
        .collect();
    assert_eq!(zone_pages, vec![1, 2, 3]);

    let z1_pages: Vec<u32> = provider
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::ListRecords { zone_id, page } if zone_id == "z1" => Some(page),
            _ => None,
        })
        .collect();
    assert_eq!(z1_pages, vec![1, 2]);
}

#[tokio::test]
async fn records_reordered_by_updates_are_each_patched_once() {
    let provider = FakeZoneProvider::with_page_size(1);
    provider.order_records_by_content();
    provider.add_zone("z1", "example.com");
    let apex = provider.add_record("z1", RecordType::A, "example.com", "1.1.1.1", false);
    let api = provider.add_record("z1", RecordType::A, "api.example.com", "1.1.1.1", false);

    let engine = engine_with(&provider, &CountingIpSource::new(ip("9.9.9.9")));
    let summary = assert_ok!(
        engine
            .update_ip(ip("9.9.9.9"), &whitelist(&["example.com", "api.example.com"]))
            .await
    );

    assert_eq!(summary.updated, 2);
    let patched: Vec<String> = provider.updates().into_iter().map(|(id, _)| id).collect();
    assert_eq!(patched, vec![apex, api]);
    assert!(provider.records("z1").iter().all(|r| r.content == "9.9.9.9"));
}

#[tokio::test]
async fn ipv6_reconciles_aaaa_records_only() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);
    let v6 = provider.add_record("z1", RecordType::Aaaa, "example.com", "2001:db8::1", false);

    let engine = engine_with(&provider, &CountingIpSource::new(ip("2001:db8::5")));
    let summary = assert_ok!(
        engine
            .update_ip(ip("2001:db8::5"), &whitelist(&["example.com"]))
            .await
    );

    assert_eq!(summary.updated, 1);
    let updates = provider.updates();
    assert_eq!(updates[0].0, v6);
    assert_eq!(updates[0].1.content, "2001:db8::5");
}

#[tokio::test]
async fn already_existing_record_is_skipped_and_processing_continues() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    let first = provider.add_record("z1", RecordType::A, "example.com", "203.0.113.5", false);
    let second = provider.add_record("z1", RecordType::A, "api.example.com", "198.51.100.1", false);
    provider.fail_update(&first, UpdateFailure::AlreadyExists);

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let summary = assert_ok!(
        engine
            .update_ip(ip("203.0.113.5"), &whitelist(&["example.com", "api.example.com"]))
            .await
    );

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 1);
    let patched: Vec<String> = provider.updates().into_iter().map(|(id, _)| id).collect();
    assert_eq!(patched, vec![first, second]);
}

#[tokio::test]
async fn other_api_error_aborts_before_later_records() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    provider.add_zone("z2", "example.net");
    let first = provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);
    provider.add_record("z1", RecordType::A, "api.example.com", "198.51.100.1", false);
    provider.add_record("z2", RecordType::A, "example.net", "198.51.100.1", false);
    provider.fail_update(&first, UpdateFailure::Api("Invalid TTL.".to_string()));

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let err = assert_err!(
        engine
            .update_ip(
                ip("203.0.113.5"),
                &whitelist(&["example.com", "api.example.com", "example.net"])
            )
            .await
    );

    assert!(matches!(err, Error::Api { ref message, .. } if message == "Invalid TTL."));
    assert!(!err.is_record_already_exists());
    assert_eq!(provider.updates().len(), 1);
    assert!(
        !provider
            .calls()
            .iter()
            .any(|call| matches!(call, Call::ListRecords { zone_id, .. } if zone_id == "z2"))
    );
}

#[tokio::test]
async fn unsuccessful_response_is_fatal_validation_error() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    let first = provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);
    provider.add_record("z1", RecordType::A, "api.example.com", "198.51.100.1", false);
    provider.fail_update(&first, UpdateFailure::Rejected("content is invalid".to_string()));

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let err = assert_err!(
        engine
            .update_ip(ip("203.0.113.5"), &whitelist(&["example.com", "api.example.com"]))
            .await
    );

    match err {
        Error::ProviderValidation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "content is invalid");
        }
        other => panic!("expected ProviderValidation, got {other:?}"),
    }
    assert_eq!(provider.updates().len(), 1);
}

#[tokio::test]
async fn empty_whitelist_patches_nothing() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let summary = assert_ok!(
        engine
            .update_ip(ip("203.0.113.5"), &DomainWhitelist::default())
            .await
    );

    assert_eq!(summary.updated, 0);
    assert!(provider.mutations().is_empty());
}

#[tokio::test]
async fn explicit_address_reconciles_through_static_source() {
    let provider = FakeZoneProvider::new();
    provider.add_zone("z1", "example.com");
    provider.add_record("z1", RecordType::A, "example.com", "198.51.100.1", false);

    let address = ip("203.0.113.9");
    let engine = ZoneEngine::new(
        Box::new(provider.clone()),
        Box::new(StaticIpSource(address)),
        EngineSettings::default(),
    );
    let summary = assert_ok!(engine.update_ip(address, &whitelist(&["example.com"])).await);

    assert_eq!(summary.updated, 1);
    assert_eq!(provider.records("z1")[0].content, "203.0.113.9");
}

#[tokio::test]
async fn list_zones_drains_all_pages() {
    let provider = FakeZoneProvider::with_page_size(2);
    for (id, name) in [("z1", "a.com"), ("z2", "b.com"), ("z3", "c.com")] {
        provider.add_zone(id, name);
    }

    let engine = engine_with(&provider, &CountingIpSource::new(ip("203.0.113.5")));
    let zones = assert_ok!(engine.list_zones(&ZoneQuery::default()).await);

    let names: Vec<_> = zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, ["a.com", "b.com", "c.com"]);
    assert_eq!(provider.calls().len(), 2);
}
