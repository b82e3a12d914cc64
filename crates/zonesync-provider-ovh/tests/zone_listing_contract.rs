//! Contract Test: Zone Directory
//!
//! Constraints verified:
//! - Zones come back in the order of the remote listing
//! - NS records below the apex become forwarded names, apex NS records do not
//! - One failing zone fails the whole listing, no partial result
//!
//! If this test fails, delegation decisions upstream work on a wrong inventory.

mod common;

use common::*;
use zonesync_core::{DnsHandler, Error, RequestType};

#[tokio::test]
async fn zones_listed_in_remote_order_with_forwarded_names() {
    let api = FakeOvhApi::new()
        .with_zone("zeta.com")
        .with_zone("alpha.com");
    api.add_record("zeta.com", "", "NS", "dns1.ovh.net.", 0);
    api.add_record("zeta.com", "lab", "NS", "ns1.lab.example.net.", 0);
    api.add_record("zeta.com", "lab", "NS", "ns2.lab.example.net.", 0);
    api.add_record("zeta.com", "www", "A", "1.2.3.4", 300);
    api.add_record("alpha.com", "", "NS", "dns1.ovh.net.", 0);

    let h = Harness::start(api).await;
    let zones = h.handler.get_zones().await.expect("listing succeeds");

    let names: Vec<&str> = zones.iter().map(|z| z.id.as_str()).collect();
    assert_eq!(names, vec!["zeta.com", "alpha.com"]);

    assert_eq!(zones[0].forwarded_domains, vec!["lab.zeta.com"]);
    assert!(zones[0].is_forwarded("host.lab.zeta.com"));
    assert!(zones[1].forwarded_domains.is_empty());

    assert!(zones.iter().all(|z| !z.is_private));
    assert!(zones.iter().all(|z| z.provider_type == "ovh"));
    assert_eq!(zones[0].name_servers, vec!["dns1.ovh.net", "ns1.ovh.net"]);
}

#[tokio::test]
async fn listing_is_rate_limited_and_counted_per_zone() {
    let api = FakeOvhApi::new().with_zone("example.com");
    api.add_record("example.com", "", "NS", "dns1.ovh.net.", 0);
    api.add_record("example.com", "", "NS", "ns1.ovh.net.", 0);

    let h = Harness::start(api).await;
    h.handler.get_zones().await.expect("listing succeeds");

    // zone list + zone info
    assert_eq!(h.counters.total(RequestType::ListZones), 2);
    // NS id listing + two record fetches
    assert_eq!(h.counters.get("example.com", RequestType::ListRecords), 3);
    assert_eq!(h.api.count_path("GET", "/record"), 1);
}

#[tokio::test]
async fn one_failing_ns_lookup_fails_the_whole_listing() {
    let api = FakeOvhApi::new()
        .with_zone("a.com")
        .with_zone("b.com")
        .with_zone("c.com");
    api.fail("GET", "/domain/zone/b.com/record");

    let h = Harness::start(api).await;
    let result = h.handler.get_zones().await;

    let err = result.expect_err("listing must fail");
    assert!(matches!(err, Error::Listing { .. }));
    assert!(err.to_string().contains("b.com"));
    assert!(err.is_remote());

    // c.com is never reached
    assert_eq!(h.api.count_path("GET", "/domain/zone/c.com"), 0);
}

#[tokio::test]
async fn failing_zone_list_is_wrapped() {
    let api = FakeOvhApi::new().with_zone("a.com");
    api.fail("GET", "/domain/zone");

    let h = Harness::start(api).await;
    let err = h.handler.get_zones().await.expect_err("listing must fail");
    assert!(err.to_string().contains("listing DNS zones failed"));
    assert!(err.to_string().contains("GET /domain/zone"));
}
