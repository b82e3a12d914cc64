//! Test doubles for the handler contract tests
//!
//! [`FakeOvhApi`] is an in-process stand-in for the `/domain/zone` API
//! served by wiremock. It keeps a mutable record table per zone, logs every
//! call and can be told to fail specific calls.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use zonesync_core::metrics::CallCounters;
use zonesync_core::ratelimit::Unlimited;
use zonesync_core::{
    ChangeRequest, Error, HandlerConfig, HandlerContext, HostedZone, ProviderConfig, ZoneCache,
};
use zonesync_provider_ovh::{OvhHandler, RecordInfo};

/// Version prefix the fake serves under
const API_PREFIX: &str = "/1.0";

#[derive(Default)]
struct FakeState {
    zones: Vec<String>,
    records: BTreeMap<String, BTreeMap<u64, RecordInfo>>,
    next_id: u64,
    failures: HashSet<(String, String)>,
    calls: Vec<(String, String)>,
}

/// In-memory OVHcloud DNS API
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct FakeOvhApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeOvhApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Add an empty zone
    pub fn with_zone(self, zone: &str) -> Self {
        {
            let mut state = self.lock();
            state.zones.push(zone.to_string());
            state.records.entry(zone.to_string()).or_default();
        }
        self
    }

    /// Add a record and return its id
    pub fn add_record(&self, zone: &str, sub_domain: &str, field_type: &str, target: &str, ttl: u32) -> u64 {
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.records.entry(zone.to_string()).or_default().insert(
            id,
            RecordInfo {
                id,
                zone: zone.to_string(),
                sub_domain: sub_domain.to_string(),
                field_type: field_type.to_string(),
                target: target.to_string(),
                ttl,
            },
        );
        id
    }

    /// Make every call of `method` on `path` fail with HTTP 500
    ///
    /// `path` excludes the version prefix and the query string.
    pub fn fail(&self, method: &str, path: &str) {
        self.lock()
            .failures
            .insert((method.to_string(), path.to_string()));
    }

    /// Current records of a zone
    pub fn records(&self, zone: &str) -> Vec<RecordInfo> {
        self.lock()
            .records
            .get(zone)
            .map(|r| r.values().cloned().collect())
            .unwrap_or_default()
    }

    /// All calls so far as (method, path)
    pub fn calls(&self) -> Vec<(String, String)> {
        self.lock().calls.clone()
    }

    /// Number of calls of a method
    pub fn count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|(m, _)| m == method).count()
    }

    /// Number of calls of a method on paths ending with `suffix`
    pub fn count_path(&self, method: &str, suffix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|(m, p)| m == method && p.ends_with(suffix))
            .count()
    }

    /// Number of write calls (POST record, PUT, DELETE)
    pub fn writes(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|(m, p)| match m.as_str() {
                "POST" => p.ends_with("/record"),
                "PUT" | "DELETE" => true,
                _ => false,
            })
            .count()
    }

    /// Forget the call log
    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    /// Serve the fake on a fresh mock server
    pub async fn start(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "message": message }))
}

impl Respond for FakeOvhApi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.as_str().to_string();
        let path = request
            .url
            .path()
            .strip_prefix(API_PREFIX)
            .unwrap_or(request.url.path())
            .to_string();

        let mut state = self.lock();
        state.calls.push((method.clone(), path.clone()));

        let signed = request
            .headers
            .get("X-Ovh-Signature")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("$1$"));
        if !signed || !request.headers.contains_key("X-Ovh-Application") {
            return error(401, "This call has not been granted");
        }

        if state.failures.contains(&(method.clone(), path.clone())) {
            return error(500, "injected failure");
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["domain", "zone"]) => ResponseTemplate::new(200).set_body_json(&state.zones),

            ("GET", ["domain", "zone", zone]) => {
                if !state.records.contains_key(*zone) {
                    return error(404, "zone not found");
                }
                ResponseTemplate::new(200).set_body_json(json!({
                    "name": zone,
                    "nameServers": ["dns1.ovh.net", "ns1.ovh.net"],
                    "dnssecSupported": true,
                    "hasDnsAnycast": false,
                    "lastUpdate": "2024-01-01T00:00:00+01:00"
                }))
            }

            ("GET", ["domain", "zone", zone, "record"]) => {
                let mut field_type = None;
                let mut sub_domain = None;
                for (key, value) in request.url.query_pairs() {
                    match key.as_ref() {
                        "fieldType" => field_type = Some(value.to_string()),
                        "subDomain" => sub_domain = Some(value.to_string()),
                        _ => {}
                    }
                }
                let Some(records) = state.records.get(*zone) else {
                    return error(404, "zone not found");
                };
                let ids: Vec<u64> = records
                    .values()
                    .filter(|r| field_type.as_deref().is_none_or(|t| r.field_type == t))
                    .filter(|r| sub_domain.as_deref().is_none_or(|s| r.sub_domain == s))
                    .map(|r| r.id)
                    .collect();
                ResponseTemplate::new(200).set_body_json(ids)
            }

            ("POST", ["domain", "zone", zone, "record"]) => {
                let Ok(body) = serde_json::from_slice::<serde_json::Value>(&request.body) else {
                    return error(400, "invalid body");
                };
                let zone = zone.to_string();
                state.next_id += 1;
                let id = state.next_id;
                let record = RecordInfo {
                    id,
                    zone: zone.clone(),
                    sub_domain: body["subDomain"].as_str().unwrap_or_default().to_string(),
                    field_type: body["fieldType"].as_str().unwrap_or_default().to_string(),
                    target: body["target"].as_str().unwrap_or_default().to_string(),
                    ttl: body["ttl"].as_u64().unwrap_or_default() as u32,
                };
                state.records.entry(zone).or_default().insert(id, record.clone());
                ResponseTemplate::new(200).set_body_json(record)
            }

            (verb, ["domain", "zone", zone, "record", id]) => {
                let Ok(id) = id.parse::<u64>() else {
                    return error(400, "invalid id");
                };
                let Some(records) = state.records.get_mut(*zone) else {
                    return error(404, "zone not found");
                };
                match verb {
                    "GET" => match records.get(&id) {
                        Some(record) => ResponseTemplate::new(200).set_body_json(record),
                        None => error(404, "record not found"),
                    },
                    "PUT" => {
                        let Some(record) = records.get_mut(&id) else {
                            return error(404, "record not found");
                        };
                        let body: serde_json::Value =
                            serde_json::from_slice(&request.body).unwrap_or_default();
                        if let Some(ttl) = body["ttl"].as_u64() {
                            record.ttl = ttl as u32;
                        }
                        if let Some(target) = body["target"].as_str() {
                            record.target = target.to_string();
                        }
                        ResponseTemplate::new(200).set_body_json(serde_json::Value::Null)
                    }
                    "DELETE" => match records.remove(&id) {
                        Some(_) => ResponseTemplate::new(200).set_body_json(serde_json::Value::Null),
                        None => error(404, "record not found"),
                    },
                    _ => error(405, "method not allowed"),
                }
            }

            ("POST", ["domain", "zone", _zone, "refresh"]) => {
                ResponseTemplate::new(200).set_body_json(serde_json::Value::Null)
            }

            _ => error(404, "not found"),
        }
    }
}

/// Zone cache double counting `apply_requests` calls
#[derive(Clone, Default)]
pub struct RecordingZoneCache {
    apply_count: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<(Option<String>, usize)>>>,
}

impl RecordingZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_count(&self) -> usize {
        self.apply_count.load(Ordering::SeqCst)
    }

    /// Error message and request count of the last notification
    pub fn last(&self) -> Option<(Option<String>, usize)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZoneCache for RecordingZoneCache {
    async fn apply_requests(&self, err: Option<&Error>, _zone: &HostedZone, requests: &[ChangeRequest]) {
        self.apply_count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((err.map(|e| e.to_string()), requests.len()));
    }

    async fn report_zone_state_conflict(&self, _zone: &HostedZone, _err: &Error) -> bool {
        false
    }
}

/// Everything a contract test needs to drive a handler
pub struct Harness {
    pub api: FakeOvhApi,
    pub server: MockServer,
    pub counters: CallCounters,
    pub cache: RecordingZoneCache,
    pub handler: OvhHandler,
}

impl Harness {
    pub async fn start(api: FakeOvhApi) -> Self {
        Self::start_with(api, false).await
    }

    pub async fn start_dry_run(api: FakeOvhApi) -> Self {
        Self::start_with(api, true).await
    }

    async fn start_with(api: FakeOvhApi, dry_run: bool) -> Self {
        let server = api.start().await;
        let counters = CallCounters::new();
        let cache = RecordingZoneCache::new();
        let handler = build_handler(&server, dry_run, &counters, Arc::new(cache.clone()));

        Self {
            api,
            server,
            counters,
            cache,
            handler,
        }
    }

    /// Another handler on the same fake API, notifying the given cache
    pub fn handler_with_cache(&self, cache: Arc<dyn ZoneCache>) -> OvhHandler {
        build_handler(&self.server, self.handler.is_dry_run(), &self.counters, cache)
    }
}

fn build_handler(
    server: &MockServer,
    dry_run: bool,
    counters: &CallCounters,
    cache: Arc<dyn ZoneCache>,
) -> OvhHandler {
    let config = HandlerConfig::new(ProviderConfig::Ovh {
        endpoint: format!("{}{}", server.uri(), API_PREFIX),
        application_key: "test_app_key".to_string(),
        application_secret: "test_app_secret".to_string(),
        consumer_key: "test_consumer_key".to_string(),
    })
    .with_dry_run(dry_run);
    let context = HandlerContext::new(Arc::new(Unlimited), Arc::new(counters.clone()), cache);
    OvhHandler::new(&config, context).expect("handler construction succeeds")
}

/// A zone value as the directory would list it
pub fn zone(name: &str) -> HostedZone {
    HostedZone::new("ovh", name, name, Vec::new())
}
