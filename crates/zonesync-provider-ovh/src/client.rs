//! Signed REST client
//!
//! Every call carries the application key, the consumer key, a timestamp and
//! a signature over the request:
//!
//! ```text
//! X-Ovh-Signature: "$1$" + sha1_hex(secret+"+"+consumer+"+"+METHOD+"+"+url+"+"+body+"+"+timestamp)
//! ```
//!
//! The client never retries. A transport failure, a non-2xx status or a
//! malformed body all surface as [`Error::RemoteApi`] naming the call and the
//! zone it was made for.

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use zonesync_core::{Error, Result};

use crate::endpoint::resolve_endpoint;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Application credentials
#[derive(Clone)]
pub struct Credentials {
    /// Application key, sent in clear
    pub application_key: String,
    /// Application secret, only ever used to sign
    pub application_secret: String,
    /// Consumer key bound to the granted rights
    pub consumer_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials
    pub fn new(
        application_key: impl Into<String>,
        application_secret: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Self {
        Self {
            application_key: application_key.into(),
            application_secret: application_secret.into(),
            consumer_key: consumer_key.into(),
        }
    }

    /// Compute the request signature
    pub fn sign(&self, method: &str, url: &str, body: &str, timestamp: u64) -> String {
        let payload = format!(
            "{}+{}+{}+{}+{}+{}",
            self.application_secret, self.consumer_key, method, url, body, timestamp
        );
        let digest = ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, payload.as_bytes());
        format!("$1${}", hex::encode(digest.as_ref()))
    }
}

/// HTTP client for the OVHcloud API
pub struct OvhClient {
    base_url: String,
    credentials: Credentials,
    http: reqwest::Client,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for OvhClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl OvhClient {
    /// Create a client for a region alias or an explicit base URL
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpointConfig`] for an unknown endpoint
    /// - [`Error::Config`] for empty credentials
    pub fn new(endpoint: &str, credentials: Credentials) -> Result<Self> {
        let base_url = resolve_endpoint(endpoint)?;

        if credentials.application_key.is_empty()
            || credentials.application_secret.is_empty()
            || credentials.consumer_key.is_empty()
        {
            return Err(Error::config("OVH credentials cannot be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            credentials,
            http,
        })
    }

    /// Resolved base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        zone: &str,
    ) -> Result<T> {
        let text = self.send(Method::GET, path, query, None, zone).await?;
        parse(&format!("GET {path}"), zone, &text)
    }

    /// POST a JSON body and decode the response
    pub async fn post<B, T>(&self, path: &str, body: &B, zone: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body)?;
        let text = self.send(Method::POST, path, &[], Some(body), zone).await?;
        parse(&format!("POST {path}"), zone, &text)
    }

    /// POST without body, ignoring the response
    pub async fn post_empty(&self, path: &str, zone: &str) -> Result<()> {
        self.send(Method::POST, path, &[], None, zone).await?;
        Ok(())
    }

    /// PUT a JSON body, ignoring the response
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B, zone: &str) -> Result<()> {
        let body = serde_json::to_string(body)?;
        self.send(Method::PUT, path, &[], Some(body), zone).await?;
        Ok(())
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str, zone: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None, zone).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<String>,
        zone: &str,
    ) -> Result<String> {
        let call = format!("{method} {path}");

        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::remote_api(&call, zone, format!("invalid URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let body = body.unwrap_or_default();
        let timestamp = unix_timestamp();
        let signature = self
            .credentials
            .sign(method.as_str(), url.as_str(), &body, timestamp);

        tracing::trace!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header("X-Ovh-Application", self.credentials.application_key.as_str())
            .header("X-Ovh-Consumer", self.credentials.consumer_key.as_str())
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature)
            .header("Content-Type", "application/json");
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote_api(&call, zone, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::remote_api(&call, zone, format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::remote_api(&call, zone, status_detail(status, &text)));
        }

        Ok(text)
    }
}

fn parse<T: DeserializeOwned>(call: &str, zone: &str, text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::remote_api(call, zone, format!("Failed to parse response: {e}")))
}

/// Describe a non-2xx response
fn status_detail(status: StatusCode, body: &str) -> String {
    // Error bodies look like {"message": "..."}
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: invalid credentials or insufficient rights. Status: {status}"
        ),
        404 => format!("Not found. Status: {status} - {message}"),
        409 => format!("Conflict. Status: {status} - {message}"),
        429 => format!("Rate limit exceeded. Status: {status}"),
        500..=599 => format!("Server error (transient): {status} - {message}"),
        _ => format!("Unexpected status: {status} - {message}"),
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
