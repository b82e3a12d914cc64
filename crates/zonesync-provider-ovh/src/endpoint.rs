//! API endpoint selection
//!
//! The endpoint is either a region alias or an explicit base URL. Anything
//! else is rejected at construction time.

use zonesync_core::{Error, Result};

/// Known region aliases and their base URLs
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

/// Resolve a configured endpoint to a base URL without trailing slash
pub fn resolve_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();

    if let Some((_, url)) = ENDPOINTS.iter().find(|(alias, _)| *alias == endpoint) {
        return Ok((*url).to_string());
    }

    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| Error::invalid_endpoint(format!("{endpoint}: {e}")))?;
        if url.host_str().is_none() {
            return Err(Error::invalid_endpoint(format!("{endpoint}: missing host")));
        }
        return Ok(endpoint.trim_end_matches('/').to_string());
    }

    let aliases: Vec<&str> = ENDPOINTS.iter().map(|(alias, _)| *alias).collect();
    Err(Error::invalid_endpoint(format!(
        "{endpoint} must be one of {} or an http(s) URL",
        aliases.join(", ")
    )))
}
