//! Hostname normalization
//!
//! All names held in a [`DnsSets`](super::DnsSets) collection are lowercase and
//! carry no trailing dot. Remote APIs hand out owner names relative to the zone
//! apex, so conversion in both directions lives here too.

/// Escaped wildcard label as some APIs return it
const ESCAPED_WILDCARD: &str = "\\052.";

/// Normalize a hostname: lowercase, unescaped wildcard, no trailing dot
pub fn normalize_hostname(host: &str) -> String {
    let host = host.trim();
    let host = match host.strip_prefix(ESCAPED_WILDCARD) {
        Some(rest) => format!("*.{rest}"),
        None => host.to_string(),
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// Make a hostname absolute by appending a trailing dot if missing
pub fn align_hostname(host: &str) -> String {
    if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{host}.")
    }
}

/// Build the normalized absolute name for a zone-relative owner name
///
/// An empty `sub_domain` denotes the zone apex.
pub fn absolute_name(sub_domain: &str, zone: &str) -> String {
    let zone = normalize_hostname(zone);
    let sub = normalize_hostname(sub_domain);
    if sub.is_empty() {
        zone
    } else {
        format!("{sub}.{zone}")
    }
}

/// Compute the owner name relative to the zone apex
///
/// Returns `Some("")` for the apex itself and `None` when `name` does not
/// belong to `zone`.
pub fn relative_name(name: &str, zone: &str) -> Option<String> {
    let name = normalize_hostname(name);
    let zone = normalize_hostname(zone);
    if name == zone {
        return Some(String::new());
    }
    name.strip_suffix(&zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
}
