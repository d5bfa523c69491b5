//! URL host checks against the allow-listed listings domain.

/// Extract the host portion of an http(s) URL, lowercased.
pub fn host_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    // Strip credentials and port.
    let host = host.rsplit('@').next()?;
    let host = host.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// True when the URL's host is the allowed domain or a subdomain of it.
pub fn host_allowed(url: &str, domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    match host_of(url) {
        Some(host) => host == domain || host.ends_with(&format!(".{domain}")),
        None => false,
    }
}
