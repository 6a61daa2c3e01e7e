// src/scanner/validate.rs
// =============================================================================
// Local URL sanity check, run before every request.
//
// IPQS bills each lookup against a monthly quota, so anything that is
// obviously not a URL gets turned away here instead of being sent.
// =============================================================================

use url::{Host, Url};

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Returns true if `input` is an absolute URL with a supported scheme and a
/// plausible host.
///
/// Examples:
///   "http://google.com"   -> true
///   "google"              -> false (no scheme)
///   "http://google"       -> false (bare label, no TLD)
///   "https://10.0.0.1/x"  -> true
pub fn is_valid_url(input: &str) -> bool {
    if input.is_empty() || input.trim() != input {
        return false;
    }

    let parsed = match Url::parse(input) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => is_plausible_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

// A domain needs at least two labels, none of them empty ("a..com" fails).
fn is_plausible_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();

    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
