// src/scanner/client.rs
// =============================================================================
// The IP Quality Score malicious URL scanner client.
//
// One client holds one API key, one strictness level, and the body of the
// last lookup. Each `fetch` replaces that body wholesale; the accessors below
// read fields out of it and fall back to a default when a field is missing
// (or when nothing has been fetched yet).
// =============================================================================

use reqwest::Client;
use std::fmt;
use tracing::{debug, warn};

use super::error::ScanError;
use super::report::{DomainAge, UrlReport};
use super::strictness::Strictness;
use super::validate::is_valid_url;

/// Public IPQS host.
pub const DEFAULT_BASE_URL: &str = "https://www.ipqualityscore.com";

/// Returned by [`MalUrl::risk_score`] and [`MalUrl::domain_rank`] when the
/// field was not in the response. IPQS never reports negative values.
pub const DOES_NOT_EXIST: i64 = -999;

/// Placeholder for string fields IPQS could not determine.
pub const NA: &str = "N/A";

const URL_ENDPOINT: &str = "/api/json/url";

/// Client for the IPQS malicious URL scanner.
///
/// ```ignore
/// use malurl::{MalUrl, Strictness};
///
/// let mut scanner = MalUrl::new("my-api-key", Strictness::Low);
/// scanner.fetch("https://example.com").await?;
/// if scanner.is_unsafe() {
///     println!("risk score {}", scanner.risk_score());
/// }
/// ```
pub struct MalUrl {
    http: Client,
    base_url: String,
    api_key: String,
    strictness: Strictness,
    last_result: Option<UrlReport>,
}

impl MalUrl {
    /// Create a client talking to the public IPQS API.
    pub fn new(api_key: impl Into<String>, strictness: Strictness) -> Self {
        Self::with_client(Client::new(), DEFAULT_BASE_URL, api_key, strictness)
    }

    /// Create a client with a custom `reqwest::Client` (timeouts, proxies)
    /// and API host.
    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        strictness: Strictness,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            strictness,
            last_result: None,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Scan `url` and store the IPQS response as the current result.
    ///
    /// `url` is validated first; a malformed URL is rejected with
    /// [`ScanError::InvalidUrl`] without spending a request from the quota.
    ///
    /// A JSON body is stored even when IPQS reports `success: false`; check
    /// [`success`](Self::success) and [`message`](Self::message) for that.
    /// A body saying the request quota is exhausted is stored as a failure
    /// record with status 402.
    ///
    /// On any error a failure record (`success: false`, the error message,
    /// and [`ScanError::status_code`]) replaces the previous result.
    pub async fn fetch(&mut self, url: &str) -> Result<(), ScanError> {
        let outcome = if is_valid_url(url) {
            self.request(url).await
        } else {
            warn!(url, "not a valid url, skipping lookup");
            Err(ScanError::InvalidUrl(url.to_string()))
        };

        match outcome {
            Ok(report) => {
                self.last_result = Some(report);
                Ok(())
            }
            Err(e) => {
                self.last_result = Some(UrlReport::failure(e.status_code(), e.to_string()));
                Err(e)
            }
        }
    }

    async fn request(&self, url: &str) -> Result<UrlReport, ScanError> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), URL_ENDPOINT);
        let strictness = self.strictness.to_string();

        debug!(url, strictness = %strictness, "querying IPQS");

        let response = self
            .http
            .get(&endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("url", url),
                ("strictness", strictness.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        let report: UrlReport = serde_json::from_slice(&body).map_err(|source| ScanError::Decode {
            status: status.as_u16(),
            source,
        })?;

        if report.is_quota_exhausted() {
            let message = report.message.unwrap_or_default();
            warn!(%message, "IPQS request quota exhausted");
            return Ok(UrlReport::failure(402, message));
        }

        debug!(http_status = status.as_u16(), success = ?report.success, "IPQS responded");
        Ok(report)
    }

    /// The full result of the last fetch, if any.
    pub fn report(&self) -> Option<&UrlReport> {
        self.last_result.as_ref()
    }

    fn project<'a, T>(&'a self, field: impl FnOnce(&'a UrlReport) -> Option<T>) -> Option<T> {
        self.last_result.as_ref().and_then(field)
    }

    // ---- accessors -------------------------------------------------------

    /// Whether the request to IPQS itself succeeded.
    pub fn success(&self) -> bool {
        self.project(|r| r.success).unwrap_or(false)
    }

    /// Generic status message, either success or some form of error notice.
    pub fn message(&self) -> &str {
        self.project(|r| r.message.as_deref()).unwrap_or("")
    }

    /// Whether the domain is suspected of being unsafe due to phishing,
    /// malware, spamming, or abusive behavior. See [`risk_score`](Self::risk_score)
    /// for the confidence level.
    pub fn is_unsafe(&self) -> bool {
        self.project(|r| r.r#unsafe).unwrap_or(false)
    }

    /// Domain of the final destination URL, after following redirects.
    pub fn domain(&self) -> &str {
        self.project(|r| r.domain.as_deref()).unwrap_or("")
    }

    pub fn ip_address(&self) -> &str {
        self.project(|r| r.ip_address.as_deref()).unwrap_or("")
    }

    /// Server banner, e.g. "nginx/1.16.0". [`NA`] if unknown.
    pub fn server(&self) -> &str {
        self.project(|r| non_blank(r.server.as_deref())).unwrap_or(NA)
    }

    /// MIME type of the URL's content. [`NA`] if unknown.
    pub fn content_type(&self) -> &str {
        self.project(|r| non_blank(r.content_type.as_deref())).unwrap_or(NA)
    }

    /// HTTP status of the scanned URL (200 for a live site), 0 if unreachable.
    pub fn status_code(&self) -> i64 {
        self.project(|r| r.status_code).unwrap_or(0)
    }

    /// Bytes downloaded for the URL's content, 0 if unreachable.
    pub fn page_size(&self) -> i64 {
        self.project(|r| r.page_size).unwrap_or(0)
    }

    /// Estimated global popularity rank. 0 means unranked or low traffic,
    /// [`DOES_NOT_EXIST`] means the field was absent.
    pub fn domain_rank(&self) -> i64 {
        self.project(|r| r.domain_rank).unwrap_or(DOES_NOT_EXIST)
    }

    pub fn dns_valid(&self) -> bool {
        self.project(|r| r.dns_valid).unwrap_or(false)
    }

    /// Parked with a for-sale notice.
    pub fn parking(&self) -> bool {
        self.project(|r| r.parking).unwrap_or(false)
    }

    /// Associated with email spam or abusive email addresses.
    pub fn spamming(&self) -> bool {
        self.project(|r| r.spamming).unwrap_or(false)
    }

    pub fn malware(&self) -> bool {
        self.project(|r| r.malware).unwrap_or(false)
    }

    pub fn phishing(&self) -> bool {
        self.project(|r| r.phishing).unwrap_or(false)
    }

    /// Suspected of being malicious or used for phishing or abuse. Pair with
    /// [`risk_score`](Self::risk_score).
    pub fn suspicious(&self) -> bool {
        self.project(|r| r.suspicious).unwrap_or(false)
    }

    /// Hosting dating or adult content.
    pub fn adult(&self) -> bool {
        self.project(|r| r.adult).unwrap_or(false)
    }

    /// IPQS confidence that the URL is malicious. 85+ is high risk, 100 is
    /// confirmed. [`DOES_NOT_EXIST`] if absent.
    pub fn risk_score(&self) -> i64 {
        self.project(|r| r.risk_score).unwrap_or(DOES_NOT_EXIST)
    }

    /// Site classification ("Search Engines", "Phishing", ...). [`NA`] if unknown.
    pub fn category(&self) -> &str {
        self.project(|r| non_blank(r.category.as_deref())).unwrap_or(NA)
    }

    /// Registration age of the domain; empty if unknown.
    pub fn domain_age(&self) -> DomainAge {
        self.project(|r| r.domain_age.clone()).unwrap_or_default()
    }

    /// Identifier for looking this request up later on IPQS.
    pub fn request_id(&self) -> &str {
        self.project(|r| r.request_id.as_deref()).unwrap_or("")
    }

    /// Errors IPQS hit while processing the request.
    pub fn errors(&self) -> &[String] {
        self.project(|r| r.errors.as_deref()).unwrap_or(&[])
    }
}

// Keep the API key out of logs.
impl fmt::Debug for MalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MalUrl")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("strictness", &self.strictness)
            .field("last_result", &self.last_result)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does fetch take &mut self?
//    - It overwrites last_result, so it needs exclusive access
//    - The borrow checker then guarantees no accessor is reading the old
//      result while a new one is being stored
//
// 2. What is project()?
//    - A small helper that hands the stored report (if any) to a closure
//    - Each accessor picks its field and supplies its own default with
//      unwrap_or, so "nothing fetched yet" and "field missing" behave the same
//
// 3. Why return &str instead of String?
//    - The strings live inside last_result; borrowing them avoids a copy
//    - The 'a lifetime on project() ties the borrow to &self
// -----------------------------------------------------------------------------
