// src/scanner/report.rs
// =============================================================================
// Typed view of the JSON body returned by the IPQS malicious URL scanner.
//
// Every known field is optional: IPQS omits most of them on failure, and the
// client's accessors decide what an absent field means. Fields we don't model
// are kept in `extra` so `--json` output reproduces the whole body.
//
// Fields decode leniently. A field with an unexpected type (a float where an
// integer belongs, a string where a bool belongs) becomes None instead of
// failing the whole body; only a body that isn't a JSON object is rejected.
// =============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Message IPQS sends back once the monthly lookup allowance is used up.
pub const QUOTA_EXCEEDED: &str = "You have exceeded your request quota";

/// One scan result, as returned by IPQS (or synthesized on failure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlReport {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub success: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub r#unsafe: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_address: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub server: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    /// Status the scanned URL answered with (or a synthetic one, see
    /// [`UrlReport::failure`]).
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_code: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_size: Option<i64>,
    /// Global popularity rank; 0 means unranked or low traffic.
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain_rank: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub dns_valid: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub parking: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub spamming: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub malware: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub phishing: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub suspicious: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub adult: Option<bool>,
    /// 0-100. 85+ is high risk, 100 is confirmed malicious.
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_score: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain_age: Option<DomainAge>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub errors: Option<Vec<String>>,

    /// Anything else IPQS sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// When the domain was registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAge {
    /// e.g. "3 months ago"
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub human: Option<String>,
    /// Unix seconds.
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub iso: Option<String>,
}

// Decode a field as T, or None if it has some other shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// Integers also arrive as floats ("1.5e3") or numeric strings now and then.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_to_int)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    })
}

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.round() as i64)
    } else {
        None
    }
}

impl DomainAge {
    pub fn is_empty(&self) -> bool {
        self.human.is_none() && self.timestamp.is_none() && self.iso.is_none()
    }
}

impl UrlReport {
    /// The record stored when a fetch could not get a usable body.
    pub fn failure(status_code: i64, message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            message: Some(message.into()),
            status_code: Some(status_code),
            ..Self::default()
        }
    }

    /// True when IPQS refused the lookup because the quota ran out.
    pub fn is_quota_exhausted(&self) -> bool {
        self.success != Some(true)
            && self
                .message
                .as_deref()
                .is_some_and(|msg| msg.contains(QUOTA_EXCEEDED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_full_response() {
        let body = json!({
            "message": "Success.",
            "success": true,
            "unsafe": false,
            "domain": "google.com",
            "ip_address": "142.250.72.14",
            "server": "gws",
            "content_type": "text/html; charset=ISO-8859-1",
            "status_code": 200,
            "page_size": 53164,
            "domain_rank": 1,
            "dns_valid": true,
            "parking": false,
            "spamming": false,
            "malware": false,
            "phishing": false,
            "suspicious": false,
            "adult": false,
            "risk_score": 0,
            "category": "Search Engines",
            "domain_age": {
                "human": "26 years ago",
                "timestamp": 874296000,
                "iso": "1997-09-15T00:00:00-04:00"
            },
            "request_id": "4DtBTc8Wb0",
            "redirected": false
        });

        let report: UrlReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.success, Some(true));
        assert_eq!(report.domain.as_deref(), Some("google.com"));
        assert_eq!(report.page_size, Some(53164));
        assert_eq!(report.domain_rank, Some(1));
        assert_eq!(report.category.as_deref(), Some("Search Engines"));
        let age = report.domain_age.unwrap();
        assert_eq!(age.timestamp, Some(874296000));
        assert!(!age.is_empty());
        // unmodelled fields survive
        assert_eq!(report.extra.get("redirected"), Some(&json!(false)));
    }

    #[test]
    fn test_mistyped_fields_become_none() {
        let body = json!({
            "success": true,
            "domain": "example.com",
            "unsafe": true,
            "risk_score": 90,
            "page_size": 1.5e3,
            "status_code": "200",
            "domain_rank": "unranked",
            "dns_valid": "yes",
            "errors": "not a list",
            "domain_age": {"human": "1 year ago", "timestamp": 3.7}
        });

        let report: UrlReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.success, Some(true));
        assert_eq!(report.r#unsafe, Some(true));
        assert_eq!(report.risk_score, Some(90));
        assert_eq!(report.page_size, Some(1500));
        assert_eq!(report.status_code, Some(200));
        assert_eq!(report.domain_rank, None);
        assert_eq!(report.dns_valid, None);
        assert_eq!(report.errors, None);
        let age = report.domain_age.unwrap();
        assert_eq!(age.human.as_deref(), Some("1 year ago"));
        assert_eq!(age.timestamp, Some(4));
    }

    #[test]
    fn test_nulls_are_absent() {
        let report: UrlReport =
            serde_json::from_value(json!({"server": null, "risk_score": null})).unwrap();
        assert_eq!(report.server, None);
        assert_eq!(report.risk_score, None);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_str::<UrlReport>("\"Success.\"").is_err());
        assert!(serde_json::from_str::<UrlReport>("42").is_err());
    }

    #[test]
    fn test_parses_empty_object() {
        let report: UrlReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report, UrlReport::default());
    }

    #[test]
    fn test_failure_record_serializes_three_fields() {
        let report = UrlReport::failure(404, "Invalid url google");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "success": false,
                "message": "Invalid url google",
                "status_code": 404
            })
        );
    }

    #[test]
    fn test_quota_detection() {
        let mut report = UrlReport::failure(
            200,
            "You have exceeded your request quota of 5000 per month.",
        );
        assert!(report.is_quota_exhausted());

        report.message = Some("Invalid or unauthorized key.".to_string());
        assert!(!report.is_quota_exhausted());

        let ok = UrlReport {
            success: Some(true),
            message: Some(QUOTA_EXCEEDED.to_string()),
            ..UrlReport::default()
        };
        assert!(!ok.is_quota_exhausted());
    }
}
