use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api;

/// A certificate the service orders and renews.
///
/// # Example JSON
///
/// ```json
/// {
///   "id": 7,
///   "name": "www-example-com",
///   "description": "",
///   "subject": "example.com",
///   "subject_alts": ["www.example.com"],
///   "private_key": { "id": 2, "name": "site-key" },
///   "acme_account": { "id": 3, "name": "le-prod-account" },
///   "organization": "Example Corp",
///   "country": "SE",
///   "api_key": "abc123",
///   "api_key_via_url": false,
///   "valid_from": 1704067200,
///   "valid_to": 1711843200,
///   "created_at": 1704067200,
///   "updated_at": 1704067200
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Common name of the certificate.
    pub subject: String,

    /// Additional SAN entries.
    #[serde(default)]
    pub subject_alts: Vec<String>,

    pub private_key: api::KeySummary,
    pub acme_account: api::AccountSummary,

    #[serde(default)]
    pub organization: String,

    #[serde(default)]
    pub country: String,

    /// Key used by off-console clients to fetch the issued PEM.
    pub api_key: String,

    /// Present only while a key rotation is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_new: Option<String>,

    pub api_key_via_url: bool,

    #[serde(default, with = "time::serde::timestamp::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<OffsetDateTime>,

    #[serde(default, with = "time::serde::timestamp::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<OffsetDateTime>,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl Certificate {
    /// Number of whole days the issued certificate is still valid, or
    /// `None` before first issuance.
    ///
    /// Can go negative for an expired certificate.
    pub fn valid_days_left(&self) -> Option<i64> {
        let valid_to = self.valid_to?;
        Some((valid_to - OffsetDateTime::now_utc()).whole_days())
    }

    /// All names the certificate covers, subject first.
    pub fn domains(&self) -> Vec<&str> {
        std::iter::once(self.subject.as_str())
            .chain(self.subject_alts.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateListResponse {
    pub total_records: usize,
    pub certificates: Vec<Certificate>,
}
