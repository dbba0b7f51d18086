use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api;

/// Registration status of an [`AcmeAccount`] with its provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Unknown,
    Valid,
    Deactivated,
    Revoked,
}

/// An ACME account managed by the service.
///
/// # Example JSON
///
/// ```json
/// {
///   "id": 3,
///   "name": "le-prod-account",
///   "description": "",
///   "status": "valid",
///   "email": "admin@example.com",
///   "accepted_tos": true,
///   "kid": "https://acme.example.com/acme/acct/7728515",
///   "acme_server": { "id": 1, "name": "letsencrypt", "is_staging": false },
///   "created_at": 1704067200,
///   "updated_at": 1704067200
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcmeAccount {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub status: AccountStatus,
    pub email: String,
    pub accepted_tos: bool,

    /// Key ID assigned by the provider once registration completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    pub acme_server: api::ServerSummary,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl AcmeAccount {
    /// Returns true if the account can place orders.
    pub fn is_usable(&self) -> bool {
        self.status == AccountStatus::Valid && self.kid.is_some()
    }

    pub fn is_deactivated(&self) -> bool {
        self.status == AccountStatus::Deactivated
    }
}

/// Condensed account fields for embedding in other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub total_records: usize,
    pub acme_accounts: Vec<AcmeAccount>,
}
