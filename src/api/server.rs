use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An ACME directory endpoint accounts can register against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcmeServer {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub directory_url: String,

    /// Staging directories issue certificates outside real trust chains.
    pub is_staging: bool,

    /// Whether the directory requires external account binding at
    /// registration.
    pub external_account_required: bool,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

/// Condensed server fields for embedding in other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSummary {
    pub id: i64,
    pub name: String,
    pub is_staging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerListResponse {
    pub total_records: usize,
    pub acme_servers: Vec<AcmeServer>,
}
