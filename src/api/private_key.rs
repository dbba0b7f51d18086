use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::form::SelectOption;

/// A key algorithm choice offered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAlgorithm {
    /// Stable identifier submitted back on key generation, e.g.
    /// `ecdsap256`.
    pub value: String,

    /// Display label, e.g. `ECDSA P-256`.
    pub name: String,
}

impl KeyAlgorithm {
    /// The select-input option for this algorithm.
    pub fn select_option(&self) -> SelectOption {
        SelectOption::new(self.value.as_str(), self.name.as_str())
    }
}

/// A private key held by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub algorithm: KeyAlgorithm,

    /// Key used by off-console clients to fetch this key's material.
    pub api_key: String,
    pub api_key_disabled: bool,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

/// Condensed key fields for embedding in other resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyListResponse {
    pub total_records: usize,
    pub private_keys: Vec<PrivateKey>,
}
