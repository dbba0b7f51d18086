use serde::{Deserialize, Serialize};

use crate::form::FormValue;

/// A configured challenge provider.
///
/// Provider configuration is free-form and differs per provider type, so
/// it is carried as a raw form tree: the console edits it directly with
/// path-addressed writes and submits it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeProvider {
    pub id: i64,

    /// Provider implementation tag, e.g. `http-01-internal` or
    /// `dns-01-acme-dns`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Domains this provider solves challenges for. `*` matches any.
    pub domains: Vec<String>,

    #[serde(default)]
    pub config: FormValue,
}

impl ChallengeProvider {
    /// Returns true if this provider is the wildcard catch-all.
    pub fn is_catch_all(&self) -> bool {
        self.domains.iter().any(|domain| domain == "*")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderListResponse {
    pub total_records: usize,
    pub providers: Vec<ChallengeProvider>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_provider_config_is_a_form_tree() {
        let body = json!({
            "id": 1,
            "type": "http-01-internal",
            "domains": ["*"],
            "config": { "port": 4060, "api_keys": ["k1", "k2"] }
        });

        let provider: ChallengeProvider = serde_json::from_value(body).unwrap();

        assert!(provider.is_catch_all());
        assert_eq!(provider.config.get("port").and_then(FormValue::as_int), Some(4060));
        assert_eq!(
            provider.config.get("api_keys.1").and_then(FormValue::as_str),
            Some("k2"),
        );
    }

    #[test]
    fn test_provider_round_trips() {
        let body = json!({
            "id": 2,
            "type": "dns-01-acme-dns",
            "domains": ["example.com"],
            "config": { "acme_dns_address": "https://acme-dns.example.com" }
        });

        let provider: ChallengeProvider = serde_json::from_value(body.clone()).unwrap();
        let out = serde_json::to_value(&provider).unwrap();

        assert_eq!(out, body);
    }
}
