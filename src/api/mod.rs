//! JSON API payloads.
//!
//! Request and response bodies exchanged with the backend. Field names
//! here are the path segments the form layer operates on.

use std::fmt;

use serde::{Deserialize, Serialize};

mod account;
mod auth;
mod certificate;
mod private_key;
mod provider;
mod server;

pub use self::{
    account::{AccountListResponse, AccountStatus, AccountSummary, AcmeAccount},
    auth::{AuthResponse, Authorization, LoginPayload},
    certificate::{Certificate, CertificateListResponse},
    private_key::{KeyAlgorithm, KeyListResponse, KeySummary, PrivateKey},
    provider::{ChallengeProvider, ProviderListResponse},
    server::{AcmeServer, ServerListResponse, ServerSummary},
};

/// Structured error the backend wraps every failed response in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Error synthesized client side (transport failure, undecodable
    /// body). Carries status 0 so it cannot be mistaken for a backend
    /// response.
    pub(crate) fn local(message: impl Into<String>) -> Self {
        ApiError {
            status: 0,
            message: message.into(),
        }
    }

    /// Returns true if the backend rejected the access token.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.status, self.message)
        }
    }
}

/// Body shape of every non-2xx backend response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ApiError,
}
