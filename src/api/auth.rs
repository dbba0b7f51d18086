use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// Access grant returned by login and refresh.
///
/// The refresh token is NOT part of the body; it travels as an HTTP-only
/// cookie scoped to the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub access_token: String,

    /// When the refresh session itself lapses.
    #[serde(with = "time::serde::timestamp")]
    pub session_exp: OffsetDateTime,
}

/// Response body of the login, refresh, and logout endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub authorization: Authorization,
}
