//! Authenticated backend access.
//!
//! Setup is:
//!
//! 1. `Session::new()` with the backend's base URL.
//! 2. `login()` with console credentials.
//! 3. `api_call()` / `download_file()` for everything after that.
//!
//! The access token is short lived and held in memory; the refresh token
//! is an HTTP-only cookie the client's cookie jar carries. When the
//! access token lapses, the next call refreshes it transparently. The
//! refresh itself is single flight: one guard is held across the network
//! call, so concurrent callers of an expired session await the in-flight
//! refresh and re-check the token instead of each starting their own.

use std::sync::Arc;

use base64::prelude::*;
use parking_lot::Mutex;
use reqwest::Method;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use zeroize::Zeroizing;

use crate::{
    api::{self, ApiError},
    req::{build_client, read_json, req_json, ReqResult},
};

/// Margin subtracted from the token lifetime so a request does not leave
/// with a token about to lapse mid-flight.
const TOKEN_LEEWAY: Duration = Duration::seconds(10);

struct AccessToken {
    token: Zeroizing<String>,
    expires_at: OffsetDateTime,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        OffsetDateTime::now_utc() + TOKEN_LEEWAY < self.expires_at
    }
}

struct SessionInner {
    client: reqwest::Client,
    base_url: String,
    token: Mutex<Option<AccessToken>>,
    refresh_guard: tokio::sync::Mutex<()>,
}

/// Authenticated connection to the backend.
///
/// Cloning is cheap; clones share the token state and cookie jar.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> eyre::Result<Session> {
        let client = build_client()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Ok(Session {
            inner: Arc::new(SessionInner {
                client,
                base_url,
                token: Mutex::new(None),
                refresh_guard: tokio::sync::Mutex::new(()),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.inner.base_url)
    }

    /// Authenticates against the backend and stores the returned access
    /// token. The refresh cookie lands in the client's cookie jar.
    pub async fn login(&self, username: &str, password: &str) -> eyre::Result<()> {
        let payload = api::LoginPayload {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        let body = serde_json::to_value(&payload)?;

        let res = req_json(
            &self.inner.client,
            Method::POST,
            &self.url("/v1/app/auth/login"),
            None,
            Some(&body),
        )
        .await?;

        let auth: api::AuthResponse = read_json(res).await?;
        self.store_token(auth.authorization);

        Ok(())
    }

    /// Ends the session server side and drops the held token either way.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .api_call(Method::POST, "/v1/app/auth/logout", None)
            .await;

        self.invalidate_token();

        result.map(|_| ())
    }

    /// Makes an authenticated JSON call against the backend.
    ///
    /// The held token is refreshed first if it has lapsed. A 401 response
    /// additionally invalidates the token and retries once after a forced
    /// refresh, since the backend can revoke tokens before they expire.
    pub async fn api_call(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path);
        let mut refreshed = false;

        loop {
            let token = self.bearer().await?;

            log::debug!("call endpoint: {url}");

            match req_json(
                &self.inner.client,
                method.clone(),
                &url,
                Some(token.as_str()),
                body,
            )
            .await
            {
                Err(err) if err.is_unauthorized() && !refreshed => {
                    log::debug!("retrying after token refresh");
                    self.invalidate_token();
                    refreshed = true;
                }
                Err(err) => return Err(err),
                Ok(res) => return read_json(res).await,
            }
        }
    }

    /// Fetches a file attachment, returning its name and bytes.
    ///
    /// The name comes from the `Content-Disposition` header, falling back
    /// to the last path segment.
    pub async fn download_file(&self, path: &str) -> Result<(String, Vec<u8>), ApiError> {
        let token = self.bearer().await?;
        let url = self.url(path);

        log::debug!("download: {url}");

        let res = req_json(
            &self.inner.client,
            Method::GET,
            &url,
            Some(token.as_str()),
            None,
        )
        .await?;

        let fallback = path.rsplit('/').next().unwrap_or(path);
        let filename = attachment_filename(&res, fallback);

        let bytes = res
            .bytes()
            .await
            .map_err(|err| ApiError::local(format!("failed to read attachment body: {err}")))?;

        Ok((filename, bytes.to_vec()))
    }

    /// The held token if it is still fresh, otherwise a refreshed one.
    async fn bearer(&self) -> ReqResult<Zeroizing<String>> {
        if let Some(token) = self.fresh_token() {
            return Ok(token);
        }

        self.refresh().await
    }

    async fn refresh(&self) -> ReqResult<Zeroizing<String>> {
        let _guard = self.inner.refresh_guard.lock().await;

        // a concurrent call may have refreshed while we waited for the guard
        if let Some(token) = self.fresh_token() {
            log::trace!("refresh already completed by a concurrent call");
            return Ok(token);
        }

        log::debug!("refreshing access token");

        let res = req_json(
            &self.inner.client,
            Method::POST,
            &self.url("/v1/app/auth/refresh"),
            None,
            None,
        )
        .await?;

        let auth: api::AuthResponse = read_json(res).await?;
        self.store_token(auth.authorization);

        self.fresh_token()
            .ok_or_else(|| ApiError::local("refreshed access token is already expired"))
    }

    fn store_token(&self, auth: api::Authorization) {
        let expires_at = token_expiry(&auth.access_token).unwrap_or(auth.session_exp);

        *self.inner.token.lock() = Some(AccessToken {
            token: Zeroizing::new(auth.access_token),
            expires_at,
        });
    }

    fn fresh_token(&self) -> Option<Zeroizing<String>> {
        let token = self.inner.token.lock();

        token
            .as_ref()
            .filter(|token| token.is_fresh())
            .map(|token| token.token.clone())
    }

    fn invalidate_token(&self) {
        *self.inner.token.lock() = None;
    }
}

fn attachment_filename(res: &reqwest::Response, fallback: &str) -> String {
    res.headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split("filename=").nth(1))
        .map(|name| name.trim_matches('"').to_owned())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Reads the `exp` claim out of a JWT payload.
///
/// No signature verification happens client side; the claim is only a
/// hint for scheduling the next refresh.
fn token_expiry(token: &str) -> Option<OffsetDateTime> {
    #[derive(Deserialize)]
    struct Claims {
        #[serde(with = "time::serde::timestamp")]
        exp: OffsetDateTime,
    }

    let payload = token.split('.').nth(1)?;
    let bytes = BASE64_URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    Some(claims.exp)
}
