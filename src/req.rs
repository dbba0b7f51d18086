use std::time::Duration;

use serde::de;

use crate::api::{ApiError, ErrorEnvelope};

pub(crate) type ReqResult<T> = std::result::Result<T, ApiError>;

pub(crate) fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(30))
        .build()
}

pub(crate) async fn req_json(
    client: &reqwest::Client,
    method: reqwest::Method,
    url: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> ReqResult<reqwest::Response> {
    let mut req = client.request(method, url);

    if let Some(token) = token {
        req = req.header(reqwest::header::AUTHORIZATION, token);
    }

    if let Some(body) = body {
        req = req.json(body);
    }

    log::trace!("{req:?}");

    let res = req
        .send()
        .await
        .map_err(|err| ApiError::local(format!("request failed: {err}")))?;

    req_handle_error(res).await
}

pub(crate) async fn req_handle_error(res: reqwest::Response) -> ReqResult<reqwest::Response> {
    // ok responses pass through
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = req_safe_read_body(res).await;

    // the backend wraps failures in an error envelope; anything else gets
    // a synthesized error
    let error = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|err| ApiError {
            status: status.as_u16(),
            message: format!("failed to decode error body ({err}): {body}"),
        });

    Err(error)
}

pub(crate) async fn read_json<T: de::DeserializeOwned>(res: reqwest::Response) -> ReqResult<T> {
    let body = req_safe_read_body(res).await;
    log::debug!("{body}");

    serde_json::from_str(&body)
        .map_err(|err| ApiError::local(format!("failed to decode response body ({err})")))
}

pub(crate) async fn req_safe_read_body(res: reqwest::Response) -> String {
    // the server may close the connection abruptly even though the body
    // made it across
    res.text().await.unwrap_or_default()
}
