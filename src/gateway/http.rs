//! Shared HTTP engine for the REST gateways.
//!
//! Owns transport details only: client construction, request dispatch,
//! non-2xx mapping (the backend answers errors as `{ "message": ... }`),
//! and JSON decoding. Connect, timeout, body, and decode failures all
//! surface as `AppError::Transport`, the class that offline fallbacks key on.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build the client from configuration. Fails only if reqwest cannot
    /// construct the underlying client.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client construction: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET returning decoded JSON. `query` entries are passed through to the
    /// backend untouched.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> AppResult<T> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let body = self.dispatch(Method::GET, path, request).await?;
        decode(path, &body)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> AppResult<T> {
        let request = self.client.post(self.url(path)).json(payload);
        let body = self.dispatch(Method::POST, path, request).await?;
        decode(path, &body)
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> AppResult<T> {
        let request = self.client.put(self.url(path)).json(payload);
        let body = self.dispatch(Method::PUT, path, request).await?;
        decode(path, &body)
    }

    /// DELETE, discarding whatever acknowledgement body the backend sends.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let request = self.client.delete(self.url(path));
        self.dispatch(Method::DELETE, path, request).await?;
        Ok(())
    }

    /// GET returning the raw body (report downloads).
    pub async fn get_bytes(&self, path: &str) -> AppResult<Vec<u8>> {
        let request = self.client.get(self.url(path));
        let body = self.dispatch(Method::GET, path, request).await?;
        Ok(body)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<Vec<u8>> {
        tracing::debug!("{} {}", method, path);
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} transport failure: {}", method, path, e);
            AppError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(AppError::from)?;
        if !status.is_success() {
            let message = remote_message(status, &body);
            tracing::warn!("{} {} failed ({}): {}", method, path, status.as_u16(), message);
            return Err(AppError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body.to_vec())
    }
}

/// Pull the backend's `message` field out of an error body, falling back to
/// the HTTP status line when the body is empty or not in that shape.
fn remote_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            )
        })
}

/// Decode a 2xx body. A success response that does not parse means the
/// contract broke mid-flight and is treated as a transport failure.
fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("{} returned an undecodable body: {}", path, e);
        AppError::Transport(format!("decode {}: {}", path, e))
    })
}
