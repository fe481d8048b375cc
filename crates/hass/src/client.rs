//! Home Assistant REST client.

use crate::dispatch::ServiceCall;
use crate::entity::EntityId;
use crate::format::StateSnapshot;
use crate::{Error, Result};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for creating a [`HassClient`].
#[derive(Debug, Clone)]
pub struct HassClientBuilder {
    base_url: String,
    token: String,
    timeout: Duration,
    verify_tls: bool,
}

impl HassClientBuilder {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept self-signed certificates when `false`.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn build(self) -> Result<HassClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(HassClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            token: self.token,
        })
    }
}

/// Authenticated client for one Home Assistant instance.
#[derive(Clone)]
pub struct HassClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HassClient {
    pub fn builder(base_url: impl Into<String>, token: impl Into<String>) -> HassClientBuilder {
        HassClientBuilder::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a resolved service call, discarding the response body.
    pub async fn call_service(&self, call: &ServiceCall) -> Result<()> {
        tracing::debug!(
            entity_id = %call.entity_id,
            domain = %call.domain,
            service = call.service,
            params = ?call.params,
            "calling service"
        );
        let response = self.post(&call.path(), &call.body()).await?;
        check_status(response).await?;
        Ok(())
    }

    /// POST `body` to `/api/services/{domain}/{service}` and return the JSON reply.
    pub async fn post_service(&self, domain: &str, service: &str, body: &Value) -> Result<Value> {
        let path = format!("/api/services/{domain}/{service}");
        let response = check_status(self.post(&path, body).await?).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    /// Fetch the current state of an entity.
    pub async fn get_state(&self, entity: &EntityId) -> Result<StateSnapshot> {
        let url = format!("{}/api/states/{entity}", self.base_url);
        tracing::debug!(%url, "fetching state");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json::<StateSnapshot>()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Response> {
        let url = format!("{}{path}", self.base_url);
        Ok(self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?)
    }
}

impl std::fmt::Debug for HassClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HassClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), %body, "home assistant returned an error");
    Err(Error::ServiceCallFailed {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HassClient::builder("http://hass.local:8123/", "t")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://hass.local:8123");
    }

    #[test]
    fn debug_hides_token() {
        let client = HassClient::builder("http://hass.local", "secret-token")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
    }
}
