//! reqwest-backed JSON client for the dashboard API

use reqwest::{header, Client};
use serde_json::Value;
use std::time::{Duration, Instant};

use super::{Endpoint, HttpMethod};
use crate::config::Config;
use crate::error::{SyncError, SyncResult};

/// Thin JSON client bound to one API base URL
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Self::new(config.api_base_url.clone(), config.request_timeout());
        match &config.api_token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path; absolute URLs pass through untouched
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Shared reqwest client, for collaborators that need raw bodies
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Call an endpoint and decode the JSON body
    pub async fn send(&self, endpoint: &Endpoint, params: &[(String, String)]) -> SyncResult<Value> {
        let url = self.url(&endpoint.path);

        let mut request = match endpoint.method {
            HttpMethod::Get => self.client.get(&url).query(params),
            HttpMethod::Post => self.client.post(&url).form(params),
        };
        request = request.header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            method = ?endpoint.method,
            path = %endpoint.path,
            status = %status.as_u16(),
            duration_ms = %start.elapsed().as_millis(),
            "API call completed"
        );

        if !status.is_success() {
            return Err(SyncError::from_response(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_json(&self, path: &str, params: &[(String, String)]) -> SyncResult<Value> {
        self.send(&Endpoint::get(path), params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("https://api.example.com/v1/", Duration::from_secs(5));
        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(
            client.url("/notifications"),
            "https://api.example.com/v1/notifications"
        );
        assert_eq!(
            client.url("seller/listings"),
            "https://api.example.com/v1/seller/listings"
        );
        assert_eq!(
            client.url("https://cdn.example.com/doc.pdf"),
            "https://cdn.example.com/doc.pdf"
        );
    }
}
