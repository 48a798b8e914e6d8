//! KYC document endpoints

use async_trait::async_trait;
use serde_json::Value;

use super::model::{DocumentCreated, Identity, KycStatus};
use crate::api::{ApiClient, Endpoint};
use crate::error::{SyncError, SyncResult};

/// The three document endpoints the KYC poller talks to
#[async_trait]
pub trait KycApi: Send + Sync {
    async fn create_document(&self, identity: &Identity) -> SyncResult<DocumentCreated>;

    async fn document_status(&self, request_id: &str) -> SyncResult<KycStatus>;

    async fn document_download_url(&self, request_id: &str) -> SyncResult<String>;
}

/// Endpoint paths of the document API
#[derive(Debug, Clone)]
pub struct KycEndpoints {
    pub create: Endpoint,
    pub status: Endpoint,
    pub download: Endpoint,
}

impl Default for KycEndpoints {
    fn default() -> Self {
        Self {
            create: Endpoint::post("/kyc/document/create"),
            status: Endpoint::get("/kyc/document/status"),
            download: Endpoint::get("/kyc/document/download"),
        }
    }
}

/// [`KycApi`] over the dashboard REST API
pub struct RestKycApi {
    client: ApiClient,
    endpoints: KycEndpoints,
}

impl RestKycApi {
    pub fn new(client: ApiClient) -> Self {
        Self::with_endpoints(client, KycEndpoints::default())
    }

    pub fn with_endpoints(client: ApiClient, endpoints: KycEndpoints) -> Self {
        Self { client, endpoints }
    }
}

/// String field read from the body or from its `data` object. Numeric ids
/// are accepted and stringified.
fn field(body: &Value, key: &str) -> Option<String> {
    let lookup = |v: &Value| match v.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    lookup(body).or_else(|| body.get("data").and_then(lookup))
}

fn required(body: &Value, key: &str) -> SyncResult<String> {
    field(body, key).ok_or_else(|| SyncError::Decode(format!("Response is missing '{}'", key)))
}

fn id_params(request_id: &str) -> Vec<(String, String)> {
    vec![("id".to_string(), request_id.to_string())]
}

#[async_trait]
impl KycApi for RestKycApi {
    async fn create_document(&self, identity: &Identity) -> SyncResult<DocumentCreated> {
        let body = self
            .client
            .send(&self.endpoints.create, &identity.to_pairs())
            .await?;

        Ok(DocumentCreated {
            signing_url: required(&body, "signing_url")?,
            request_id: required(&body, "request_id")?,
        })
    }

    async fn document_status(&self, request_id: &str) -> SyncResult<KycStatus> {
        let body = self
            .client
            .send(&self.endpoints.status, &id_params(request_id))
            .await?;

        Ok(KycStatus::parse(&required(&body, "request_status")?))
    }

    async fn document_download_url(&self, request_id: &str) -> SyncResult<String> {
        let body = self
            .client
            .send(&self.endpoints.download, &id_params(request_id))
            .await?;

        required(&body, "file_url")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_lookup() {
        let flat = json!({"signing_url": "https://sign/1", "request_id": 42});
        assert_eq!(field(&flat, "signing_url").as_deref(), Some("https://sign/1"));
        assert_eq!(field(&flat, "request_id").as_deref(), Some("42"));

        let nested = json!({"status": true, "data": {"request_status": "pending"}});
        assert_eq!(field(&nested, "request_status").as_deref(), Some("pending"));

        assert!(matches!(
            required(&json!({"data": {}}), "file_url"),
            Err(SyncError::Decode(_))
        ));
    }
}
