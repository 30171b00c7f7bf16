//! HTTP client for the REST backend.
//!
//! [`ApiClient`] is the only place that touches the network. It attaches
//! the bearer token, enforces the configured timeout, maps transport and
//! status failures onto [`ClientError`] and hands decoded records back.

use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

use super::envelope::{decode_list, error_message, unwrap_list, unwrap_record};
use crate::config::ClientConfig;
use crate::domain::{Fetched, Record, RecordId, Resource};
use crate::error::ClientError;

/// Thin typed wrapper over a shared [`reqwest::Client`].
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the underlying HTTP client cannot
    /// be constructed (e.g. no TLS backend available).
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("optica-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Returns the API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the whole collection of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`], [`ClientError::Status`] or
    /// [`ClientError::Decode`].
    pub async fn list<R: Record>(&self) -> Result<Vec<Fetched<R>>, ClientError> {
        let url = self.url(R::RESOURCE, None)?;
        let body = json_body(&self.send(Method::GET, url, None).await?)?
            .ok_or_else(|| ClientError::Decode("empty list response".to_string()))?;
        decode_list(unwrap_list(body)?)
    }

    /// Fetches one record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`], [`ClientError::Status`] or
    /// [`ClientError::Decode`].
    pub async fn fetch<R: Record>(&self, id: &RecordId) -> Result<Fetched<R>, ClientError> {
        let url = self.url(R::RESOURCE, Some(id))?;
        let body = json_body(&self.send(Method::GET, url, None).await?)?
            .ok_or_else(|| ClientError::Decode("empty record response".to_string()))?;
        Fetched::decode(unwrap_record(body)?)
    }

    /// POSTs a new record and returns the stored version.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`], [`ClientError::Status`] or
    /// [`ClientError::Decode`] (including when the backend answers without
    /// a body, since the new identifier would be unknown).
    pub async fn create<R: Record>(&self, payload: &Value) -> Result<Fetched<R>, ClientError> {
        let url = self.url(R::RESOURCE, None)?;
        let body = json_body(&self.send(Method::POST, url, Some(payload)).await?)?
            .ok_or_else(|| ClientError::Decode("create response carried no record".to_string()))?;
        Fetched::decode(unwrap_record(body)?)
    }

    /// PUTs a full document.
    ///
    /// Returns `None` when the success body does not carry the stored
    /// record (empty, plain text or a bare acknowledgement object).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] or [`ClientError::Status`].
    pub async fn replace<R: Record>(
        &self,
        id: &RecordId,
        document: &Value,
    ) -> Result<Option<Fetched<R>>, ClientError> {
        let url = self.url(R::RESOURCE, Some(id))?;
        let body = self.send(Method::PUT, url, Some(document)).await?;
        Ok(acknowledged_record(&body))
    }

    /// PATCHes a partial document.
    ///
    /// Returns `None` when the success body does not carry the stored
    /// record (empty, plain text or a bare acknowledgement object).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] or [`ClientError::Status`].
    pub async fn patch<R: Record>(
        &self,
        id: &RecordId,
        changes: &Value,
    ) -> Result<Option<Fetched<R>>, ClientError> {
        let url = self.url(R::RESOURCE, Some(id))?;
        let body = self.send(Method::PATCH, url, Some(changes)).await?;
        Ok(acknowledged_record(&body))
    }

    /// DELETEs a record. Any success body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] or [`ClientError::Status`].
    pub async fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), ClientError> {
        let url = self.url(resource, Some(id))?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// Builds `<base>/<resource>[/<id>]`, percent-encoding the identifier.
    fn url(&self, resource: Resource, id: Option<&RecordId>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::Config(format!("{} cannot be a base", self.base_url)))?;
            segments.pop_if_empty().push(resource.path());
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    /// Sends one request and returns the raw body of a success response.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, ClientError> {
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed without response");
            ClientError::from(e)
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::from)?;

        if !status.is_success() {
            let message = error_message(&bytes).unwrap_or_else(|| reason(status));
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "request rejected");
            return Err(ClientError::Status { status, message });
        }

        tracing::debug!(%method, %url, status = status.as_u16(), bytes = bytes.len(), "response received");
        Ok(bytes.to_vec())
    }
}

/// Parses a success body that must be JSON. Blank bodies are `None`.
fn json_body(body: &[u8]) -> Result<Option<Value>, ClientError> {
    if is_blank(body) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ClientError::Decode(format!("response is not JSON: {e}")))
}

/// Reads the stored record out of a PUT/PATCH success body, if it carries
/// one. Anything else counts as a plain acknowledgement.
fn acknowledged_record<R: Record>(body: &[u8]) -> Option<Fetched<R>> {
    if is_blank(body) {
        return None;
    }
    let decoded = serde_json::from_slice::<Value>(body)
        .map_err(ClientError::from)
        .and_then(unwrap_record)
        .and_then(Fetched::decode);
    match decoded {
        Ok(fetched) => Some(fetched),
        Err(e) => {
            tracing::debug!(error = %e, "success body carries no record, treating as acknowledgement");
            None
        }
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let Ok(config) = ClientConfig::new(base) else {
            panic!("valid base url");
        };
        let Ok(client) = ApiClient::new(&config) else {
            panic!("client should build");
        };
        client
    }

    #[test]
    fn collection_url_joins_under_base() {
        let api = client("http://shop.local/api/v1");
        let url = api.url(Resource::MedicalHistory, None).ok();
        assert_eq!(
            url.map(|u| u.to_string()),
            Some("http://shop.local/api/v1/historial-medico".to_string())
        );
    }

    #[test]
    fn record_url_encodes_identifier() {
        let api = client("http://shop.local/api/");
        let url = api
            .url(Resource::Sales, Some(&RecordId::from("a b/c")))
            .ok();
        assert_eq!(
            url.map(|u| u.to_string()),
            Some("http://shop.local/api/ventas/a%20b%2Fc".to_string())
        );
    }

    #[test]
    fn plain_text_success_body_is_an_acknowledgement() {
        assert!(acknowledged_record::<crate::domain::Sale>(b"OK").is_none());
        assert!(acknowledged_record::<crate::domain::Sale>(b"  ").is_none());
        assert!(acknowledged_record::<crate::domain::Sale>(br#"{"ok":true}"#).is_none());
        let Some(stored) =
            acknowledged_record::<crate::domain::Sale>(br#"{"data":{"id":4,"total":"9.90"}}"#)
        else {
            panic!("record body should decode");
        };
        assert_eq!(stored.document, serde_json::json!({ "id": 4, "total": "9.90" }));
    }

    #[test]
    fn required_json_body_rejects_text() {
        assert!(matches!(json_body(b"OK"), Err(ClientError::Decode(_))));
        assert_eq!(json_body(b"\n").ok(), Some(None));
    }

    #[test]
    fn reason_falls_back_to_code() {
        assert_eq!(reason(StatusCode::NOT_FOUND), "Not Found");
        let Ok(custom) = StatusCode::from_u16(599) else {
            panic!("valid status code");
        };
        assert_eq!(reason(custom), "HTTP 599");
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let api = client("http://127.0.0.1:9/api");
        let result = api.list::<crate::domain::Client>().await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}
