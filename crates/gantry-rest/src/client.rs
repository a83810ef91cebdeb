use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::builder::{configure, RequestOptions};
use crate::config::RestContext;
use crate::error::TransportError;
use crate::transport::Transport;

/// Verb-shaped facade over builder + transport.
///
/// Pure composition: each call snapshots the shared configuration, resolves
/// the options through [`configure`], and delegates to the injected
/// [`Transport`]. No retries, no caching, no response validation — a failed
/// call must be explicitly reissued by the caller.
#[derive(Clone)]
pub struct RestClient {
    context: RestContext,
    transport: Arc<dyn Transport>,
}

impl RestClient {
    pub fn new(context: RestContext, transport: Arc<dyn Transport>) -> Self {
        Self { context, transport }
    }

    /// Handle to the shared configuration this client reads.
    pub fn context(&self) -> &RestContext {
        &self.context
    }

    /// Generic entry point; the verb shorthands all funnel through here.
    pub async fn request(&self, options: RequestOptions) -> Result<Value, TransportError> {
        let config = self.context.snapshot().await;
        let descriptor = configure(&options, &config);
        debug!(method = %descriptor.method, url = %descriptor.url, "issuing request");
        self.transport.send(&descriptor).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, TransportError> {
        self.request(RequestOptions {
            method: Some("GET".into()),
            endpoint: Some(endpoint.into()),
            ..Default::default()
        })
        .await
    }

    pub async fn post(&self, endpoint: &str, payload: Value) -> Result<Value, TransportError> {
        self.request(RequestOptions {
            method: Some("POST".into()),
            endpoint: Some(endpoint.into()),
            data: Some(payload),
            ..Default::default()
        })
        .await
    }

    pub async fn put(&self, endpoint: &str, payload: Value) -> Result<Value, TransportError> {
        self.request(RequestOptions {
            method: Some("PUT".into()),
            endpoint: Some(endpoint.into()),
            data: Some(payload),
            ..Default::default()
        })
        .await
    }

    pub async fn patch(&self, endpoint: &str, payload: Value) -> Result<Value, TransportError> {
        self.request(RequestOptions {
            method: Some("PATCH".into()),
            endpoint: Some(endpoint.into()),
            data: Some(payload),
            ..Default::default()
        })
        .await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, TransportError> {
        self.request(RequestOptions {
            method: Some("DELETE".into()),
            endpoint: Some(endpoint.into()),
            ..Default::default()
        })
        .await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RequestDescriptor;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every descriptor it receives and answers with a fixed payload.
    struct RecordingTransport {
        seen: Mutex<Vec<RequestDescriptor>>,
    }

    impl RecordingTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self { seen: Mutex::new(Vec::new()) })
        }

        fn last(&self) -> RequestDescriptor {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(json!({ "ok": true }))
        }
    }

    fn client_with(transport: Arc<RecordingTransport>) -> RestClient {
        RestClient::new(RestContext::new(), transport)
    }

    #[tokio::test]
    async fn get_sets_method_and_endpoint() {
        let transport = RecordingTransport::new();
        let client = client_with(transport.clone());
        client.context().set_host("http://gw:8001").await;

        let payload = client.get("/services").await.unwrap();
        assert_eq!(payload, json!({ "ok": true }));

        let seen = transport.last();
        assert_eq!(seen.method, "GET");
        assert_eq!(seen.url, "http://gw:8001/services");
        assert!(seen.data.is_none());
    }

    #[tokio::test]
    async fn post_carries_payload() {
        let transport = RecordingTransport::new();
        let client = client_with(transport.clone());
        client.context().set_host("http://gw:8001").await;

        client
            .post("/consumers", json!({ "username": "ops" }))
            .await
            .unwrap();

        let seen = transport.last();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.data, Some(json!({ "username": "ops" })));
    }

    #[tokio::test]
    async fn delete_has_no_body() {
        let transport = RecordingTransport::new();
        let client = client_with(transport.clone());

        client.delete("/routes/r1").await.unwrap();

        let seen = transport.last();
        assert_eq!(seen.method, "DELETE");
        assert!(seen.data.is_none());
    }

    #[tokio::test]
    async fn config_changes_apply_to_subsequent_calls() {
        let transport = RecordingTransport::new();
        let client = client_with(transport.clone());

        client.context().set_host("http://one:8001").await;
        client.get("/status").await.unwrap();
        assert_eq!(transport.last().url, "http://one:8001/status");

        client.context().set_host("http://two:8001").await;
        client.get("/status").await.unwrap();
        assert_eq!(transport.last().url, "http://two:8001/status");
    }

    #[tokio::test]
    async fn auth_header_flows_into_descriptor() {
        let transport = RecordingTransport::new();
        let client = client_with(transport.clone());
        client.context().set_basic_auth("admin", Some("secret")).await;

        client.get("/services").await.unwrap();

        let seen = transport.last();
        let headers = seen.headers.expect("auth header expected");
        assert_eq!(headers["Authorization"], "Basic YWRtaW46c2VjcmV0");
        assert!(seen.with_credentials);
    }
}
