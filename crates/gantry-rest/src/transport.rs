use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::builder::RequestDescriptor;
use crate::error::TransportError;

/// Abstraction over the asynchronous HTTP transport — enables test
/// injection and keeps the client free of any concrete HTTP stack.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Issue the request and yield the decoded response payload.
    ///
    /// Implementations perform no retries and apply no timeout beyond
    /// whatever the underlying stack provides.
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Default, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .unwrap_or(reqwest::Method::GET);
        debug!(method = %method, url = %request.url, "dispatching request");

        let mut builder = self.client.request(method, &request.url);
        if let Some(headers) = &request.headers {
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if let Some(data) = &request.data {
            builder = builder.json(data);
        }
        // `with_credentials` is a browser-context concern; the native
        // transport already sends the Authorization header explicitly.

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status { status: status.as_u16(), body })
        }
    }
}
