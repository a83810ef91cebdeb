use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

/// Shared REST configuration read by the request builder.
///
/// `authorization`, when present, is always a ready-to-send header value
/// (`"Basic <b64>"`) — credentials are encoded at set-time, never at
/// request-time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Gateway admin API base, e.g. `http://localhost:8001`. Empty until set.
    pub host: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
}

/// Cloneable handle to the single shared [`RestConfig`].
///
/// Created once by the composition root and passed to every consumer; tests
/// construct their own isolated instance. All operations are infallible —
/// unrecognized input is ignored, never rejected.
#[derive(Debug, Clone, Default)]
pub struct RestContext {
    inner: Arc<RwLock<RestConfig>>,
}

impl RestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-overwrite recognized fields from a key/value mapping.
    ///
    /// Recognized keys: `host`, `authorization`, `accept`, `content_type`.
    /// An `authorization` value is treated as a raw credential string and
    /// stored pre-encoded. Unknown keys and non-string values are dropped.
    pub async fn initialize(&self, options: &Map<String, Value>) {
        let mut config = self.inner.write().await;
        for (key, value) in options {
            let Some(value) = value.as_str() else {
                debug!(%key, "ignoring non-string configuration value");
                continue;
            };
            match key.as_str() {
                "host" => config.host = value.to_string(),
                "authorization" => {
                    config.authorization = Some(format!("Basic {}", BASE64.encode(value)));
                }
                "accept" => config.accept = Some(value.to_string()),
                "content_type" => config.content_type = Some(value.to_string()),
                other => debug!(key = other, "ignoring unrecognized configuration key"),
            }
        }
    }

    /// Overwrite the host unconditionally. Usable before and after
    /// `initialize` — supports retargeting the gateway mid-session.
    pub async fn set_host(&self, host: impl Into<String>) {
        self.inner.write().await.host = host.into();
    }

    /// Store `"Basic " + base64(username + ":" + password)`. An absent
    /// password is treated as empty.
    pub async fn set_basic_auth(&self, username: &str, password: Option<&str>) {
        let credential = format!("{}:{}", username, password.unwrap_or(""));
        self.inner.write().await.authorization =
            Some(format!("Basic {}", BASE64.encode(credential)));
    }

    pub async fn set_accept_type(&self, accept: impl Into<String>) {
        self.inner.write().await.accept = Some(accept.into());
    }

    pub async fn set_content_type(&self, content_type: impl Into<String>) {
        self.inner.write().await.content_type = Some(content_type.into());
    }

    /// Clone of the current configuration, for the builder.
    pub async fn snapshot(&self) -> RestConfig {
        self.inner.read().await.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
