use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::RestConfig;

// ── Call options ──────────────────────────────────────────────────────────────

/// Declarative description of one outgoing call, as written by a consumer.
///
/// Every field is optional; [`configure`] resolves whatever is present
/// against the shared [`RestConfig`] and silently ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOptions {
    pub method: Option<String>,
    /// Absolute URL, used verbatim when present. Wins over `endpoint`/`resource`.
    pub url: Option<String>,
    /// Path appended to the configured host.
    pub endpoint: Option<String>,
    /// Fallback path appended to the configured host when `endpoint` is absent.
    pub resource: Option<String>,
    /// Request body. Only structured values (objects, arrays) are sent.
    pub data: Option<Value>,
    /// Caller headers. Applied last, overriding store-derived headers.
    pub headers: Option<HashMap<String, String>>,
    /// Query mapping. `null` entries are dropped, the rest percent-encoded.
    pub query: Option<Map<String, Value>>,
}

// ── Request descriptor ────────────────────────────────────────────────────────

/// Fully-resolved representation of one outgoing call, handed to a
/// [`Transport`](crate::transport::Transport). Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub data: Option<Value>,
    /// `None` when no header applies — never an empty map.
    pub headers: Option<HashMap<String, String>>,
    pub with_credentials: bool,
}

// ── configure ─────────────────────────────────────────────────────────────────

/// Resolve call options against the shared configuration into a concrete
/// request descriptor.
///
/// Pure and infallible: malformed or missing options degrade to missing
/// descriptor fields rather than erroring.
///
/// URL precedence: `options.url` verbatim, else `host + endpoint`, else
/// `host + resource`. A query mapping is appended with a single `?` even if
/// the resolved URL already contains one — consumers that pass both a
/// `?`-bearing URL and a query mapping get the doubled form.
pub fn configure(options: &RequestOptions, config: &RestConfig) -> RequestDescriptor {
    let mut url = resolve_url(options, config);

    if let Some(query) = &options.query {
        if let Some(qs) = serialize_query(query) {
            url.push('?');
            url.push_str(&qs);
        }
    }

    let mut headers = HashMap::new();
    let mut with_credentials = false;

    if let Some(auth) = &config.authorization {
        headers.insert("Authorization".to_string(), auth.clone());
        with_credentials = true;
    }
    if let Some(accept) = &config.accept {
        headers.insert("Accept".to_string(), accept.clone());
    }
    if let Some(content_type) = &config.content_type {
        headers.insert("Content-Type".to_string(), content_type.clone());
    }
    // Caller headers win over store-derived ones.
    if let Some(extra) = &options.headers {
        for (key, value) in extra {
            headers.insert(key.clone(), value.clone());
        }
    }

    let data = options
        .data
        .clone()
        .filter(|d| d.is_object() || d.is_array());

    RequestDescriptor {
        method: options.method.clone().unwrap_or_else(|| "GET".to_string()),
        url,
        data,
        headers: if headers.is_empty() { None } else { Some(headers) },
        with_credentials,
    }
}

fn resolve_url(options: &RequestOptions, config: &RestConfig) -> String {
    if let Some(url) = &options.url {
        return url.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        return format!("{}{}", config.host, endpoint);
    }
    if let Some(resource) = &options.resource {
        return format!("{}{}", config.host, resource);
    }
    config.host.clone()
}

/// Serialize a query mapping in iteration order, dropping `null` entries.
/// Returns `None` when nothing survives, so no stray `?` is appended.
fn serialize_query(query: &Map<String, Value>) -> Option<String> {
    let pairs: Vec<String> = query
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&query_value(value))
            )
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("&"))
    }
}

/// Strings render bare; everything else renders as its JSON form.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
