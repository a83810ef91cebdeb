use serde_json::Value;
use thiserror::Error;

/// Failure of one transport call, categorized for consumers.
///
/// `Network` means no HTTP response was obtained at all; `Status` carries a
/// response with a non-success status and its (best-effort decoded) body.
/// The client never interprets these — branching on the category is the
/// consumer's job.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("HTTP {status}")]
    Status { status: u16, body: Value },
}

impl TransportError {
    /// HTTP status of a `Status` failure; `None` for transport-level failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Network(_) => None,
            TransportError::Status { status, .. } => Some(*status),
        }
    }

    /// The distinguished "unauthorized" case consumers branch on to prompt
    /// for credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
