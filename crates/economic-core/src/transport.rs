//! # Transport Gateway
//!
//! The core never speaks the wire protocol itself. It hands an operation name and a payload
//! to a [`Transport`] and gets back a structured response or a [`TransportError`].
//! Serialization, authentication, retries and timeouts all live behind this trait.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

/// Flat mapping sent to, and received from, the remote service.
pub type Payload = Map<String, Value>;

/// Executes named remote operations.
///
/// # Contract
/// - `operation` is the canonical identifier, e.g. `CurrentInvoice_CreateFromData`.
/// - The response mirrors the request schema of the operation. Lookups may answer with
///   nothing, a single bare value, or a sequence; the core normalizes all three.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, operation: &str, payload: Payload) -> Result<Value, TransportError>;
}

/// Failures raised by the gateway.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The service answered with a fault.
    #[error("remote fault {code}: {message}")]
    Fault { code: String, message: String },
}

/// Logical actions shared by every entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateFromData,
    UpdateFromData,
    GetData,
    GetAll,
    FindByHandle,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::CreateFromData => "CreateFromData",
            Action::UpdateFromData => "UpdateFromData",
            Action::GetData => "GetData",
            Action::GetAll => "GetAll",
            Action::FindByHandle => "FindByHandle",
            Action::Delete => "Delete",
        }
    }

    /// Whether a remote fault for this action means the payload was rejected.
    pub fn is_write(self) -> bool {
        matches!(self, Action::CreateFromData | Action::UpdateFromData)
    }
}
