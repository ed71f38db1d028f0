//! # Errors
//!
//! Every failure of a core operation is an [`EconomicError`]. Remote failures are terminal
//! for the operation that hit them: nothing is retried and no local state is rolled back,
//! because local state is only changed after a confirmed success.

use crate::handle::Handle;
use crate::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum EconomicError {
    /// A fetch or reload found no matching remote entity.
    #[error("{entity} not found: {handle}")]
    NotFound { entity: &'static str, handle: Handle },

    /// The service rejected a create or update payload.
    #[error("{operation} rejected ({code}): {message}")]
    Validation {
        operation: String,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed response from {operation}: {reason}")]
    MalformedResponse { operation: String, reason: String },

    #[error("{entity} has no property `{property}`")]
    UnknownProperty {
        entity: &'static str,
        property: String,
    },

    #[error("`{property}` is part of the entity identity and cannot be written as a property")]
    IdentityProperty { property: String },

    #[error("{entity} is already persisted; its identity belongs to the service")]
    AlreadyPersisted { entity: &'static str },

    #[error("{entity} does not support {action}")]
    Unsupported {
        entity: &'static str,
        action: &'static str,
    },

    #[error("`{property}` does not hold the requested type: {source}")]
    InvalidValue {
        property: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type EconomicResult<T> = Result<T, EconomicError>;
