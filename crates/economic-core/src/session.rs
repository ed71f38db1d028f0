//! # Session
//!
//! A [`Session`] binds a [`SessionConfig`] to a [`Transport`]. It is passed explicitly into
//! every proxy and entity; there is no ambient connection. Clones share the same config
//! and transport, and nothing in the core mutates either.

use crate::config::SessionConfig;
use crate::transport::{Payload, Transport, TransportError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct Session {
    config: Arc<SessionConfig>,
    transport: Arc<dyn Transport>,
}

impl Session {
    pub fn new(config: SessionConfig, transport: impl Transport + 'static) -> Self {
        Self::with_transport(config, Arc::new(transport))
    }

    /// Builds a session over a transport that is already shared elsewhere.
    pub fn with_transport(config: SessionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True when both values are clones of one session.
    pub fn same_as(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.config, &other.config)
    }

    /// Sends one operation through the transport and waits for its answer.
    #[instrument(skip(self, payload), fields(agreement = self.config.agreement_number))]
    pub async fn request(&self, operation: &str, payload: Payload) -> Result<Value, TransportError> {
        debug!(?payload, "Sending request");
        let result = self.transport.invoke(operation, payload).await;
        match &result {
            Ok(_) => debug!("Response received"),
            Err(e) => warn!(error = %e, "Request failed"),
        }
        result
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("agreement_number", &self.config.agreement_number)
            .field("endpoint", &self.config.endpoint)
            .finish_non_exhaustive()
    }
}
