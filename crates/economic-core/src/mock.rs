//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] stands in for the remote service. You queue the operations you expect,
//! in order, together with the response each should get; the mock answers them and records
//! every invocation for later assertions.
//!
//! | Need | Use |
//! |------|-----|
//! | Canned answer | `mock.expect("Debtor_GetData").return_ok(json!({...}))` |
//! | Remote failure | `mock.expect("Debtor_CreateFromData").return_err(TransportError::Fault { .. })` |
//! | What was sent | `mock.invocations()` |
//! | How often | `mock.count("Debtor_GetData")` |
//! | Nothing left over | `mock.verify()` |
//!
//! An operation that was not expected, or arrives out of order, panics the test.
//!
//! ```rust
//! use economic_core::mock::MockTransport;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockTransport::new();
//! mock.expect("Debtor_GetNextAvailableNumber").return_ok(json!(1001));
//!
//! let session = mock.session();
//! let next = session
//!     .request("Debtor_GetNextAvailableNumber", Default::default())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(next, json!(1001));
//! mock.verify();
//! # }
//! ```

use crate::config::SessionConfig;
use crate::session::Session;
use crate::transport::{Payload, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub operation: String,
    pub payload: Payload,
}

struct Expectation {
    operation: String,
    response: Result<Value, TransportError>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    invocations: Vec<Invocation>,
}

/// A scripted [`Transport`]. Clones share the same script and recordings.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh session over this transport, with placeholder credentials.
    pub fn session(&self) -> Session {
        Session::new(SessionConfig::new(1, "mock", "mock"), self.clone())
    }

    /// Queues an expected operation.
    pub fn expect(&self, operation: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            operation: operation.into(),
            state: self.state.clone(),
        }
    }

    /// Everything received so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().unwrap().invocations.clone()
    }

    /// How many times `operation` was received.
    pub fn count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .invocations
            .iter()
            .filter(|i| i.operation == operation)
            .count()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            let remaining: Vec<&str> = state.expectations.iter().map(|e| e.operation.as_str()).collect();
            panic!("Not all expectations were met. Remaining: {remaining:?}");
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn invoke(&self, operation: &str, payload: Payload) -> Result<Value, TransportError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.invocations.push(Invocation {
                operation: operation.to_string(),
                payload,
            });
            state.expectations.pop_front()
        };

        match expectation {
            Some(expectation) if expectation.operation == operation => expectation.response,
            Some(expectation) => panic!(
                "Expected `{}` but received `{operation}`",
                expectation.operation
            ),
            None => panic!("Unexpected request `{operation}`"),
        }
    }
}

/// Builder for one expectation.
pub struct ExpectationBuilder {
    operation: String,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Sets the expectation to return a successful response.
    pub fn return_ok(self, response: Value) {
        self.push(Ok(response));
    }

    /// Sets the expectation to fail.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, TransportError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation {
            operation: self.operation,
            response,
        });
    }
}
