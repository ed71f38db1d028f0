//! # Economic Core
//!
//! Client-side domain objects over a remote accounting service. Callers work with local
//! [`Entity`] values whose identity, persistence and completeness are tracked separately;
//! remote calls happen only when data is missing or a save is requested.
//!
//! ## Architecture Overview
//!
//! 1. **Identity** ([`Handle`]) - an `(id, number)` pair that references a remote entity
//!    without loading it.
//! 2. **Entity** ([`Entity`], [`Resource`]) - the persistence state machine
//!    (unsaved → created → updated) and the partial/full loading state machine.
//! 3. **Proxy** ([`Proxy`], [`EntityProxy`]) - per-type gateway for fetch, lookup, create,
//!    update and delete.
//! 4. **Transport** ([`Transport`], [`Session`]) - the wire boundary; the core only ever
//!    sees an operation name, a payload, and a structured response.
//!
//! ## Declaring an entity type
//!
//! ```rust
//! use economic_core::{Entity, Property, Proxy, Resource, Schema};
//!
//! #[derive(Debug)]
//! struct Unit;
//!
//! static UNIT: Schema = Schema {
//!     entity: "Unit",
//!     handle_field: "unit_handle",
//!     properties: &[
//!         Property::identity("handle", "Handle"),
//!         Property::identity("number", "Number"),
//!         Property::text("name", "Name"),
//!     ],
//!     deletable: true,
//! };
//!
//! impl Resource for Unit {
//!     type Proxy = Proxy<Unit>;
//!     type Owned = ();
//!
//!     fn schema() -> &'static Schema {
//!         &UNIT
//!     }
//! }
//! ```
//!
//! ## Lazy loading
//!
//! ```rust
//! # use economic_core::{Entity, EntityProxy, Property, Proxy, Resource, Schema};
//! # #[derive(Debug)] struct Unit;
//! # static UNIT: Schema = Schema { entity: "Unit", handle_field: "unit_handle",
//! #     properties: &[Property::identity("number", "Number"), Property::text("name", "Name")], deletable: true };
//! # impl Resource for Unit { type Proxy = Proxy<Unit>; type Owned = ();
//! #     fn schema() -> &'static Schema { &UNIT } }
//! use economic_core::mock::MockTransport;
//! use economic_core::Criteria;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockTransport::new();
//! mock.expect("Unit_FindByName").return_ok(json!({"unit_handle": {"Number": 2}}));
//! mock.expect("Unit_GetData").return_ok(json!({"Number": 2, "Name": "pcs."}));
//!
//! let units = Proxy::<Unit>::new(mock.session());
//! let mut found = units
//!     .find_by_criteria(Criteria::new("FindByName").param("name", "pcs."))
//!     .await
//!     .unwrap();
//!
//! // Identity is known without a load ...
//! assert_eq!(found[0].number(), Some(&json!(2)));
//! // ... the first property read loads the rest.
//! assert_eq!(found[0].get("name").await.unwrap(), Some(json!("pcs.")));
//! assert!(!found[0].is_partial());
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! Every operation awaits its remote call before returning; there is no background
//! loading and no request de-duplication. A session is meant for one logical flow at a
//! time. Timeouts and cancellation belong to the [`Transport`].
//!
//! ## Testing
//!
//! [`mock::MockTransport`] scripts the remote side. See the [`mock`] module.

pub mod config;
pub mod entity;
pub mod error;
pub mod handle;
pub mod logging;
pub mod mock;
pub mod proxy;
pub mod schema;
pub mod session;
pub mod transport;

// Re-export core types for convenience
pub use config::{ConfigError, SessionConfig};
pub use entity::{Entity, Resource};
pub use error::{EconomicError, EconomicResult};
pub use handle::Handle;
pub use proxy::{Criteria, EntityProxy, Proxy};
pub use schema::{Kind, Property, Schema};
pub use session::Session;
pub use transport::{Action, Payload, Transport, TransportError};
