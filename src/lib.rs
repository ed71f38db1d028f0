//! # Economic
//!
//! > **Domain objects for the e-conomic accounting API.**
//!
//! Debtors, invoices and invoice lines behave like local values: you build them, read and
//! write their properties, and `save` them. Behind the scenes each entity tracks whether it
//! exists remotely and whether its data is complete, and only calls the service when it
//! has to.
//!
//! ## 🚀 Core Concepts
//!
//! ### Partial entities
//! Lookups such as [`DebtorProxy::find_by_ci_number`](proxies::DebtorProxy::find_by_ci_number)
//! return entities that know only their handle. The first read of any other property loads
//! the full record; identity reads (`id`, `number`, `handle`) never do.
//!
//! ### Save is create or update
//! A built entity is created on its first `save` and adopts the identity the service returns.
//! Later saves update it. A [`CurrentInvoice`](model::CurrentInvoice) saves its lines first,
//! in the order they were added, and stops at the first line that fails.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Core ([`economic_core`])
//! The generic `Entity<K>` / `Proxy<K>` machinery, the error taxonomy and the transport
//! boundary. Nothing in it knows about debtors or invoices.
//!
//! ### 2. The Types ([`model`])
//! One schema per e-conomic type, with its defaults and owned children.
//! - **Key items**: [`Debtor`](model::Debtor), [`CurrentInvoice`](model::CurrentInvoice),
//!   [`CurrentInvoiceLine`](model::CurrentInvoiceLine), [`InvoiceLines`](model::InvoiceLines).
//!
//! ### 3. The Interface ([`proxies`], [`connection`])
//! - **Role**: [`Economic`] hands out proxies bound to one session; the proxies add each
//!   type's own lookups on top of the standard ones.
//!
//! ## Example
//!
//! ```rust
//! use economic::{Economic, EntityProxy, InvoiceLines};
//! use economic_core::mock::MockTransport;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockTransport::new();
//! mock.expect("CurrentInvoiceLine_CreateFromData").return_ok(json!({"Number": 1}));
//! mock.expect("CurrentInvoice_CreateFromData").return_ok(json!({"Id": 501}));
//!
//! let economic = Economic::from_session(mock.session());
//! let mut invoice = economic.current_invoices().build();
//! invoice.set("heading", "Consulting, March").unwrap();
//!
//! let mut line = economic.current_invoice_lines().build();
//! line.set("description", "Workshop").unwrap();
//! invoice.add_line(line);
//!
//! invoice.save().await.unwrap();
//! assert_eq!(invoice.id(), Some(&json!(501)));
//! # }
//! ```
//!
//! ## Logging
//!
//! Call [`economic_core::logging::setup_tracing`] once at startup and set `RUST_LOG`.

pub mod connection;
pub mod model;
pub mod proxies;

pub use connection::Economic;
pub use economic_core::{
    Criteria, EconomicError, EconomicResult, Entity, EntityProxy, Handle, Session, SessionConfig, Transport,
    TransportError,
};
pub use model::{CurrentInvoice, CurrentInvoiceLine, Debtor, InvoiceLines};
pub use proxies::{CurrentInvoiceProxy, DebtorProxy};
