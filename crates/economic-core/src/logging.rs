//! # Logging
//!
//! Structured logging via `tracing`. Proxy and entity operations open spans carrying the
//! entity type, so a cascade save reads as a hierarchy:
//!
//! ```text
//! INFO save{entity="CurrentInvoice"}:save{entity="CurrentInvoiceLine"}: Created
//! INFO save{entity="CurrentInvoice"}: Created
//! ```
//!
//! Verbosity follows `RUST_LOG`; `RUST_LOG=debug` adds full request payloads.

/// Installs the global subscriber. Panics if one is already installed.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns `false` instead of panicking when a subscriber
/// is already installed.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
