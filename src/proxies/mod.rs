//! Per-type proxies wrapping [`Proxy`](economic_core::Proxy).
//!
//! Types without extra operations, like `CurrentInvoiceLine`, use `Proxy<K>` directly.

mod current_invoice_proxy;
mod debtor_proxy;

pub use current_invoice_proxy::CurrentInvoiceProxy;
pub use debtor_proxy::DebtorProxy;
