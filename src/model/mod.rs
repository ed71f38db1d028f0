//! # Entity Types
//!
//! The e-conomic types this crate knows about. Each is a marker type implementing
//! [`Resource`](economic_core::Resource): a static schema listing its fields, its paired
//! proxy, and its defaults.

mod current_invoice;
mod current_invoice_line;
mod debtor;

pub use current_invoice::{CurrentInvoice, InvoiceLines};
pub use current_invoice_line::CurrentInvoiceLine;
pub use debtor::Debtor;
