//! # Current Invoice Proxy
//!
//! Remote operations for draft invoices.
use crate::model::CurrentInvoice;
use economic_core::{Criteria, EconomicResult, Entity, EntityProxy, Proxy, Session};
use tracing::{debug, instrument};

/// Proxy for the CurrentInvoice entity type.
#[derive(Clone)]
pub struct CurrentInvoiceProxy {
    inner: Proxy<CurrentInvoice>,
}

impl CurrentInvoiceProxy {
    pub fn new(inner: Proxy<CurrentInvoice>) -> Self {
        Self { inner }
    }
}

impl EntityProxy<CurrentInvoice> for CurrentInvoiceProxy {
    fn from_session(session: Session) -> Self {
        Self::new(Proxy::new(session))
    }

    fn inner(&self) -> &Proxy<CurrentInvoice> {
        &self.inner
    }
}

impl CurrentInvoiceProxy {
    /// Draft invoices carrying this `OtherReference`. Results are partial.
    #[instrument(skip(self))]
    pub async fn find_by_other_reference(&self, reference: &str) -> EconomicResult<Vec<Entity<CurrentInvoice>>> {
        debug!("Sending request");
        self.find_by_criteria(Criteria::new("FindByOtherReference").param("otherReference", reference))
            .await
    }
}
