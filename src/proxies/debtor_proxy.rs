//! # Debtor Proxy
//!
//! Remote operations for [`Debtor`]s. It wraps a `Proxy<Debtor>` and adds the lookups
//! e-conomic offers for debtors.
use crate::model::Debtor;
use economic_core::{Criteria, EconomicResult, Entity, EntityProxy, Payload, Proxy, Session};
use serde_json::Value;
use tracing::{debug, instrument};

/// Proxy for the Debtor entity type.
#[derive(Clone)]
pub struct DebtorProxy {
    inner: Proxy<Debtor>,
}

impl DebtorProxy {
    pub fn new(inner: Proxy<Debtor>) -> Self {
        Self { inner }
    }
}

impl EntityProxy<Debtor> for DebtorProxy {
    fn from_session(session: Session) -> Self {
        Self::new(Proxy::new(session))
    }

    fn inner(&self) -> &Proxy<Debtor> {
        &self.inner
    }
}

impl DebtorProxy {
    /// Debtors registered under a company registration (CI) number. Results are partial.
    #[instrument(skip(self))]
    pub async fn find_by_ci_number(&self, ci_number: &str) -> EconomicResult<Vec<Entity<Debtor>>> {
        debug!("Sending request");
        self.find_by_criteria(Criteria::new("FindByCINumber").param("ciNumber", ci_number))
            .await
    }

    /// Debtors with exactly this name. Results are partial.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> EconomicResult<Vec<Entity<Debtor>>> {
        debug!("Sending request");
        self.find_by_criteria(Criteria::new("FindByName").param("name", name))
            .await
    }

    /// The next unused debtor number, as returned by the service.
    #[instrument(skip(self))]
    pub async fn next_available_number(&self) -> EconomicResult<Value> {
        debug!("Sending request");
        self.inner.request("GetNextAvailableNumber", Payload::new()).await
    }
}
