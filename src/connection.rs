use crate::model::CurrentInvoiceLine;
use crate::proxies::{CurrentInvoiceProxy, DebtorProxy};
use economic_core::{EntityProxy, Proxy, Session, SessionConfig, Transport};
use tracing::info;

/// Entry point to one e-conomic agreement.
///
/// `Economic` owns a [`Session`] and hands out proxies bound to it. Everything built or
/// found through those proxies shares the session.
///
/// # Example
///
/// ```ignore
/// let economic = Economic::connect(SessionConfig::from_file("economic.toml")?, transport);
///
/// let mut debtor = economic.debtors().build();
/// debtor.set("name", "Nordic Timber ApS")?;
/// debtor.save().await?;
///
/// for mut invoice in economic.current_invoices().all().await? {
///     println!("{:?}", invoice.get("heading").await?);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Economic {
    session: Session,
}

impl Economic {
    pub fn connect(config: SessionConfig, transport: impl Transport + 'static) -> Self {
        info!(agreement = config.agreement_number, user = %config.user_name, "Connecting");
        Self::from_session(Session::new(config, transport))
    }

    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn debtors(&self) -> DebtorProxy {
        DebtorProxy::from_session(self.session.clone())
    }

    pub fn current_invoices(&self) -> CurrentInvoiceProxy {
        CurrentInvoiceProxy::from_session(self.session.clone())
    }

    pub fn current_invoice_lines(&self) -> Proxy<CurrentInvoiceLine> {
        Proxy::new(self.session.clone())
    }
}
