use super::CurrentInvoiceLine;
use crate::proxies::CurrentInvoiceProxy;
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use economic_core::schema::date_value;
use economic_core::{EconomicResult, Entity, Property, Resource, Schema};
use serde_json::{json, Value};
use tracing::debug;

/// A draft invoice. It owns its lines and saves them along with itself.
#[derive(Debug)]
pub struct CurrentInvoice;

static CURRENT_INVOICE: Schema = Schema {
    entity: "CurrentInvoice",
    handle_field: "current_invoice_handle",
    properties: &[
        Property::identity("handle", "Handle"),
        Property::identity("id", "Id"),
        Property::handle("debtor_handle", "DebtorHandle"),
        Property::text("debtor_name", "DebtorName"),
        Property::text("debtor_address", "DebtorAddress"),
        Property::text("debtor_postal_code", "DebtorPostalCode"),
        Property::text("debtor_city", "DebtorCity"),
        Property::text("debtor_country", "DebtorCountry"),
        Property::handle("attention_handle", "AttentionHandle"),
        Property::date("date", "Date"),
        Property::handle("term_of_payment_handle", "TermOfPaymentHandle"),
        Property::date("due_date", "DueDate"),
        Property::handle("currency_handle", "CurrencyHandle"),
        Property::decimal("exchange_rate", "ExchangeRate"),
        Property::boolean("is_vat_included", "IsVatIncluded"),
        Property::handle("layout_handle", "LayoutHandle"),
        Property::date("delivery_date", "DeliveryDate"),
        Property::text("heading", "Heading"),
        Property::text("text_line1", "TextLine1"),
        Property::text("text_line2", "TextLine2"),
        Property::text("other_reference", "OtherReference"),
        Property::decimal("net_amount", "NetAmount"),
        Property::decimal("vat_amount", "VatAmount"),
        Property::decimal("gross_amount", "GrossAmount"),
        Property::decimal("margin", "Margin"),
        Property::decimal("margin_as_percent", "MarginAsPercent"),
    ],
    deletable: true,
};

/// Days from the invoice date to the default due date.
pub const DEFAULT_PAYMENT_DAYS: u64 = 8;

/// Initial values of a new invoice dated `today`.
fn defaults(today: NaiveDate) -> Value {
    let due = today.checked_add_days(Days::new(DEFAULT_PAYMENT_DAYS)).unwrap_or(today);
    json!({
        "date": date_value(today),
        "due_date": date_value(due),
        "exchange_rate": 100,
        "is_vat_included": false,
        "net_amount": 0,
        "vat_amount": 0,
        "gross_amount": 0,
        "margin": 0,
        "margin_as_percent": 0,
    })
}

#[async_trait]
impl Resource for CurrentInvoice {
    type Proxy = CurrentInvoiceProxy;
    type Owned = Vec<Entity<CurrentInvoiceLine>>;

    fn schema() -> &'static Schema {
        &CURRENT_INVOICE
    }

    fn initialize_defaults(entity: &mut Entity<Self>) {
        let defaults = defaults(Local::now().date_naive());
        if let Some(defaults) = defaults.as_object() {
            entity.update_properties(defaults);
        }
    }

    /// Saves every line in order, each pointed at this invoice and its session.
    async fn save_owned(invoice: &mut Entity<Self>) -> EconomicResult<()> {
        let session = invoice.session().clone();
        let handle = invoice.handle();

        for (position, line) in invoice.owned_mut().iter_mut().enumerate() {
            line.attach(session.clone());
            if !handle.is_empty() {
                line.set("invoice_handle", handle.to_value())?;
            }
            debug!(position, "Saving line");
            line.save().await?;
        }
        Ok(())
    }
}

/// Access to the lines of a [`CurrentInvoice`].
pub trait InvoiceLines {
    fn lines(&self) -> &[Entity<CurrentInvoiceLine>];

    fn lines_mut(&mut self) -> &mut Vec<Entity<CurrentInvoiceLine>>;

    /// Appends a line; it is saved with the invoice's next save.
    fn add_line(&mut self, line: Entity<CurrentInvoiceLine>) {
        self.lines_mut().push(line);
    }
}

impl InvoiceLines for Entity<CurrentInvoice> {
    fn lines(&self) -> &[Entity<CurrentInvoiceLine>] {
        self.owned()
    }

    fn lines_mut(&mut self) -> &mut Vec<Entity<CurrentInvoiceLine>> {
        self.owned_mut()
    }
}
