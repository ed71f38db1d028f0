use economic_core::{Entity, Property, Proxy, Resource, Schema};
use serde_json::json;

/// One line of a [`CurrentInvoice`](super::CurrentInvoice).
///
/// Lines are usually saved through their invoice, which points `invoice_handle` at itself
/// before saving them.
#[derive(Debug)]
pub struct CurrentInvoiceLine;

static CURRENT_INVOICE_LINE: Schema = Schema {
    entity: "CurrentInvoiceLine",
    handle_field: "current_invoice_line_handle",
    properties: &[
        Property::identity("handle", "Handle"),
        Property::identity("number", "Number"),
        Property::handle("invoice_handle", "InvoiceHandle"),
        Property::text("description", "Description"),
        Property::date("delivery_date", "DeliveryDate"),
        Property::handle("unit_handle", "UnitHandle"),
        Property::handle("product_handle", "ProductHandle"),
        Property::decimal("quantity", "Quantity"),
        Property::decimal("unit_net_price", "UnitNetPrice"),
        Property::decimal("discount_as_percent", "DiscountAsPercent"),
        Property::decimal("unit_cost_price", "UnitCostPrice"),
        Property::decimal("total_net_amount", "TotalNetAmount"),
        Property::decimal("total_margin", "TotalMargin"),
        Property::decimal("margin_as_percent", "MarginAsPercent"),
    ],
    deletable: true,
};

impl Resource for CurrentInvoiceLine {
    type Proxy = Proxy<CurrentInvoiceLine>;
    type Owned = ();

    fn schema() -> &'static Schema {
        &CURRENT_INVOICE_LINE
    }

    fn initialize_defaults(entity: &mut Entity<Self>) {
        let defaults = json!({
            "discount_as_percent": 0,
            "unit_cost_price": 0,
            "total_margin": 0,
            "margin_as_percent": 0,
        });
        if let Some(defaults) = defaults.as_object() {
            entity.update_properties(defaults);
        }
    }
}
