use crate::proxies::DebtorProxy;
use economic_core::{Entity, Property, Resource, Schema};
use serde_json::json;

/// A customer account in e-conomic.
///
/// Debtors are identified by their number; the service assigns one on create unless
/// [`Entity::assign_number`] was used (see [`DebtorProxy::next_available_number`]).
#[derive(Debug)]
pub struct Debtor;

static DEBTOR: Schema = Schema {
    entity: "Debtor",
    handle_field: "debtor_handle",
    properties: &[
        Property::identity("handle", "Handle"),
        Property::identity("number", "Number"),
        Property::handle("debtor_group_handle", "DebtorGroupHandle"),
        Property::text("name", "Name"),
        Property::text("vat_zone", "VatZone"),
        Property::handle("currency_handle", "CurrencyHandle"),
        Property::handle("price_group_handle", "PriceGroupHandle"),
        Property::boolean("is_accessible", "IsAccessible"),
        Property::text("ean", "Ean"),
        Property::text("public_entry_number", "PublicEntryNumber"),
        Property::text("email", "Email"),
        Property::text("telephone_and_fax_number", "TelephoneAndFaxNumber"),
        Property::text("website", "Website"),
        Property::text("address", "Address"),
        Property::text("postal_code", "PostalCode"),
        Property::text("city", "City"),
        Property::text("country", "Country"),
        Property::decimal("credit_maximum", "CreditMaximum"),
        Property::text("vat_number", "VatNumber"),
        Property::text("county", "County"),
        Property::text("ci_number", "CINumber"),
        Property::handle("term_of_payment_handle", "TermOfPaymentHandle"),
        Property::handle("layout_handle", "LayoutHandle"),
        Property::handle("attention_handle", "AttentionHandle"),
        Property::handle("our_reference_handle", "OurReferenceHandle"),
        Property::decimal("balance", "Balance"),
    ],
    deletable: true,
};

impl Resource for Debtor {
    type Proxy = DebtorProxy;
    type Owned = ();

    fn schema() -> &'static Schema {
        &DEBTOR
    }

    fn initialize_defaults(entity: &mut Entity<Self>) {
        let defaults = json!({
            "vat_zone": "HomeCountry",
            "is_accessible": true,
            "currency_handle": {"Code": "DKK"},
            "debtor_group_handle": {"Number": 1},
            "term_of_payment_handle": {"Id": 1},
            "layout_handle": {"Id": 16},
        });
        if let Some(defaults) = defaults.as_object() {
            entity.update_properties(defaults);
        }
    }
}
