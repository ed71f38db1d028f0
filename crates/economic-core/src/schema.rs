//! # Schema
//!
//! Each entity type declares its properties once, as a static [`Schema`]. The generic
//! [`Entity`](crate::Entity) reads, writes, merges and serializes properties by consulting
//! it, so adding an entity type never means writing accessors by hand.

use crate::handle::Handle;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// Wire format of dates: the service speaks `xs:dateTime`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Property names that identify an entity and never trigger a load.
pub const IDENTITY_PROPERTIES: [&str; 3] = ["id", "number", "handle"];

/// How a property's value is interpreted when it arrives from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `id`, `number` or `handle`; stored on the entity rather than as a property.
    Identity,
    Text,
    Integer,
    /// Amounts. Kept as a JSON number when `f64` holds them exactly, as a decimal string
    /// otherwise; read them with `get_as::<Decimal>` for exact arithmetic.
    Decimal,
    Boolean,
    /// A calendar date, kept in [`DATE_FORMAT`].
    Date,
    /// A reference to another entity, kept as an `{"Id", "Number"}` record.
    Handle,
}

impl Kind {
    /// Normalizes a response value. SOAP answers are often stringly typed
    /// (`"12.50"`, `"true"`); values that do not parse are kept as received.
    pub fn coerce(self, value: Value) -> Value {
        match (self, value) {
            (Kind::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(s),
            },
            (Kind::Decimal, Value::String(s)) => match s.trim().parse::<Decimal>() {
                Ok(amount) => decimal_value(amount),
                Err(_) => Value::String(s),
            },
            (Kind::Boolean, Value::String(s)) => match s.trim() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(s),
            },
            (Kind::Date, Value::String(s)) => match parse_date(s.trim()) {
                Some(date) => date_value(date),
                None => Value::String(s),
            },
            // Records keyed otherwise (currencies use `Code`) are kept as received.
            (Kind::Handle, record @ Value::Object(_)) => match Handle::from_value(&record) {
                handle if handle.is_empty() => record,
                handle => handle.to_value(),
            },
            (_, other) => other,
        }
    }
}

/// A date as the service expects it, e.g. `2024-03-01T00:00:00`.
pub fn date_value(date: NaiveDate) -> Value {
    Value::String(date.and_time(chrono::NaiveTime::MIN).format(DATE_FORMAT).to_string())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    s.parse::<NaiveDateTime>()
        .map(|dt| dt.date())
        .or_else(|_| s.parse::<NaiveDate>())
        .ok()
}

/// A number if `f64` round-trips the amount, otherwise the exact decimal text.
fn decimal_value(amount: Decimal) -> Value {
    let exact = amount
        .to_f64()
        .filter(|f| f.to_string().parse::<Decimal>() == Ok(amount))
        .and_then(Number::from_f64);
    match exact {
        Some(n) => Value::Number(n),
        None => Value::String(amount.normalize().to_string()),
    }
}

/// One declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    /// Name used by callers, e.g. `vat_zone`.
    pub name: &'static str,
    /// Name used on the wire, e.g. `VatZone`.
    pub wire: &'static str,
    pub kind: Kind,
}

impl Property {
    pub const fn new(name: &'static str, wire: &'static str, kind: Kind) -> Self {
        Self { name, wire, kind }
    }

    pub const fn identity(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Identity)
    }

    pub const fn text(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Text)
    }

    pub const fn integer(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Integer)
    }

    pub const fn decimal(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Decimal)
    }

    pub const fn boolean(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Boolean)
    }

    pub const fn date(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Date)
    }

    pub const fn handle(name: &'static str, wire: &'static str) -> Self {
        Self::new(name, wire, Kind::Handle)
    }

    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.wire == key
    }
}

/// The declaration of one entity type.
#[derive(Debug)]
pub struct Schema {
    /// Type name as the service spells it, e.g. `CurrentInvoice`.
    pub entity: &'static str,
    /// Response field holding lookup results, e.g. `current_invoice_handle`.
    pub handle_field: &'static str,
    /// Declared properties; their order is the payload order.
    pub properties: &'static [Property],
    /// Whether the service offers a delete operation for this type.
    pub deletable: bool,
}

impl Schema {
    /// Finds a declared property by caller name or wire name.
    pub fn property(&self, key: &str) -> Option<&'static Property> {
        self.properties.iter().find(|p| p.matches(key))
    }

    /// Canonical operation identifier, e.g. `Debtor_FindByCINumber`.
    pub fn operation(&self, action: &str) -> String {
        format!("{}_{}", self.entity, action)
    }

    /// True when `key` names the lookup result field, in snake or wire spelling.
    pub fn is_handle_field(&self, key: &str) -> bool {
        key == self.handle_field
            || key
                .strip_suffix("Handle")
                .is_some_and(|entity| entity == self.entity)
    }
}

/// Which part of the identity a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdentityKey {
    Id,
    Number,
    Handle,
}

pub(crate) fn identity_key(key: &str) -> Option<IdentityKey> {
    if key.eq_ignore_ascii_case(IDENTITY_PROPERTIES[0]) {
        Some(IdentityKey::Id)
    } else if key.eq_ignore_ascii_case(IDENTITY_PROPERTIES[1]) {
        Some(IdentityKey::Number)
    } else if key.eq_ignore_ascii_case(IDENTITY_PROPERTIES[2]) {
        Some(IdentityKey::Handle)
    } else {
        None
    }
}
