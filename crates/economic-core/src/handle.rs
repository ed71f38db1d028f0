//! # Handle
//!
//! A [`Handle`] is the lightweight identity of a remote entity: an optional `id` and an
//! optional `number`. Lookups return handles, partial entities are built from them, and
//! every remote operation that targets a single entity is keyed by one.
//!
//! Handles are plain values. They are compared structurally, never mutated after
//! construction, and a handle with neither field set is a valid (if unresolved) reference.

use crate::transport::Payload;
use serde_json::Value;
use std::fmt;

/// Wire key for the internal identifier.
pub const ID_FIELD: &str = "Id";
/// Wire key for the external number.
pub const NUMBER_FIELD: &str = "Number";

/// Identity pair of a remote entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handle {
    id: Option<Value>,
    number: Option<Value>,
}

impl Handle {
    /// Builds a handle from an optional id and an optional number.
    ///
    /// Blank values (`null`, empty strings, empty records) count as absent.
    pub fn new(id: Option<Value>, number: Option<Value>) -> Self {
        Self {
            id: id.filter(|v| !is_blank(v)),
            number: number.filter(|v| !is_blank(v)),
        }
    }

    pub fn from_id(id: impl Into<Value>) -> Self {
        Self::new(Some(id.into()), None)
    }

    pub fn from_number(number: impl Into<Value>) -> Self {
        Self::new(None, Some(number.into()))
    }

    /// Reads a handle out of a response value.
    ///
    /// Records are searched for `id`/`Id` and `number`/`Number` keys. A bare scalar is
    /// taken as a number. Anything else yields an empty handle.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(record) => Self::new(
                field(record, ID_FIELD).cloned(),
                field(record, NUMBER_FIELD).cloned(),
            ),
            Value::String(_) | Value::Number(_) => Self::new(None, Some(value.clone())),
            _ => Self::default(),
        }
    }

    /// Reads the identity returned by a create call.
    ///
    /// Returns `None` when the response has a shape no identity can be read from. A
    /// `null` response is a confirmed write without identity and yields an empty handle.
    pub fn from_response(response: &Value) -> Option<Self> {
        match response {
            Value::Null => Some(Self::default()),
            Value::Object(_) => Some(Self::from_value(response)),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn number(&self) -> Option<&Value> {
        self.number.as_ref()
    }

    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.number.is_none()
    }

    /// Serializes to the transport's handle record, leaving out absent fields.
    pub fn to_transport_fields(&self) -> Payload {
        let mut fields = Payload::new();
        if let Some(id) = &self.id {
            fields.insert(ID_FIELD.to_string(), id.clone());
        }
        if let Some(number) = &self.number {
            fields.insert(NUMBER_FIELD.to_string(), number.clone());
        }
        fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_transport_fields())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Case-insensitive key lookup; responses arrive both as `number` and `Number`.
pub(crate) fn field<'a>(record: &'a Payload, key: &str) -> Option<&'a Value> {
    record
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// `null`, whitespace-only strings and empty collections carry no value.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(record) => record.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(Handle::new(Some(json!(1)), Some(json!("42"))), Handle::new(Some(json!(1)), Some(json!("42"))));
        assert_ne!(Handle::from_id(1), Handle::from_number(1));
        assert_ne!(Handle::new(Some(json!(1)), Some(json!(2))), Handle::from_id(1));
    }

    #[test]
    fn test_empty_handles_are_equal() {
        assert_eq!(Handle::default(), Handle::new(None, None));
        assert_eq!(Handle::default(), Handle::new(Some(json!("")), Some(Value::Null)));
        assert!(Handle::default().is_empty());
    }

    #[test]
    fn test_to_transport_fields_omits_absent() {
        assert!(Handle::default().to_transport_fields().is_empty());

        let fields = Handle::from_number(7).to_transport_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("Number"), Some(&json!(7)));

        let both = Handle::new(Some(json!(3)), Some(json!(7))).to_value();
        assert_eq!(both, json!({"Id": 3, "Number": 7}));
    }

    #[test]
    fn test_from_value_accepts_either_key_case() {
        assert_eq!(Handle::from_value(&json!({"number": "101"})), Handle::from_number("101"));
        assert_eq!(Handle::from_value(&json!({"Id": 9, "Number": 2})), Handle::new(Some(json!(9)), Some(json!(2))));
        assert_eq!(Handle::from_value(&json!(5)), Handle::from_number(5));
        assert!(Handle::from_value(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_from_response_rejects_unreadable_shapes() {
        assert_eq!(Handle::from_response(&Value::Null), Some(Handle::default()));
        assert_eq!(Handle::from_response(&json!({"id": 12})), Some(Handle::from_id(12)));
        assert_eq!(Handle::from_response(&json!("12")), None);
        assert_eq!(Handle::from_response(&json!([{"id": 12}])), None);
    }
}
