//! # Entity
//!
//! [`Entity<K>`] is the local stand-in for one remote business object of type `K`. It keeps
//! the identity, an in-memory property set and two state flags:
//!
//! | State                         | `persisted` | `partial` |
//! |-------------------------------|-------------|-----------|
//! | built locally, or deleted     | false       | true      |
//! | found by a lookup (handle)    | true        | true      |
//! | fetched, created or updated   | true        | false     |
//!
//! Reading a property that is not in memory on a *partial, persisted* entity reloads it
//! from the service first. Identity (`id`, `number`, `handle`) never triggers a reload:
//! the reload itself needs it, and comparing identities must stay free.
//!
//! `save` creates or updates depending on `persisted`. Types that own children (an invoice
//! and its lines) save them first through [`Resource::save_owned`].

use crate::error::{EconomicError, EconomicResult};
use crate::handle::{is_blank, Handle};
use crate::proxy::EntityProxy;
use crate::schema::{identity_key, IdentityKey, Kind, Schema};
use crate::session::Session;
use crate::transport::{Action, Payload};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

/// Registration of a concrete entity type.
///
/// Implementing this trait is all a new entity type needs: the schema drives property
/// access, `Proxy` names the gateway used for its remote operations, and the hooks cover
/// defaults and owned children.
///
/// # Provided Methods (Hooks)
/// - [`Resource::initialize_defaults`] runs when an entity is built locally.
/// - [`Resource::save_owned`] runs at the start of every save.
///
/// Both do nothing by default.
#[async_trait]
pub trait Resource: Sized + Send + Sync + 'static {
    /// The proxy type paired with this entity type.
    type Proxy: EntityProxy<Self>;

    /// Children owned by the entity and cascade-saved with it. Use `()` if there are none.
    type Owned: Default + Debug + Send + Sync;

    fn schema() -> &'static Schema;

    /// Sets initial property values on a freshly built entity.
    fn initialize_defaults(_entity: &mut Entity<Self>) {}

    /// Saves owned children before the entity's own create or update is sent.
    ///
    /// A failure aborts the save; the entity itself is then not sent.
    async fn save_owned(_entity: &mut Entity<Self>) -> EconomicResult<()> {
        Ok(())
    }
}

/// A remote business object of type `K`.
pub struct Entity<K: Resource> {
    session: Session,
    id: Option<Value>,
    number: Option<Value>,
    properties: BTreeMap<&'static str, Value>,
    owned: K::Owned,
    persisted: bool,
    partial: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K: Resource> Entity<K> {
    /// Builds an unsaved entity with the type's defaults.
    pub fn new(session: Session) -> Self {
        let mut entity = Self::blank(session);
        K::initialize_defaults(&mut entity);
        entity
    }

    fn blank(session: Session) -> Self {
        Self {
            session,
            id: None,
            number: None,
            properties: BTreeMap::new(),
            owned: K::Owned::default(),
            persisted: false,
            partial: true,
            _kind: PhantomData,
        }
    }

    /// A persisted entity known only by its identity. Defaults are not applied, so every
    /// property read goes to the service.
    pub(crate) fn from_handle(session: Session, handle: Handle) -> Self {
        let mut entity = Self::blank(session);
        entity.adopt_identity(handle);
        entity.persisted = true;
        entity
    }

    /// A fully loaded entity built from a fetched record.
    ///
    /// Identity comes from the record. The requested handle is used only when the record
    /// carries none.
    pub(crate) fn from_data(session: Session, requested: Handle, data: &Payload) -> Self {
        let mut entity = Self::blank(session);
        entity.merge(data);
        if entity.handle().is_empty() {
            entity.adopt_identity(requested);
        }
        entity.persisted = true;
        entity.partial = false;
        entity
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Rebinds the entity to another session.
    pub fn attach(&mut self, session: Session) {
        self.session = session;
    }

    /// The proxy for this entity's type, bound to this entity's session.
    pub fn proxy(&self) -> K::Proxy {
        K::Proxy::from_session(self.session.clone())
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn number(&self) -> Option<&Value> {
        self.number.as_ref()
    }

    pub fn handle(&self) -> Handle {
        Handle::new(self.id.clone(), self.number.clone())
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Sets the id the entity will be created with.
    pub fn assign_id(&mut self, id: impl Into<Value>) -> EconomicResult<()> {
        self.ensure_unsaved()?;
        self.id = Some(id.into()).filter(|v| !is_blank(v));
        Ok(())
    }

    /// Sets the number the entity will be created with.
    pub fn assign_number(&mut self, number: impl Into<Value>) -> EconomicResult<()> {
        self.ensure_unsaved()?;
        self.number = Some(number.into()).filter(|v| !is_blank(v));
        Ok(())
    }

    fn ensure_unsaved(&self) -> EconomicResult<()> {
        if self.persisted {
            return Err(EconomicError::AlreadyPersisted {
                entity: K::schema().entity,
            });
        }
        Ok(())
    }

    /// The in-memory value of a declared property. Never touches the service.
    pub fn peek(&self, property: &str) -> Option<&Value> {
        match identity_key(property) {
            Some(IdentityKey::Id) => self.id.as_ref(),
            Some(IdentityKey::Number) => self.number.as_ref(),
            Some(IdentityKey::Handle) => None,
            None => K::schema()
                .property(property)
                .and_then(|p| self.properties.get(p.name)),
        }
    }

    /// Reads a property, reloading first if it is absent on a partial, persisted entity.
    ///
    /// The value may still be absent after the reload if the service does not have it.
    pub async fn get(&mut self, property: &str) -> EconomicResult<Option<Value>> {
        if let Some(key) = identity_key(property) {
            return Ok(match key {
                IdentityKey::Id => self.id.clone(),
                IdentityKey::Number => self.number.clone(),
                IdentityKey::Handle => Some(self.handle()).filter(|h| !h.is_empty()).map(|h| h.to_value()),
            });
        }

        let name = self.declared(property)?;
        if !self.properties.contains_key(name) && self.partial && self.persisted {
            self.reload().await?;
        }
        Ok(self.properties.get(name).cloned())
    }

    /// [`get`](Self::get), deserialized into `T`.
    pub async fn get_as<T: DeserializeOwned>(&mut self, property: &str) -> EconomicResult<Option<T>> {
        match self.get(property).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| EconomicError::InvalidValue {
                    property: property.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Assigns a property in memory. `null` clears it.
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> EconomicResult<()> {
        if identity_key(property).is_some() {
            return Err(EconomicError::IdentityProperty {
                property: property.to_string(),
            });
        }

        let name = self.declared(property)?;
        match value.into() {
            Value::Null => {
                self.properties.remove(name);
            }
            value => {
                self.properties.insert(name, value);
            }
        }
        Ok(())
    }

    /// Assigns every declared property found in `mapping`. Unknown and identity keys
    /// are skipped.
    pub fn update_properties(&mut self, mapping: &Payload) {
        for (key, value) in mapping {
            if identity_key(key).is_some() {
                continue;
            }
            if let Some(property) = K::schema().property(key) {
                if property.kind == Kind::Identity {
                    continue;
                }
                match value {
                    Value::Null => self.properties.remove(property.name),
                    value => self.properties.insert(property.name, value.clone()),
                };
            }
        }
    }

    fn declared(&self, property: &str) -> EconomicResult<&'static str> {
        K::schema()
            .property(property)
            .filter(|p| p.kind != Kind::Identity)
            .map(|p| p.name)
            .ok_or_else(|| EconomicError::UnknownProperty {
                entity: K::schema().entity,
                property: property.to_string(),
            })
    }

    /// Fetches the full record and merges it over the in-memory properties.
    ///
    /// Properties missing from the response keep their current values.
    #[instrument(skip(self), fields(entity = K::schema().entity))]
    pub async fn reload(&mut self) -> EconomicResult<()> {
        let proxy = self.proxy();
        let data = proxy.inner().get_data(&self.handle()).await?;
        self.merge(&data);
        self.partial = false;
        self.persisted = true;
        debug!(handle = %self.handle(), "Reloaded");
        Ok(())
    }

    /// Creates the entity if it was never persisted, updates it otherwise.
    ///
    /// Owned children are saved first. Returns the raw response of the entity's own call.
    #[instrument(skip(self), fields(entity = K::schema().entity))]
    pub async fn save(&mut self) -> EconomicResult<Value> {
        K::save_owned(self).await?;
        if self.persisted {
            self.update().await
        } else {
            self.create().await
        }
    }

    async fn create(&mut self) -> EconomicResult<Value> {
        let proxy = self.proxy();
        let response = proxy.inner().create(self).await?;

        // Identity and flags change together, and only once the response is understood.
        let created = Handle::from_response(&response).ok_or_else(|| EconomicError::MalformedResponse {
            operation: K::schema().operation(Action::CreateFromData.as_str()),
            reason: format!("expected a handle record, got {response}"),
        })?;
        self.adopt_identity(created);
        self.persisted = true;
        self.partial = false;

        info!(handle = %self.handle(), "Created");
        Ok(response)
    }

    async fn update(&mut self) -> EconomicResult<Value> {
        let proxy = self.proxy();
        let response = proxy.inner().update(self).await?;
        self.persisted = true;
        self.partial = false;

        info!(handle = %self.handle(), "Updated");
        Ok(response)
    }

    /// Deletes the remote entity. Afterwards it is back in the built-locally state.
    #[instrument(skip(self), fields(entity = K::schema().entity))]
    pub async fn delete(&mut self) -> EconomicResult<Value> {
        let proxy = self.proxy();
        let response = proxy.delete(self).await?;
        self.persisted = false;
        self.partial = true;
        Ok(response)
    }

    /// The payload sent on create and update: declared properties in schema order under
    /// their wire names, absent values left out.
    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        for property in K::schema().properties {
            let value = match property.kind {
                Kind::Identity => match identity_key(property.name) {
                    Some(IdentityKey::Id) => self.id.clone(),
                    Some(IdentityKey::Number) => self.number.clone(),
                    Some(IdentityKey::Handle) => Some(self.handle()).filter(|h| !h.is_empty()).map(|h| h.to_value()),
                    None => None,
                },
                _ => self.properties.get(property.name).cloned(),
            };
            if let Some(value) = value.filter(|v| !v.is_null()) {
                payload.insert(property.wire.to_string(), value);
            }
        }
        payload
    }

    pub fn owned(&self) -> &K::Owned {
        &self.owned
    }

    pub fn owned_mut(&mut self) -> &mut K::Owned {
        &mut self.owned
    }

    /// Applies a fetched record: identity fields are adopted, declared properties are
    /// coerced and overwritten, everything else is ignored.
    pub(crate) fn merge(&mut self, data: &Payload) {
        for (key, value) in data {
            if value.is_null() {
                continue;
            }
            match identity_key(key) {
                Some(IdentityKey::Id) => self.adopt_identity(Handle::new(Some(value.clone()), None)),
                Some(IdentityKey::Number) => self.adopt_identity(Handle::new(None, Some(value.clone()))),
                Some(IdentityKey::Handle) => self.adopt_identity(Handle::from_value(value)),
                None => {
                    if let Some(property) = K::schema().property(key) {
                        self.properties.insert(property.name, property.kind.coerce(value.clone()));
                    }
                }
            }
        }
    }

    /// Takes over the fields the handle carries; fields it lacks are left alone.
    fn adopt_identity(&mut self, handle: Handle) {
        if let Some(id) = handle.id() {
            self.id = Some(id.clone());
        }
        if let Some(number) = handle.number() {
            self.number = Some(number.clone());
        }
    }
}

impl<K: Resource> Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(K::schema().entity);
        out.field("partial", &self.partial)
            .field("persisted", &self.persisted)
            .field("id", &self.id)
            .field("number", &self.number);
        for (name, value) in &self.properties {
            out.field(name, value);
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::proxy::Proxy;
    use crate::schema::Property;
    use crate::transport::TransportError;
    use serde_json::json;

    #[derive(Debug)]
    struct Product;

    static PRODUCT: Schema = Schema {
        entity: "Product",
        handle_field: "product_handle",
        properties: &[
            Property::identity("handle", "Handle"),
            Property::identity("number", "Number"),
            Property::text("name", "Name"),
            Property::decimal("sales_price", "SalesPrice"),
            Property::boolean("is_accessible", "IsAccessible"),
            Property::handle("unit_handle", "UnitHandle"),
        ],
        deletable: false,
    };

    impl Resource for Product {
        type Proxy = Proxy<Product>;
        type Owned = ();

        fn schema() -> &'static Schema {
            &PRODUCT
        }

        fn initialize_defaults(entity: &mut Entity<Self>) {
            entity.properties.insert("is_accessible", json!(true));
        }
    }

    fn partial_product(mock: &MockTransport, number: i64) -> Entity<Product> {
        Entity::from_handle(mock.session(), Handle::from_number(number))
    }

    #[test]
    fn test_new_entity_is_unsaved_and_partial() {
        let mock = MockTransport::new();
        let product = Entity::<Product>::new(mock.session());

        assert!(!product.is_persisted());
        assert!(product.is_partial());
        assert!(product.handle().is_empty());
        assert_eq!(product.peek("is_accessible"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_partial_read_reloads_once() {
        let mock = MockTransport::new();
        mock.expect("Product_GetData")
            .return_ok(json!({"number": 5, "name": "Chair", "sales_price": "99.95"}));

        let mut product = partial_product(&mock, 5);
        assert_eq!(product.get("name").await.unwrap(), Some(json!("Chair")));
        assert!(!product.is_partial());

        // Already loaded; the absent property stays absent without another call.
        assert_eq!(product.get("unit_handle").await.unwrap(), None);
        assert_eq!(product.get("sales_price").await.unwrap(), Some(json!(99.95)));

        assert_eq!(mock.count("Product_GetData"), 1);
        assert_eq!(mock.invocations()[0].payload.get("entityHandle"), Some(&json!({"Number": 5})));
        mock.verify();
    }

    #[tokio::test]
    async fn test_reload_merges_instead_of_resetting() {
        let mock = MockTransport::new();
        mock.expect("Product_GetData").return_ok(json!({"Name": "Table"}));

        let mut product = partial_product(&mock, 8);
        product.set("sales_price", 10.0).unwrap();
        product.reload().await.unwrap();

        assert_eq!(product.peek("name"), Some(&json!("Table")));
        assert_eq!(product.peek("sales_price"), Some(&json!(10.0)));
        assert_eq!(product.number(), Some(&json!(8)));
    }

    #[tokio::test]
    async fn test_present_property_on_partial_entity_does_not_reload() {
        let mock = MockTransport::new();
        let mut product = partial_product(&mock, 3);
        product.set("name", "Lamp").unwrap();

        assert_eq!(product.get("name").await.unwrap(), Some(json!("Lamp")));
        assert!(product.is_partial());
        assert!(mock.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_unsaved_entity_never_reloads() {
        let mock = MockTransport::new();
        let mut product = Entity::<Product>::new(mock.session());

        assert_eq!(product.get("name").await.unwrap(), None);
        assert!(mock.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_identity_reads_never_reload() {
        let mock = MockTransport::new();
        let mut product = partial_product(&mock, 12);

        assert_eq!(product.get("number").await.unwrap(), Some(json!(12)));
        assert_eq!(product.get("id").await.unwrap(), None);
        assert_eq!(product.get("handle").await.unwrap(), Some(json!({"Number": 12})));
        assert_eq!(product.handle(), Handle::from_number(12));
        assert!(product.is_partial());
        assert!(mock.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_reload_not_found_propagates() {
        let mock = MockTransport::new();
        mock.expect("Product_GetData").return_ok(Value::Null);

        let mut product = partial_product(&mock, 404);
        let err = product.get("name").await.unwrap_err();

        assert!(matches!(err, EconomicError::NotFound { entity: "Product", .. }));
        assert!(product.is_partial());
    }

    #[test]
    fn test_identity_cannot_be_set_as_property() {
        let mock = MockTransport::new();
        let mut product = Entity::<Product>::new(mock.session());

        assert!(matches!(product.set("number", 1), Err(EconomicError::IdentityProperty { .. })));
        assert!(matches!(product.set("Id", 1), Err(EconomicError::IdentityProperty { .. })));
        assert!(matches!(product.set("colour", "red"), Err(EconomicError::UnknownProperty { .. })));
        assert!(product.number().is_none());
    }

    #[test]
    fn test_update_properties_uses_allow_list() {
        let mock = MockTransport::new();
        let mut product = Entity::<Product>::new(mock.session());
        let mapping = json!({"name": "Desk", "SalesPrice": 250, "colour": "oak", "number": 99});
        product.update_properties(mapping.as_object().unwrap());

        assert_eq!(product.peek("name"), Some(&json!("Desk")));
        assert_eq!(product.peek("sales_price"), Some(&json!(250)));
        assert!(product.number().is_none());
    }

    #[tokio::test]
    async fn test_get_as_deserializes() {
        let mock = MockTransport::new();
        let mut product = Entity::<Product>::new(mock.session());
        product.set("sales_price", 12.5).unwrap();
        product.set("name", "Stool").unwrap();

        assert_eq!(product.get_as::<f64>("sales_price").await.unwrap(), Some(12.5));
        assert!(matches!(
            product.get_as::<f64>("name").await,
            Err(EconomicError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_large_amounts_read_back_exactly() {
        let mock = MockTransport::new();
        mock.expect("Product_GetData")
            .return_ok(json!({"Number": 6, "SalesPrice": "12345678901234567.89"}));

        let mut product = partial_product(&mock, 6);
        let price: rust_decimal::Decimal = product.get_as("sales_price").await.unwrap().unwrap();

        assert_eq!(price.to_string(), "12345678901234567.89");
        assert_eq!(product.to_payload()["SalesPrice"], json!("12345678901234567.89"));
    }

    #[tokio::test]
    async fn test_create_adopts_identity() {
        let mock = MockTransport::new();
        mock.expect("Product_CreateFromData").return_ok(json!({"number": 77}));

        let mut product = Entity::<Product>::new(mock.session());
        product.set("name", "Sofa").unwrap();
        product.set("sales_price", 1200.0).unwrap();
        product.save().await.unwrap();

        assert!(product.is_persisted());
        assert!(!product.is_partial());
        assert_eq!(product.number(), Some(&json!(77)));

        let sent = &mock.invocations()[0].payload;
        assert_eq!(
            sent.get("data"),
            Some(&json!({"Name": "Sofa", "SalesPrice": 1200.0, "IsAccessible": true}))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let mock = MockTransport::new();
        mock.expect("Product_GetData").return_ok(json!({"Number": 4, "Name": "Rug"}));
        mock.expect("Product_UpdateFromData").return_ok(json!({"Number": 999}));

        let mut product = partial_product(&mock, 4);
        product.reload().await.unwrap();
        product.set("name", "Carpet").unwrap();
        product.save().await.unwrap();

        assert_eq!(product.number(), Some(&json!(4)));
        assert!(product.is_persisted());
        let sent = mock.invocations()[1].payload.get("data").cloned().unwrap();
        assert_eq!(sent, json!({"Handle": {"Number": 4}, "Number": 4, "Name": "Carpet"}));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_entity_unsaved() {
        let mock = MockTransport::new();
        mock.expect("Product_CreateFromData").return_err(TransportError::Timeout(std::time::Duration::from_secs(30)));
        mock.expect("Product_CreateFromData").return_ok(json!({"number": 1}));

        let mut product = Entity::<Product>::new(mock.session());
        let err = product.save().await.unwrap_err();
        assert!(matches!(err, EconomicError::Transport(TransportError::Timeout(_))));
        assert!(!product.is_persisted());
        assert!(product.is_partial());

        // A retry is another create.
        product.save().await.unwrap();
        assert!(product.is_persisted());
        assert_eq!(mock.count("Product_CreateFromData"), 2);
    }

    #[tokio::test]
    async fn test_rejected_payload_is_a_validation_error() {
        let mock = MockTransport::new();
        mock.expect("Product_CreateFromData").return_err(TransportError::Fault {
            code: "E02130".into(),
            message: "Name is required".into(),
        });

        let mut product = Entity::<Product>::new(mock.session());
        match product.save().await {
            Err(EconomicError::Validation { operation, message, .. }) => {
                assert_eq!(operation, "Product_CreateFromData");
                assert_eq!(message, "Name is required");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_create_response_changes_nothing() {
        let mock = MockTransport::new();
        mock.expect("Product_CreateFromData").return_ok(json!(["unexpected"]));

        let mut product = Entity::<Product>::new(mock.session());
        product.assign_number(10).unwrap();
        let err = product.save().await.unwrap_err();

        assert!(matches!(err, EconomicError::MalformedResponse { .. }));
        assert!(!product.is_persisted());
        assert_eq!(product.number(), Some(&json!(10)));
    }

    #[tokio::test]
    async fn test_assigned_number_is_sent_and_then_frozen() {
        let mock = MockTransport::new();
        mock.expect("Product_CreateFromData").return_ok(Value::Null);

        let mut product = Entity::<Product>::new(mock.session());
        product.assign_number(31).unwrap();
        product.save().await.unwrap();

        assert_eq!(mock.invocations()[0].payload["data"]["Number"], json!(31));
        assert_eq!(product.number(), Some(&json!(31)));
        assert!(matches!(product.assign_number(32), Err(EconomicError::AlreadyPersisted { .. })));
    }

    #[tokio::test]
    async fn test_delete_unsupported_type() {
        let mock = MockTransport::new();
        let mut product = partial_product(&mock, 1);

        assert!(matches!(
            product.delete().await,
            Err(EconomicError::Unsupported { entity: "Product", action: "Delete" })
        ));
        assert!(product.is_persisted());
    }

    #[test]
    fn test_debug_shows_state_and_properties() {
        let mock = MockTransport::new();
        let mut product = partial_product(&mock, 2);
        product.set("name", "Vase").unwrap();

        let rendered = format!("{product:?}");
        assert!(rendered.starts_with("Product"));
        assert!(rendered.contains("partial: true"));
        assert!(rendered.contains("persisted: true"));
        assert!(rendered.contains("Vase"));
    }
}
