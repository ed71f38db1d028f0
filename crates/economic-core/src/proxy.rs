//! # Proxy
//!
//! [`Proxy<K>`] performs the remote operations for entity type `K` and turns responses into
//! entities. It holds nothing but its session, so it is cheap to create and clone.
//!
//! Concrete types wrap it in their own proxy and implement [`EntityProxy`] to inherit the
//! standard lookups; types with no extra operations use `Proxy<K>` itself, which
//! implements the trait directly.

use crate::entity::{Entity, Resource};
use crate::error::{EconomicError, EconomicResult};
use crate::handle::Handle;
use crate::session::Session;
use crate::transport::{Action, Payload, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, info, instrument, warn};

/// A named lookup and its parameters, e.g. `FindByCINumber` with `ciNumber`.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    action: String,
    params: Payload,
}

impl Criteria {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: Payload::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &Payload {
        &self.params
    }
}

/// Gateway for the remote operations of entity type `K`.
pub struct Proxy<K: Resource> {
    session: Session,
    _kind: PhantomData<fn() -> K>,
}

impl<K: Resource> Clone for Proxy<K> {
    fn clone(&self) -> Self {
        Self::new(self.session.clone())
    }
}

impl<K: Resource> Proxy<K> {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            _kind: PhantomData,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A new, unsaved entity bound to this proxy's session.
    pub fn build(&self) -> Entity<K> {
        Entity::new(self.session.clone())
    }

    /// [`build`](Self::build), then assign the declared properties found in `fields`.
    pub fn build_with(&self, fields: &Payload) -> Entity<K> {
        let mut entity = self.build();
        entity.update_properties(fields);
        entity
    }

    /// Fetches one fully loaded entity by number.
    #[instrument(skip(self), fields(entity = K::schema().entity))]
    pub async fn find_by_number(&self, number: Value) -> EconomicResult<Entity<K>> {
        let handle = Handle::from_number(number);
        let data = self.get_data(&handle).await?;
        info!(%handle, "Found");
        Ok(Entity::from_data(self.session.clone(), handle, &data))
    }

    /// Fetches the full record behind a handle.
    ///
    /// An empty answer means the service has no such entity.
    pub async fn get_data(&self, handle: &Handle) -> EconomicResult<Payload> {
        let schema = K::schema();
        let mut payload = Payload::new();
        payload.insert("entityHandle".to_string(), handle.to_value());

        match self.invoke(Action::GetData, payload).await? {
            Value::Object(data) if !data.is_empty() => Ok(data),
            Value::Null | Value::Object(_) => {
                warn!(entity = schema.entity, %handle, "Not found");
                Err(EconomicError::NotFound {
                    entity: schema.entity,
                    handle: handle.clone(),
                })
            }
            other => Err(EconomicError::MalformedResponse {
                operation: schema.operation(Action::GetData.as_str()),
                reason: format!("expected a record, got {other}"),
            }),
        }
    }

    /// Looks up entities by handle. Results are partial.
    pub async fn find_by_handle(&self, handle: &Handle) -> EconomicResult<Vec<Entity<K>>> {
        let criteria = Criteria::new(Action::FindByHandle.as_str()).param("entityHandle", handle.to_value());
        self.find_by_criteria(criteria).await
    }

    /// Every entity of this type. Results are partial.
    pub async fn all(&self) -> EconomicResult<Vec<Entity<K>>> {
        self.find_by_criteria(Criteria::new(Action::GetAll.as_str())).await
    }

    /// Runs a lookup and builds one partial, persisted entity per returned handle.
    ///
    /// No data beyond identity is fetched; the first non-identity read of each entity
    /// loads it.
    #[instrument(skip(self), fields(entity = K::schema().entity))]
    pub async fn find_by_criteria(&self, criteria: Criteria) -> EconomicResult<Vec<Entity<K>>> {
        let Criteria { action, params } = criteria;
        let operation = K::schema().operation(&action);
        let response = self.dispatch(&operation, params, false).await?;

        let handles = handles_in(&response, K::schema());
        info!(count = handles.len(), "Found");
        Ok(handles
            .into_iter()
            .map(|handle| Entity::from_handle(self.session.clone(), handle))
            .collect())
    }

    /// Sends the entity's payload to the create operation and returns the raw response.
    pub async fn create(&self, entity: &Entity<K>) -> EconomicResult<Value> {
        self.invoke(Action::CreateFromData, data_payload(entity)).await
    }

    /// Sends the entity's payload to the update operation and returns the raw response.
    pub async fn update(&self, entity: &Entity<K>) -> EconomicResult<Value> {
        self.invoke(Action::UpdateFromData, data_payload(entity)).await
    }

    /// Deletes the entity behind the handle, if the type supports deletion.
    #[instrument(skip(self, target), fields(entity = K::schema().entity))]
    pub async fn delete(&self, target: &Entity<K>) -> EconomicResult<Value> {
        let schema = K::schema();
        if !schema.deletable {
            return Err(EconomicError::Unsupported {
                entity: schema.entity,
                action: Action::Delete.as_str(),
            });
        }

        let handle = target.handle();
        let mut payload = Payload::new();
        payload.insert("entityHandle".to_string(), handle.to_value());
        let response = self.invoke(Action::Delete, payload).await?;
        info!(%handle, "Deleted");
        Ok(response)
    }

    /// Sends a type-specific action, e.g. `GetNextAvailableNumber`.
    pub async fn request(&self, action: &str, payload: Payload) -> EconomicResult<Value> {
        let operation = K::schema().operation(action);
        self.dispatch(&operation, payload, false).await
    }

    async fn invoke(&self, action: Action, payload: Payload) -> EconomicResult<Value> {
        let operation = K::schema().operation(action.as_str());
        self.dispatch(&operation, payload, action.is_write()).await
    }

    async fn dispatch(&self, operation: &str, payload: Payload, write: bool) -> EconomicResult<Value> {
        debug!(operation, "Dispatching");
        self.session
            .request(operation, payload)
            .await
            .map_err(|e| match e {
                TransportError::Fault { code, message } if write => EconomicError::Validation {
                    operation: operation.to_string(),
                    code,
                    message,
                },
                other => EconomicError::Transport(other),
            })
    }
}

fn data_payload<K: Resource>(entity: &Entity<K>) -> Payload {
    let mut payload = Payload::new();
    payload.insert("data".to_string(), Value::Object(entity.to_payload()));
    payload
}

/// Normalizes a lookup response into a list of non-empty handles.
///
/// The results may sit under the type's handle field or be the response itself, and may
/// be absent, a single bare value, or a sequence.
pub(crate) fn handles_in(response: &Value, schema: &crate::schema::Schema) -> Vec<Handle> {
    let results = match response {
        Value::Object(record) => record
            .iter()
            .find(|(key, _)| schema.is_handle_field(key))
            .map(|(_, value)| value)
            .unwrap_or(&Value::Null),
        other => other,
    };

    let items: Vec<&Value> = match results {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    items
        .into_iter()
        .map(Handle::from_value)
        .filter(|handle| !handle.is_empty())
        .collect()
}

/// Standard operations shared by every per-type proxy.
///
/// Implementors provide the session constructor and access to the inner [`Proxy`]; the
/// lookups and `delete` come for free.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// pub struct DebtorProxy {
///     inner: Proxy<Debtor>,
/// }
///
/// impl EntityProxy<Debtor> for DebtorProxy {
///     fn from_session(session: Session) -> Self {
///         Self { inner: Proxy::new(session) }
///     }
///
///     fn inner(&self) -> &Proxy<Debtor> {
///         &self.inner
///     }
/// }
/// ```
#[async_trait]
pub trait EntityProxy<K: Resource>: Send + Sync + Sized {
    fn from_session(session: Session) -> Self;

    /// Access the inner generic Proxy.
    fn inner(&self) -> &Proxy<K>;

    fn session(&self) -> &Session {
        self.inner().session()
    }

    fn build(&self) -> Entity<K> {
        self.inner().build()
    }

    fn build_with(&self, fields: &Payload) -> Entity<K> {
        self.inner().build_with(fields)
    }

    async fn find_by_number(&self, number: Value) -> EconomicResult<Entity<K>> {
        self.inner().find_by_number(number).await
    }

    async fn find_by_handle(&self, handle: &Handle) -> EconomicResult<Vec<Entity<K>>> {
        self.inner().find_by_handle(handle).await
    }

    async fn find_by_criteria(&self, criteria: Criteria) -> EconomicResult<Vec<Entity<K>>> {
        self.inner().find_by_criteria(criteria).await
    }

    async fn all(&self) -> EconomicResult<Vec<Entity<K>>> {
        self.inner().all().await
    }

    async fn delete(&self, entity: &Entity<K>) -> EconomicResult<Value> {
        self.inner().delete(entity).await
    }
}

impl<K: Resource> EntityProxy<K> for Proxy<K> {
    fn from_session(session: Session) -> Self {
        Proxy::new(session)
    }

    fn inner(&self) -> &Proxy<K> {
        self
    }
}
