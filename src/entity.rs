//! Typed entities bound to a store.
//!
//! An [`Entity`] holds two property snapshots: `initial`, taken at construction,
//! and `current`, which every mutation merges into. Its key is never stored as a
//! field; it is derived from `current` by the [`KeySchema`] of the entity type's
//! [`Descriptor`] each time it is needed.

use crate::{
    common::key::{Key, Keys},
    error::{Error, Result},
    store::{Item, Store},
};

use serde::{Serialize, de::DeserializeOwned};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// Property types an entity can hold.
///
/// Implemented for every type that converts to and from store items.
pub trait Properties: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Properties for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Generator of one key part.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> Key<String> + Send + Sync>;

type Validator<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

type Logger<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Failure a lifecycle hook reports. It surfaces as [`Error::Hook`].
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

type HookFuture = Pin<Box<dyn Future<Output = Result<(), HookError>> + Send>>;

type Hook<P> = Arc<dyn Fn(&P) -> HookFuture + Send + Sync>;

fn hook<P, F, Fut>(hook: F) -> Hook<P>
where
    P: 'static,
    F: Fn(&P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    Arc::new(move |properties: &P| -> HookFuture { Box::pin(hook(properties)) })
}

async fn run<P>(hook: Option<&Hook<P>>, properties: &P) -> Result<()> {
    if let Some(hook) = hook {
        hook(properties).await.map_err(Error::Hook)?;
    }
    Ok(())
}

/// Key generators of an entity type: one partition part, at most one sort part.
///
/// ```rust
/// use dynamodb_entity::{common::key::Key, entity::KeySchema};
/// use serde_json::json;
///
/// let schema = KeySchema::new(|user: &serde_json::Value| {
///     Key::new("pk", format!("User#{}", user["id"].as_str().unwrap_or_default()))
/// })
/// .with_sort(|_: &serde_json::Value| Key::new("sk", "User"));
///
/// let keys = schema.keys(&json!({ "id": "42" }));
/// assert_eq!(keys.to_string(), "pk=User#42, sk=User");
/// ```
pub struct KeySchema<P> {
    partition: KeyFn<P>,
    sort: Option<KeyFn<P>>,
}

impl<P> KeySchema<P> {
    /// Schema with a partition key only.
    pub fn new(partition: impl Fn(&P) -> Key<String> + Send + Sync + 'static) -> Self {
        Self {
            partition: Arc::new(partition),
            sort: None,
        }
    }

    /// Add the sort key generator.
    pub fn with_sort(mut self, sort: impl Fn(&P) -> Key<String> + Send + Sync + 'static) -> Self {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Derive the key of `properties`.
    pub fn keys(&self, properties: &P) -> Keys<String> {
        Keys {
            partition_key: (self.partition)(properties),
            sort_key: self.sort.as_ref().map(|sort| sort(properties)),
        }
    }
}

impl<P> Clone for KeySchema<P> {
    fn clone(&self) -> Self {
        Self {
            partition: Arc::clone(&self.partition),
            sort: self.sort.clone(),
        }
    }
}

impl<P> fmt::Debug for KeySchema<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySchema")
            .field("sort", &self.sort.is_some())
            .finish_non_exhaustive()
    }
}

/// Configuration shared by every entity of one type.
///
/// Built once per type and shared through an `Arc`; instances never carry
/// their own store handle, key generators or validator.
///
/// Lifecycle hooks are awaited with the current properties before the step
/// they guard, and an error from any of them aborts the call before the store
/// is touched:
///
/// | Call | Order |
/// | --- | --- |
/// | [`Entity::validate`] | `on_validate`, validator |
/// | [`Entity::write`] | `on_save`, `on_validate`, validator, put |
/// | [`Entity::create`] | `on_save`, `on_create`, `on_validate`, validator, create |
/// | [`Entity::update`] | `on_validate`, validator, update |
/// | [`Entity::delete`] | `on_delete`, delete |
pub struct Descriptor<P> {
    store: Arc<dyn Store>,
    keys: KeySchema<P>,
    validator: Validator<P>,
    logger: Option<Logger<P>>,
    on_validate: Option<Hook<P>>,
    on_save: Option<Hook<P>>,
    on_create: Option<Hook<P>>,
    on_delete: Option<Hook<P>>,
}

impl<P> Descriptor<P> {
    /// Bind key generators and a validator to a store.
    pub fn new(
        store: Arc<dyn Store>,
        keys: KeySchema<P>,
        validator: impl Fn(&P) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            keys,
            validator: Arc::new(validator),
            logger: None,
            on_validate: None,
            on_save: None,
            on_create: None,
            on_delete: None,
        }
    }

    /// Hook invoked with the current properties after every mutation.
    pub fn with_logger(mut self, logger: impl Fn(&P) + Send + Sync + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Hook awaited before the validator runs.
    pub fn with_on_validate<F, Fut>(mut self, on_validate: F) -> Self
    where
        P: 'static,
        F: Fn(&P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.on_validate = Some(hook(on_validate));
        self
    }

    /// Hook awaited first by `write` and `create`.
    pub fn with_on_save<F, Fut>(mut self, on_save: F) -> Self
    where
        P: 'static,
        F: Fn(&P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.on_save = Some(hook(on_save));
        self
    }

    /// Hook awaited by `create` after `on_save`.
    pub fn with_on_create<F, Fut>(mut self, on_create: F) -> Self
    where
        P: 'static,
        F: Fn(&P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.on_create = Some(hook(on_create));
        self
    }

    /// Hook awaited by `delete` before the item is removed.
    pub fn with_on_delete<F, Fut>(mut self, on_delete: F) -> Self
    where
        P: 'static,
        F: Fn(&P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.on_delete = Some(hook(on_delete));
        self
    }

    /// The store entities of this type persist to.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// The key generators of this type.
    pub fn keys(&self) -> &KeySchema<P> {
        &self.keys
    }

    /// Whether `properties` pass the validator.
    pub fn is_valid(&self, properties: &P) -> bool {
        (self.validator)(properties)
    }

    fn log(&self, properties: &P) {
        if let Some(logger) = &self.logger {
            logger(properties);
        }
    }
}

impl<P> fmt::Debug for Descriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("keys", &self.keys)
            .field("logger", &self.logger.is_some())
            .field("on_validate", &self.on_validate.is_some())
            .field("on_save", &self.on_save.is_some())
            .field("on_create", &self.on_create.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish_non_exhaustive()
    }
}

/// One item of the store, held in memory.
///
/// An entity only touches the store when one of its persistence methods
/// (`write`, `create`, `update`, `refresh`, `delete`) is awaited. Every
/// persistence method that writes validates `current` first.
///
/// A failed persistence call leaves `current` as attempted: `update` does not
/// roll back the merged partial.
#[derive(Clone)]
pub struct Entity<P> {
    descriptor: Arc<Descriptor<P>>,
    initial: P,
    current: P,
}

impl<P: Properties> Entity<P> {
    pub(crate) fn new(descriptor: Arc<Descriptor<P>>, properties: P) -> Self {
        Self {
            descriptor,
            initial: properties.clone(),
            current: properties,
        }
    }

    /// The key derived from the current properties.
    pub fn key(&self) -> Keys<String> {
        self.descriptor.keys.keys(&self.current)
    }

    /// The live properties.
    pub fn current(&self) -> &P {
        &self.current
    }

    /// The properties as they were at construction.
    pub fn initial(&self) -> &P {
        &self.initial
    }

    /// Consume the entity, keeping the live properties.
    pub fn into_current(self) -> P {
        self.current
    }

    /// The descriptor shared by entities of this type.
    pub fn descriptor(&self) -> &Arc<Descriptor<P>> {
        &self.descriptor
    }

    /// Merge the attributes of `partial` into the current properties.
    ///
    /// Later keys win and the merge is shallow. Nothing is validated or persisted.
    /// Fails if `partial` is not a map, or if the merged attributes no longer
    /// deserialize into `P`.
    pub fn set<T: Serialize + ?Sized>(&mut self, partial: &T) -> Result<()> {
        let changes: Item = serde_dynamo::to_item(partial)?;
        self.merge(changes)
    }

    fn merge(&mut self, changes: Item) -> Result<()> {
        let mut item: Item = serde_dynamo::to_item(&self.current)?;
        item.extend(changes);
        self.current = serde_dynamo::from_item(item)?;
        self.descriptor.log(&self.current);
        Ok(())
    }

    /// Await the `on_validate` hook, then run the validator against the
    /// current properties.
    pub async fn validate(&self) -> Result<bool> {
        run(self.descriptor.on_validate.as_ref(), &self.current).await?;
        if self.descriptor.is_valid(&self.current) {
            return Ok(true);
        }
        Err(Error::Validation {
            properties: serde_dynamo::to_item(&self.current)?,
        })
    }

    fn item(&self, keys: &Keys<String>) -> Result<Item> {
        let mut item: Item = keys.clone().try_into()?;
        let properties: Item = serde_dynamo::to_item(&self.current)?;
        item.extend(properties);
        Ok(item)
    }

    /// Await `on_save`, validate, then store the item whether or not it exists.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.entity.write", skip_all, err)
    )]
    pub async fn write(&self) -> Result<()> {
        run(self.descriptor.on_save.as_ref(), &self.current).await?;
        self.validate().await?;
        let keys = self.key();
        self.descriptor.store.put(self.item(&keys)?).await?;
        Ok(())
    }

    /// Await `on_save` and `on_create`, validate, then store the item only if
    /// nothing exists at its key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.entity.create", skip_all, err)
    )]
    pub async fn create(&self) -> Result<()> {
        run(self.descriptor.on_save.as_ref(), &self.current).await?;
        run(self.descriptor.on_create.as_ref(), &self.current).await?;
        self.validate().await?;
        let keys = self.key();
        let item = self.item(&keys)?;
        self.descriptor.store.create(&keys, item).await
    }

    /// Merge `partial`, validate, then persist only the attributes of `partial`.
    ///
    /// The stored item must exist. Its other attributes are left as stored.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.entity.update", skip_all, err)
    )]
    pub async fn update<T: Serialize + ?Sized>(&mut self, partial: &T) -> Result<()> {
        let mut changes: Item = serde_dynamo::to_item(partial)?;
        self.merge(changes.clone())?;
        self.validate().await?;
        let keys = self.key();
        keys.strip(&mut changes);
        self.descriptor.store.update(&keys, changes).await?;
        Ok(())
    }

    /// Reload the stored attributes into the current properties.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.entity.refresh", skip_all, err)
    )]
    pub async fn refresh(&mut self) -> Result<()> {
        let keys = self.key();
        let mut item = self.descriptor.store.get(&keys).await?;
        keys.strip(&mut item);
        self.merge(item)
    }

    /// Await `on_delete`, then delete the stored item. The in-memory entity is
    /// left intact.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.entity.delete", skip_all, err)
    )]
    pub async fn delete(&self) -> Result<()> {
        run(self.descriptor.on_delete.as_ref(), &self.current).await?;
        self.descriptor.store.delete(&self.key()).await
    }
}

impl<P: fmt::Debug> fmt::Debug for Entity<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("initial", &self.initial)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    use aws_sdk_dynamodb::types;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Widget {
        id: String,
        name: String,
        count: i64,
    }

    fn widget(id: &str, name: &str) -> Widget {
        Widget {
            id: id.to_string(),
            name: name.to_string(),
            count: 1,
        }
    }

    fn schema() -> KeySchema<Widget> {
        KeySchema::new(|widget: &Widget| Key::new("pk", format!("Widget#{}", widget.id)))
            .with_sort(|_: &Widget| Key::new("sk", "Widget"))
    }

    fn descriptor(store: &MemoryStore) -> Arc<Descriptor<Widget>> {
        Arc::new(Descriptor::new(
            Arc::new(store.clone()),
            schema(),
            |widget: &Widget| !widget.name.is_empty(),
        ))
    }

    fn string(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    #[test]
    fn test_key_is_pure() {
        let store = MemoryStore::new("pk", Some("sk"));
        let entity = Entity::new(descriptor(&store), widget("1", "a"));
        assert_eq!(entity.key(), entity.key());
        assert_eq!(entity.key().to_string(), "pk=Widget#1, sk=Widget");
    }

    #[tokio::test]
    async fn test_set_merges_without_validating() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));

        entity.set(&json!({ "name": "", "count": 7 })).unwrap();

        assert_eq!(entity.current().name, "");
        assert_eq!(entity.current().count, 7);
        assert_eq!(entity.initial(), &widget("1", "a"));
        assert!(matches!(entity.validate().await, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_set_rejects_mistyped_attribute() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));
        let result = entity.set(&json!({ "count": "many" }));
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_validation_skips_store() {
        let store = MemoryStore::new("pk", None);
        let descriptor = Arc::new(Descriptor::new(
            Arc::new(store.clone()),
            KeySchema::new(|properties: &serde_json::Value| {
                Key::new("pk", properties["id"].as_str().unwrap_or_default())
            }),
            |properties: &serde_json::Value| properties["testAttribute"].is_string(),
        ));
        let entity = Entity::new(descriptor, json!({ "id": "1", "testAttribute": 42 }));

        let result = entity.create().await;

        match result {
            Err(Error::Validation { properties }) => assert_eq!(
                properties.get("testAttribute"),
                Some(&types::AttributeValue::N("42".to_string()))
            ),
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert!(matches!(entity.write().await, Err(Error::Validation { .. })));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_twice() {
        let store = MemoryStore::new("pk", Some("sk"));
        let descriptor = descriptor(&store);
        Entity::new(Arc::clone(&descriptor), widget("1", "first"))
            .create()
            .await
            .unwrap();

        let result = Entity::new(descriptor, widget("1", "second")).create().await;

        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        let stored = store
            .get(&schema().keys(&widget("1", "")))
            .await
            .unwrap();
        assert_eq!(stored.get("name"), Some(&string("first")));
        assert_eq!(stored.get("pk"), Some(&string("Widget#1")));
    }

    #[tokio::test]
    async fn test_write_upserts() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));
        entity.write().await.unwrap();
        entity.set(&json!({ "name": "b" })).unwrap();
        entity.write().await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.get(&entity.key()).await.unwrap();
        assert_eq!(stored.get("name"), Some(&string("b")));
    }

    #[tokio::test]
    async fn test_update_touches_given_attributes() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));
        entity.create().await.unwrap();
        store
            .update(
                &entity.key(),
                Item::from([("name".to_string(), string("elsewhere"))]),
            )
            .await
            .unwrap();

        entity.update(&json!({ "count": 2 })).await.unwrap();

        assert_eq!(entity.current().count, 2);
        let stored = store.get(&entity.key()).await.unwrap();
        assert_eq!(
            stored.get("count"),
            Some(&types::AttributeValue::N("2".to_string()))
        );
        assert_eq!(stored.get("name"), Some(&string("elsewhere")));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));

        let result = entity.update(&json!({ "count": 5 })).await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(entity.current().count, 5);
    }

    #[tokio::test]
    async fn test_update_invalid() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));
        entity.create().await.unwrap();

        let result = entity.update(&json!({ "name": "" })).await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        let stored = store.get(&entity.key()).await.unwrap();
        assert_eq!(stored.get("name"), Some(&string("a")));
    }

    #[tokio::test]
    async fn test_refresh() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));
        entity.create().await.unwrap();
        store
            .update(
                &entity.key(),
                Item::from([("name".to_string(), string("z"))]),
            )
            .await
            .unwrap();

        entity.refresh().await.unwrap();

        assert_eq!(entity.current(), &Widget {
            id: "1".to_string(),
            name: "z".to_string(),
            count: 1,
        });
        assert_eq!(entity.initial().name, "a");
    }

    #[tokio::test]
    async fn test_refresh_missing() {
        let store = MemoryStore::new("pk", Some("sk"));
        let mut entity = Entity::new(descriptor(&store), widget("1", "a"));
        assert!(matches!(entity.refresh().await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new("pk", Some("sk"));
        let entity = Entity::new(descriptor(&store), widget("1", "a"));
        assert!(matches!(entity.delete().await, Err(Error::NotFound(_))));

        entity.create().await.unwrap();
        entity.delete().await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(entity.current(), &widget("1", "a"));
    }

    #[tokio::test]
    async fn test_logger() {
        let store = MemoryStore::new("pk", Some("sk"));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let descriptor = Descriptor::new(Arc::new(store.clone()), schema(), |_: &Widget| true)
            .with_logger(move |_: &Widget| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let mut entity = Entity::new(Arc::new(descriptor), widget("1", "a"));

        entity.set(&json!({ "name": "b" })).unwrap();
        entity.create().await.unwrap();
        entity.update(&json!({ "count": 3 })).await.unwrap();
        entity.refresh().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    fn recorder(
        calls: &Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
    ) -> impl Fn(&Widget) -> std::future::Ready<Result<(), HookError>> + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move |_: &Widget| {
            calls.lock().unwrap().push(name);
            std::future::ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_hooks_run_in_order() {
        let store = MemoryStore::new("pk", Some("sk"));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let descriptor = Descriptor::new(Arc::new(store.clone()), schema(), |_: &Widget| true)
            .with_on_validate(recorder(&calls, "validate"))
            .with_on_save(recorder(&calls, "save"))
            .with_on_create(recorder(&calls, "create"))
            .with_on_delete(recorder(&calls, "delete"));
        let mut entity = Entity::new(Arc::new(descriptor), widget("1", "a"));

        entity.create().await.unwrap();
        entity.write().await.unwrap();
        entity.update(&json!({ "count": 2 })).await.unwrap();
        entity.delete().await.unwrap();

        assert_eq!(*calls.lock().unwrap(), [
            "save", "create", "validate", "save", "validate", "validate", "delete"
        ]);
    }

    #[tokio::test]
    async fn test_failing_hook_stops_store_write() {
        let store = MemoryStore::new("pk", Some("sk"));
        let saved = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&saved);
        let descriptor = Descriptor::new(Arc::new(store.clone()), schema(), |_: &Widget| true)
            .with_on_save(move |_: &Widget| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), HookError>(()) }
            })
            .with_on_create(|widget: &Widget| {
                let name = widget.name.clone();
                async move {
                    if name == "blocked" {
                        return Err(HookError::from(format!("{name} may not be created")));
                    }
                    Ok(())
                }
            });
        let descriptor = Arc::new(descriptor);
        let blocked = Entity::new(Arc::clone(&descriptor), widget("1", "blocked"));

        let result = blocked.create().await;

        match result {
            Err(Error::Hook(error)) => assert_eq!(error.to_string(), "blocked may not be created"),
            other => panic!("expected a hook error, got {other:?}"),
        }
        assert_eq!(saved.load(Ordering::SeqCst), 1);
        assert!(store.is_empty().await);

        blocked.write().await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failing_hook_stops_delete_and_validate() {
        let store = MemoryStore::new("pk", Some("sk"));
        let refuse = |_: &Widget| async { Err::<(), _>(HookError::from("refused")) };
        let entity = Entity::new(descriptor(&store), widget("1", "a"));
        entity.create().await.unwrap();
        let guarded = Descriptor::new(Arc::new(store.clone()), schema(), |_: &Widget| true)
            .with_on_delete(refuse)
            .with_on_validate(refuse);
        let guarded = Entity::new(Arc::new(guarded), widget("1", "a"));

        assert!(matches!(guarded.delete().await, Err(Error::Hook(_))));
        assert!(matches!(guarded.validate().await, Err(Error::Hook(_))));
        assert!(matches!(guarded.write().await, Err(Error::Hook(_))));
        assert_eq!(store.len().await, 1);
    }
}
