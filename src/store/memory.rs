use crate::{
    common::{
        condition::{Condition, KeyCondition},
        key::Keys,
    },
    error::{Error, Result},
    store::{Cursor, Item, Page, QueryRequest, Store, key_of},
};

use async_trait::async_trait;
use aws_sdk_dynamodb::types;
use std::{cmp, collections, sync::Arc};
use tokio::sync::RwLock;

type PrimaryKey = (String, Option<String>);

/// Position of an item in a query result: its ordering value, then its primary key.
type Position = (Option<String>, PrimaryKey);

fn primary_key(keys: &Keys<String>) -> PrimaryKey {
    (
        keys.partition_key.value.clone(),
        keys.sort_key.as_ref().map(|key| key.value.clone()),
    )
}

fn attribute_str(value: Option<&types::AttributeValue>) -> Option<&str> {
    match value {
        Some(types::AttributeValue::S(value)) | Some(types::AttributeValue::N(value)) => {
            Some(value.as_str())
        }
        _ => None,
    }
}

fn matches(item: &Item, condition: &KeyCondition<String>) -> bool {
    let value = attribute_str(item.get(&condition.name));
    match &condition.condition {
        Condition::Between(low, high) => {
            value.is_some_and(|value| low.as_str() <= value && value <= high.as_str())
        }
        Condition::Equals(expected) => value == Some(expected.as_str()),
        Condition::NotNull => item.contains_key(&condition.name),
        Condition::Null => !item.contains_key(&condition.name),
    }
}

/// Store keeping every item in process memory.
///
/// Items are addressed by the table's partition and sort key attribute names,
/// given at construction. Queries behave like the DynamoDB ones:
/// - items are ordered by the sort key condition's attribute, or the table sort key
/// - string comparison decides `Between` bounds and ordering
/// - a page carries a cursor only when more matching items remain
/// - a `Between` sort condition whose low bound is above its high bound fails
///   with [`Error::InvalidKey`], as DynamoDB rejects it
///
/// Index names are accepted and ignored; the partition and sort conditions
/// address attributes by name, so querying "an index" just means querying other
/// attributes.
///
/// Cloning shares the underlying items.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    items: Arc<RwLock<collections::BTreeMap<PrimaryKey, Item>>>,
    partition_key: String,
    sort_key: Option<String>,
}

impl MemoryStore {
    /// Create an empty store for a table keyed by `partition_key` and optionally `sort_key`.
    pub fn new(partition_key: impl Into<String>, sort_key: Option<&str>) -> Self {
        Self {
            items: Arc::new(RwLock::new(collections::BTreeMap::new())),
            partition_key: partition_key.into(),
            sort_key: sort_key.map(str::to_string),
        }
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no item.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn keys_of(&self, item: &Item) -> Result<Keys<String>> {
        key_of(item, &self.partition_key, self.sort_key.as_deref())
    }

    fn position(&self, item: &Item, order_by: Option<&str>) -> Result<Position> {
        let value = order_by.and_then(|name| attribute_str(item.get(name)).map(str::to_string));
        let keys = self.keys_of(item)?;
        Ok((value, primary_key(&keys)))
    }

    fn cursor(&self, item: &Item, names: &[&str]) -> Result<Cursor> {
        let keys = self.keys_of(item)?;
        let mut last_evaluated_key = Item::new();
        for name in keys.names().chain(names.iter().copied()) {
            if let Some(value) = item.get(name) {
                last_evaluated_key.insert(name.to_string(), value.clone());
            }
        }
        Ok(Cursor::new(last_evaluated_key))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, keys: &Keys<String>) -> Result<Item> {
        let items = self.items.read().await;
        items
            .get(&primary_key(keys))
            .cloned()
            .ok_or_else(|| Error::NotFound(keys.clone()))
    }

    async fn put(&self, item: Item) -> Result<Option<Item>> {
        let keys = self.keys_of(&item)?;
        let mut items = self.items.write().await;
        Ok(items.insert(primary_key(&keys), item))
    }

    async fn create(&self, keys: &Keys<String>, item: Item) -> Result<()> {
        let mut items = self.items.write().await;
        match items.entry(primary_key(keys)) {
            collections::btree_map::Entry::Occupied(_) => Err(Error::AlreadyExists(keys.clone())),
            collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(item);
                Ok(())
            }
        }
    }

    async fn update(&self, keys: &Keys<String>, changes: Item) -> Result<Option<Item>> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&primary_key(keys))
            .ok_or_else(|| Error::NotFound(keys.clone()))?;
        item.extend(changes);
        Ok(Some(item.clone()))
    }

    async fn query(&self, request: QueryRequest) -> Result<Page<Item>> {
        if let Some(KeyCondition {
            condition: Condition::Between(low, high),
            name,
        }) = &request.sort_key_condition
            && low > high
        {
            return Err(Error::InvalidKey(format!(
                "{name} range is inverted: {low} > {high}"
            )));
        }
        let order_by = request
            .sort_key_condition
            .as_ref()
            .map(|condition| condition.name.clone())
            .or_else(|| self.sort_key.clone());
        let partition = KeyCondition {
            condition: Condition::Equals(request.partition_key.value.clone()),
            name: request.partition_key.name.clone(),
        };

        let items = self.items.read().await;
        let mut matching = Vec::new();
        for item in items.values() {
            let selected = matches(item, &partition)
                && request
                    .sort_key_condition
                    .as_ref()
                    .is_none_or(|condition| matches(item, condition));
            if selected {
                matching.push((self.position(item, order_by.as_deref())?, item));
            }
        }

        matching.sort_by(|(a, _), (b, _)| a.cmp(b));
        if !request.scan_index_forward {
            matching.reverse();
        }
        if let Some(cursor) = &request.cursor {
            let after = self.position(cursor.as_item(), order_by.as_deref())?;
            let past = if request.scan_index_forward {
                cmp::Ordering::Greater
            } else {
                cmp::Ordering::Less
            };
            matching.retain(|(position, _)| position.cmp(&after) == past);
        }

        let limit = request
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(usize::MAX);
        let more = matching.len() > limit;
        let page: Vec<Item> = matching
            .into_iter()
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect();
        let cursor = match page.last() {
            Some(last) if more => {
                let mut names = vec![request.partition_key.name.as_str()];
                names.extend(order_by.as_deref());
                Some(self.cursor(last, &names)?)
            }
            _ => None,
        };
        Ok(Page {
            items: page,
            cursor,
        })
    }

    async fn scan(
        &self,
        filter: Option<KeyCondition<String>>,
        cursor: Option<Cursor>,
    ) -> Result<Page<Item>> {
        let after = cursor
            .map(|cursor| self.keys_of(cursor.as_item()))
            .transpose()?
            .map(|keys| primary_key(&keys));
        let items = self.items.read().await;
        let page = items
            .iter()
            .filter(|(key, _)| after.as_ref().is_none_or(|after| *key > after))
            .map(|(_, item)| item)
            .filter(|item| filter.as_ref().is_none_or(|filter| matches(item, filter)))
            .cloned()
            .collect();
        Ok(Page {
            items: page,
            cursor: None,
        })
    }

    async fn delete(&self, keys: &Keys<String>) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(&primary_key(keys)).is_none() {
            return Err(Error::NotFound(keys.clone()));
        }
        Ok(())
    }
}
