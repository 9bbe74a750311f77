//! The store client contract.
//!
//! A [`Store`] executes raw get/put/create/update/query/scan/delete calls against
//! one table. The table name is fixed when the store is built and never passed
//! per call. Two implementations ship with the crate:
//! - [`dynamo::DynamoStore`] talks to DynamoDB through `aws_sdk_dynamodb`
//! - [`memory::MemoryStore`] keeps items in process, for tests and local tooling

/// DynamoDB-backed store.
pub mod dynamo;

/// In-memory store.
pub mod memory;

use crate::{
    common::{
        condition::KeyCondition,
        key::{Key, Keys},
    },
    error::{Error, Result},
};

use async_trait::async_trait;
use aws_sdk_dynamodb::types;
use std::collections;

/// Raw attribute map of one stored item.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// Opaque continuation token of a paged read.
///
/// Wraps the last evaluated key returned by the store. Feed it back through
/// [`QueryRequest::cursor`] to continue after the position it marks.
#[derive(Clone, Debug, PartialEq)]
pub struct Cursor(Item);

impl Cursor {
    pub(crate) fn new(last_evaluated_key: Item) -> Self {
        Self(last_evaluated_key)
    }

    pub(crate) fn as_item(&self) -> &Item {
        &self.0
    }

    pub(crate) fn into_item(self) -> Item {
        self.0
    }
}

/// One page of a paged read.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// The page's items, in store order.
    pub items: Vec<T>,
    /// Where the next page starts; `None` once the read is exhausted.
    pub cursor: Option<Cursor>,
}

/// Parameters of a single query request.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    /// Partition key the query is restricted to (equality).
    pub partition_key: Key<String>,
    /// Optional condition on the sort key (`Equals` or `Between`).
    pub sort_key_condition: Option<KeyCondition<String>>,
    /// Secondary index to query instead of the base table.
    pub index_name: Option<String>,
    /// Maximum number of items in the page.
    pub limit: Option<i32>,
    /// `true` for ascending sort key order, `false` for descending.
    pub scan_index_forward: bool,
    /// Position to resume after.
    pub cursor: Option<Cursor>,
}

/// Raw operations against one table.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the item at `keys`, failing with `NotFound` if absent.
    async fn get(&self, keys: &Keys<String>) -> Result<Item>;

    /// Unconditionally write `item`, returning the attributes it replaced.
    async fn put(&self, item: Item) -> Result<Option<Item>>;

    /// Atomically write `item` only if nothing exists at `keys`, failing with
    /// `AlreadyExists` otherwise.
    async fn create(&self, keys: &Keys<String>, item: Item) -> Result<()>;

    /// Set only the attributes in `changes` on the existing item at `keys`,
    /// failing with `NotFound` if absent. Returns the updated attributes.
    async fn update(&self, keys: &Keys<String>, changes: Item) -> Result<Option<Item>>;

    /// Read one page of items matching `request`.
    async fn query(&self, request: QueryRequest) -> Result<Page<Item>>;

    /// Read one page of the whole table, optionally filtered.
    async fn scan(
        &self,
        filter: Option<KeyCondition<String>>,
        cursor: Option<Cursor>,
    ) -> Result<Page<Item>>;

    /// Delete the item at `keys`, failing with `NotFound` if absent.
    async fn delete(&self, keys: &Keys<String>) -> Result<()>;
}

/// Delete every item in the store.
///
/// Items are addressed by the `partition_key` and `sort_key` attribute names.
/// When `system_attribute` is given, items carrying that attribute are kept.
/// Pages are scanned one after the other until the store stops returning a cursor.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "dynamodb_entity.reset", skip(store), err)
)]
pub async fn reset(
    store: &dyn Store,
    partition_key: &str,
    sort_key: Option<&str>,
    system_attribute: Option<&str>,
) -> Result<usize> {
    let filter = system_attribute.map(KeyCondition::not_exists);
    let mut cursor = None;
    let mut deleted = 0;
    loop {
        let page = store.scan(filter.clone(), cursor).await?;
        for item in page.items {
            let keys = key_of(&item, partition_key, sort_key)?;
            store.delete(&keys).await?;
            deleted += 1;
        }
        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(deleted)
}

/// Extract a string key attribute from an item.
pub(crate) fn key_part(item: &Item, name: &str) -> Result<Key<String>> {
    match item.get(name) {
        Some(types::AttributeValue::S(value)) | Some(types::AttributeValue::N(value)) => {
            Ok(Key::new(name, value.as_str()))
        }
        Some(other) => Err(Error::InvalidKey(format!(
            "attribute {name} is not a string or number: {other:?}"
        ))),
        None => Err(Error::InvalidKey(format!("attribute {name} is missing"))),
    }
}

/// Extract the primary key of an item.
pub(crate) fn key_of(
    item: &Item,
    partition_key: &str,
    sort_key: Option<&str>,
) -> Result<Keys<String>> {
    let keys = Keys {
        partition_key: key_part(item, partition_key)?,
        sort_key: sort_key.map(|name| key_part(item, name)).transpose()?,
    };
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::string(
        Item::from([("pk".to_string(), types::AttributeValue::S("a".to_string()))]),
        Some("a")
    )]
    #[case::number(
        Item::from([("pk".to_string(), types::AttributeValue::N("7".to_string()))]),
        Some("7")
    )]
    #[case::boolean(
        Item::from([("pk".to_string(), types::AttributeValue::Bool(true))]),
        None
    )]
    #[case::missing(Item::new(), None)]
    fn test_key_part(#[case] item: Item, #[case] expected: Option<&str>) {
        match (key_part(&item, "pk"), expected) {
            (Ok(key), Some(value)) => assert_eq!(key.value, value),
            (Err(Error::InvalidKey(_)), None) => {}
            (actual, expected) => panic!("unexpected {actual:?} for {expected:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_keeps_system_items() {
        let store = memory::MemoryStore::new("pk", Some("sk"));
        for (sk, system) in [("1", false), ("2", true), ("3", false)] {
            let mut item = Item::from([
                ("pk".to_string(), types::AttributeValue::S("p".to_string())),
                ("sk".to_string(), types::AttributeValue::S(sk.to_string())),
            ]);
            if system {
                item.insert("isSystemItem".to_string(), types::AttributeValue::Bool(true));
            }
            store.put(item).await.unwrap();
        }

        let deleted = reset(&store, "pk", Some("sk"), Some("isSystemItem"))
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        let remaining = store.scan(None, None).await.unwrap();
        assert_eq!(remaining.items.len(), 1);
        assert_eq!(
            remaining.items[0].get("sk"),
            Some(&types::AttributeValue::S("2".to_string()))
        );
    }
}
