use crate::{
    common::{condition::KeyCondition, key::Keys},
    error::{Error, Result},
    read,
    store::{Cursor, Item, Page, QueryRequest, Store},
    write,
};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    operation::{
        delete_item::DeleteItemError, put_item::PutItemError, update_item::UpdateItemError,
    },
    types,
};

/// Store backed by one DynamoDB table.
///
/// The table name (and optionally the read consistency) is overlaid onto
/// every request; callers never pass it per call. Queries through an index
/// never carry the read consistency, since global secondary indexes reject
/// consistent reads.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_entity::store::dynamo::DynamoStore;
///
/// # fn example(client: Client) {
/// let store = DynamoStore::new(client, "users").with_consistent_read(true);
/// assert_eq!(store.table_name(), "users");
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: Client,
    consistent_read: Option<bool>,
    table_name: String,
}

impl DynamoStore {
    /// Bind a client to a table.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            consistent_read: None,
            table_name: table_name.into(),
        }
    }

    /// Use strongly (`true`) or eventually (`false`) consistent reads for get, query and scan.
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }

    /// The table every request targets.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn single_read_args(&self) -> read::common::SingleReadArgs {
        read::common::SingleReadArgs {
            consistent_read: self.consistent_read,
            table_name: self.table_name.clone(),
        }
    }

    fn multiple_read_args(
        &self,
        condition: Option<KeyCondition<String>>,
        index_name: Option<String>,
        limit: Option<i32>,
        cursor: Option<Cursor>,
    ) -> read::common::MultipleReadArgs<String> {
        read::common::MultipleReadArgs {
            condition,
            consistent_read: self.consistent_read.filter(|_| index_name.is_none()),
            exclusive_start_key: cursor,
            index_name,
            limit,
            table_name: self.table_name.clone(),
        }
    }

    fn write_args(
        &self,
        condition: Option<KeyCondition<String>>,
        return_values: Option<types::ReturnValue>,
    ) -> write::common::WriteArgs<String> {
        write::common::WriteArgs {
            condition,
            return_values,
            table_name: self.table_name.clone(),
        }
    }
}

fn page(items: Option<Vec<Item>>, last_evaluated_key: Option<Item>) -> Page<Item> {
    Page {
        items: items.unwrap_or_default(),
        // an empty last evaluated key also means the read is exhausted
        cursor: last_evaluated_key
            .filter(|key| !key.is_empty())
            .map(Cursor::new),
    }
}

#[async_trait]
impl Store for DynamoStore {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.get", skip(self), err)
    )]
    async fn get(&self, keys: &Keys<String>) -> Result<Item> {
        let get_item = read::get_item::GetItem {
            keys: keys.clone(),
            single_read_args: self.single_read_args(),
        };
        let output = get_item
            .send(&self.client)
            .await
            .map_err(|error| Error::store(aws_sdk_dynamodb::Error::from(error)))?;
        match output.item {
            Some(item) if !item.is_empty() => Ok(item),
            _ => Err(Error::NotFound(keys.clone())),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.put", skip(self, item), err)
    )]
    async fn put(&self, item: Item) -> Result<Option<Item>> {
        let put_item = write::put_item::PutItem {
            item,
            write_args: self.write_args(None, Some(types::ReturnValue::AllOld)),
        };
        let output = put_item
            .send(&self.client)
            .await
            .map_err(|error| Error::store(aws_sdk_dynamodb::Error::from(error)))?;
        Ok(output.attributes)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.create", skip(self, item), err)
    )]
    async fn create(&self, keys: &Keys<String>, item: Item) -> Result<()> {
        let condition = KeyCondition::not_exists(keys.partition_key.name.as_str());
        let put_item = write::put_item::PutItem {
            item,
            write_args: self.write_args(Some(condition), None),
        };
        put_item
            .send(&self.client)
            .await
            .map_err(|error| match error.into_service_error() {
                PutItemError::ConditionalCheckFailedException(_) => {
                    Error::AlreadyExists(keys.clone())
                }
                error => Error::store(aws_sdk_dynamodb::Error::from(error)),
            })?;
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.update", skip(self, changes), err)
    )]
    async fn update(&self, keys: &Keys<String>, changes: Item) -> Result<Option<Item>> {
        let condition = KeyCondition::exists(keys.partition_key.name.as_str());
        let update_item = write::update_item::UpdateItem {
            keys: keys.clone(),
            changes,
            write_args: self.write_args(Some(condition), Some(types::ReturnValue::AllNew)),
        };
        let output = update_item
            .send(&self.client)
            .await
            .map_err(|error| match error.into_service_error() {
                UpdateItemError::ConditionalCheckFailedException(_) => {
                    Error::NotFound(keys.clone())
                }
                error => Error::store(aws_sdk_dynamodb::Error::from(error)),
            })?;
        Ok(output.attributes)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.query", skip(self), err)
    )]
    async fn query(&self, request: QueryRequest) -> Result<Page<Item>> {
        let query = read::query::Query {
            multiple_read_args: self.multiple_read_args(
                None,
                request.index_name,
                request.limit,
                request.cursor,
            ),
            partition_key: request.partition_key,
            scan_index_forward: Some(request.scan_index_forward),
            sort_key_condition: request.sort_key_condition,
        };
        let output = query
            .send(&self.client)
            .await
            .map_err(|error| Error::store(aws_sdk_dynamodb::Error::from(error)))?;
        Ok(page(output.items, output.last_evaluated_key))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.scan", skip(self), err)
    )]
    async fn scan(
        &self,
        filter: Option<KeyCondition<String>>,
        cursor: Option<Cursor>,
    ) -> Result<Page<Item>> {
        let scan = read::scan::Scan {
            multiple_read_args: self.multiple_read_args(filter, None, None, cursor),
        };
        let output = scan
            .send(&self.client)
            .await
            .map_err(|error| Error::store(aws_sdk_dynamodb::Error::from(error)))?;
        Ok(page(output.items, output.last_evaluated_key))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.delete", skip(self), err)
    )]
    async fn delete(&self, keys: &Keys<String>) -> Result<()> {
        let condition = KeyCondition::exists(keys.partition_key.name.as_str());
        let delete_item = write::delete_item::DeleteItem {
            keys: keys.clone(),
            write_args: self.write_args(Some(condition), None),
        };
        delete_item
            .send(&self.client)
            .await
            .map_err(|error| match error.into_service_error() {
                DeleteItemError::ConditionalCheckFailedException(_) => {
                    Error::NotFound(keys.clone())
                }
                error => Error::store(aws_sdk_dynamodb::Error::from(error)),
            })?;
        Ok(())
    }
}
