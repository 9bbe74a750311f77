//! Point lookups and paginated listings.
//!
//! [`Getters`] derives keys from a query value `Q` with one partition key
//! generator and one sort key generator, then reads entities of one type:
//! - [`Getters::one`] fetches a single entity
//! - `some*` methods read one page and hand back a cursor
//! - `all*` methods follow the cursor until the listing is exhausted

use crate::{
    common::{
        condition::{Condition, KeyCondition},
        key::{Key, Keys},
    },
    entity::{Descriptor, Entity, KeyFn, Properties},
    error::{Error, Result},
    store::{Cursor, Item, Page, QueryRequest},
};

use std::{fmt, sync::Arc};

/// Upper bound on the number of items one page request may ask for.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Order of the sort key in a listing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SortOrder {
    /// Smallest sort key first.
    #[default]
    Ascending,
    /// Largest sort key first.
    Descending,
}

/// Listing parameters.
///
/// ```rust
/// use dynamodb_entity::getters::{ListQuery, SortOrder};
///
/// let query = ListQuery::new("team-a").with_sort_order(SortOrder::Descending).with_limit(10);
/// assert_eq!(query.limit, Some(10));
/// assert_eq!(query.cursor, None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery<Q> {
    /// Value the key generators are applied to.
    pub key: Q,
    /// Sort key order of the returned items.
    pub sort_order: SortOrder,
    /// Page size. Defaults to, and is capped at, [`MAX_PAGE_SIZE`].
    pub limit: Option<i32>,
    /// Where to resume a previous listing.
    pub cursor: Option<Cursor>,
}

impl<Q> ListQuery<Q> {
    /// First page, ascending, default page size.
    pub fn new(key: Q) -> Self {
        Self {
            key,
            sort_order: SortOrder::default(),
            limit: None,
            cursor: None,
        }
    }

    /// Set the sort order.
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after `cursor`.
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    fn page_size(&self) -> i32 {
        match self.limit {
            Some(limit) if limit > 0 => limit.min(MAX_PAGE_SIZE),
            _ => MAX_PAGE_SIZE,
        }
    }
}

/// Read operations over entities of type `P`, keyed by query values `Q`.
pub struct Getters<P, Q> {
    descriptor: Arc<Descriptor<P>>,
    partition: KeyFn<Q>,
    sort: KeyFn<Q>,
    index_name: Option<String>,
}

impl<P, Q> Getters<P, Q> {
    /// Build getters over the table's primary key.
    pub fn new(
        descriptor: Arc<Descriptor<P>>,
        partition: impl Fn(&Q) -> Key<String> + Send + Sync + 'static,
        sort: impl Fn(&Q) -> Key<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            partition: Arc::new(partition),
            sort: Arc::new(sort),
            index_name: None,
        }
    }

    /// Read through a secondary index instead of the table.
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// The key `query` maps to.
    pub fn key_of(&self, query: &Q) -> Keys<String> {
        Keys {
            partition_key: (self.partition)(query),
            sort_key: Some((self.sort)(query)),
        }
    }
}

impl<P: Properties, Q> Getters<P, Q> {
    fn hydrate(&self, item: Item) -> Result<Entity<P>> {
        let properties = serde_dynamo::from_item(item)?;
        Ok(Entity::new(Arc::clone(&self.descriptor), properties))
    }

    /// Fetch the entity at the key of `query`.
    ///
    /// Through an index, the first item matching both key parts is returned.
    /// Fails with [`Error::NotFound`] when nothing matches.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.getters.one", skip_all, err)
    )]
    pub async fn one(&self, query: &Q) -> Result<Entity<P>> {
        let keys = self.key_of(query);
        let store = self.descriptor.store();
        let Some(index_name) = &self.index_name else {
            let item = store.get(&keys).await?;
            return self.hydrate(item);
        };
        let sort_key = (self.sort)(query);
        let request = QueryRequest {
            partition_key: keys.partition_key.clone(),
            sort_key_condition: Some(KeyCondition {
                condition: Condition::Equals(sort_key.value),
                name: sort_key.name,
            }),
            index_name: Some(index_name.clone()),
            limit: Some(1),
            scan_index_forward: true,
            cursor: None,
        };
        let page = store.query(request).await?;
        match page.items.into_iter().next() {
            Some(item) => self.hydrate(item),
            None => Err(Error::NotFound(keys)),
        }
    }

    /// One page of the partition `query.key` maps to.
    pub async fn some(&self, query: &ListQuery<Q>) -> Result<Page<Entity<P>>> {
        self.page(query, None, query.cursor.clone()).await
    }

    /// Listing restricted to the sort key `prefix` derives from the query.
    ///
    /// Used when the sort key is structured and its leading part identifies a
    /// group of items.
    pub fn some_prefix<F>(&self, prefix: F) -> Prefixed<'_, P, Q, F>
    where
        F: Fn(&Q) -> Key<String>,
    {
        Prefixed {
            getters: self,
            prefix,
        }
    }

    /// One page of the items whose sort key lies between the sort keys of `min`
    /// and `max`, both included.
    pub async fn some_range(
        &self,
        query: &ListQuery<Q>,
        min: &Q,
        max: &Q,
    ) -> Result<Page<Entity<P>>> {
        let condition = self.range(min, max);
        self.page(query, Some(condition), query.cursor.clone()).await
    }

    /// Every entity of the partition `query.key` maps to.
    pub async fn all(&self, query: &ListQuery<Q>) -> Result<Vec<Entity<P>>> {
        self.collect(query, None).await
    }

    /// Every entity whose sort key lies between the sort keys of `min` and `max`.
    pub async fn all_range(&self, query: &ListQuery<Q>, min: &Q, max: &Q) -> Result<Vec<Entity<P>>> {
        let condition = self.range(min, max);
        self.collect(query, Some(condition)).await
    }

    fn range(&self, min: &Q, max: &Q) -> KeyCondition<String> {
        let min = (self.sort)(min);
        let max = (self.sort)(max);
        KeyCondition {
            condition: Condition::Between(min.value, max.value),
            name: min.name,
        }
    }

    async fn page(
        &self,
        query: &ListQuery<Q>,
        sort_key_condition: Option<KeyCondition<String>>,
        cursor: Option<Cursor>,
    ) -> Result<Page<Entity<P>>> {
        let request = QueryRequest {
            partition_key: (self.partition)(&query.key),
            sort_key_condition,
            index_name: self.index_name.clone(),
            limit: Some(query.page_size()),
            scan_index_forward: query.sort_order == SortOrder::Ascending,
            cursor,
        };
        let page = self.descriptor.store().query(request).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            items = page.items.len(),
            more = page.cursor.is_some(),
            "fetched page"
        );
        let items = page
            .items
            .into_iter()
            .map(|item| self.hydrate(item))
            .collect::<Result<_>>()?;
        Ok(Page {
            items,
            cursor: page.cursor,
        })
    }

    /// Fetch pages one after the other, starting at `query.cursor`, until the
    /// store stops returning a cursor.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_entity.getters.all", skip_all, err)
    )]
    async fn collect(
        &self,
        query: &ListQuery<Q>,
        sort_key_condition: Option<KeyCondition<String>>,
    ) -> Result<Vec<Entity<P>>> {
        let mut entities = Vec::new();
        let mut cursor = query.cursor.clone();
        loop {
            let page = self
                .page(query, sort_key_condition.clone(), cursor)
                .await?;
            entities.extend(page.items);
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(entities)
    }
}

impl<P, Q> Clone for Getters<P, Q> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            partition: Arc::clone(&self.partition),
            sort: Arc::clone(&self.sort),
            index_name: self.index_name.clone(),
        }
    }
}

impl<P, Q> fmt::Debug for Getters<P, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getters")
            .field("index_name", &self.index_name)
            .finish_non_exhaustive()
    }
}

/// Listings constrained to sort key equality with a derived prefix key.
///
/// Returned by [`Getters::some_prefix`].
pub struct Prefixed<'a, P, Q, F> {
    getters: &'a Getters<P, Q>,
    prefix: F,
}

impl<P: Properties, Q, F> Prefixed<'_, P, Q, F>
where
    F: Fn(&Q) -> Key<String>,
{
    fn condition(&self, query: &ListQuery<Q>) -> KeyCondition<String> {
        let key = (self.prefix)(&query.key);
        KeyCondition {
            condition: Condition::Equals(key.value),
            name: key.name,
        }
    }

    /// One page of the matching items.
    pub async fn some(&self, query: &ListQuery<Q>) -> Result<Page<Entity<P>>> {
        let condition = self.condition(query);
        self.getters
            .page(query, Some(condition), query.cursor.clone())
            .await
    }

    /// Every matching item.
    pub async fn all(&self, query: &ListQuery<Q>) -> Result<Vec<Entity<P>>> {
        let condition = self.condition(query);
        self.getters.collect(query, Some(condition)).await
    }
}
