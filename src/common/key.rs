use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::{collections, fmt};

/// Key component.
///
/// ```rust
/// use dynamodb_entity::common::key;
///
/// let key = key::Key {
///     name: "pk".to_string(),
///     value: "User".to_string(),
/// };
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

impl<T> Key<T> {
    /// Build a key part from an attribute name and a value.
    pub fn new(name: impl Into<String>, value: impl Into<T>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_entity::common::key;
///
/// let keys: key::Keys<String> = key::Keys {
///     partition_key: key::Key::new("pk", "User"),
///     sort_key: Some(key::Key::new("sk", "42")),
/// };
/// assert_eq!(keys.to_string(), "pk=User, sk=42");
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Keys<T> {
    /// The partition key (required).
    pub partition_key: Key<T>,
    /// The sort key (optional, only for tables with composite primary keys).
    pub sort_key: Option<Key<T>>,
}

impl<T> Keys<T> {
    /// Attribute names making up this key, partition first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition_key.name.as_str())
            .chain(self.sort_key.iter().map(|key| key.name.as_str()))
    }

    /// Remove this key's attributes from an item.
    pub fn strip<V>(&self, item: &mut collections::HashMap<String, V>) {
        for name in self.names() {
            item.remove(name);
        }
    }
}

impl<T: fmt::Display> fmt::Display for Keys<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.partition_key.name, self.partition_key.value)?;
        if let Some(sort_key) = &self.sort_key {
            write!(f, ", {}={}", sort_key.name, sort_key.value)?;
        }
        Ok(())
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for collections::HashMap<String, types::AttributeValue> {
    type Error = Error;

    fn try_from(key: Keys<T>) -> Result<Self> {
        let partition_key_value = to_attribute_value(key.partition_key.value)?;
        let mut keys = Self::from([(key.partition_key.name, partition_key_value)]);
        if let Some(sort_key) = key.sort_key {
            let sort_key_value = to_attribute_value(sort_key.value)?;
            keys.insert(sort_key.name, sort_key_value);
        }
        Ok(keys)
    }
}
