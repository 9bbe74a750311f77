use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// Build a `SET` expression assigning every attribute of `changes`.
///
/// Attributes are emitted in name order so the expression is stable.
fn get_set_expression(
    changes: collections::HashMap<String, types::AttributeValue>,
) -> Option<common::ExpressionInput> {
    if changes.is_empty() {
        return None;
    }
    let changes: collections::BTreeMap<_, _> = changes.into_iter().collect();
    let mut assignments = Vec::with_capacity(changes.len());
    let mut expression_attribute_names = collections::HashMap::with_capacity(changes.len());
    let mut expression_attribute_values = collections::HashMap::with_capacity(changes.len());
    for (index, (name, value)) in changes.into_iter().enumerate() {
        let placeholder = format!("#{name}");
        let value_placeholder = format!(":set{index}");
        assignments.push(format!("{placeholder} = {value_placeholder}"));
        expression_attribute_names.insert(placeholder, name);
        expression_attribute_values.insert(value_placeholder, value);
    }
    let operation = common::ExpressionInput {
        expression: format!("SET {}", assignments.join(", ")),
        expression_attribute_names,
        expression_attribute_values,
    };
    Some(operation)
}

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: Option<String>,
    write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// Assigns each attribute in `changes` and leaves every other attribute of the
/// item untouched.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_entity::{common, write};
/// use std::collections::HashMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item: write::update_item::UpdateItem<String> = write::update_item::UpdateItem {
///     keys: common::key::Keys {
///         partition_key: common::key::Key::new("pk", "User"),
///         sort_key: Some(common::key::Key::new("sk", "42")),
///     },
///     changes: HashMap::from([("name".to_string(), AttributeValue::S("Jane".to_string()))]),
///     write_args: write::common::WriteArgs {
///         condition: Some(common::condition::KeyCondition::exists("pk")),
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// // SET #name = :set0 with condition attribute_exists(#pk)
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItem<T> {
    /// The primary key of the item to update.
    pub keys: common::key::Keys<T>,
    /// The attributes to assign.
    pub changes: collections::HashMap<String, types::AttributeValue>,
    /// Additional write operation arguments (table name, condition, return values).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<UpdateItem<T>> for UpdateItemInput {
    type Error = Error;

    fn try_from(update_item: UpdateItem<T>) -> Result<Self> {
        let keys = update_item.keys.try_into()?;
        let mut write_operation: write::common::WriteInput = update_item.write_args.try_into()?;
        let update_expression = get_set_expression(update_item.changes)
            .map(|operation| write_operation.merge_expression(operation));
        let operation = Self {
            keys,
            update_expression,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> UpdateItem<T> {
    /// Execute the update item operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .update_item()
            .set_key(Some(update_item.keys))
            .set_update_expression(update_item.update_expression);
        crate::apply_write_operation!(builder, update_item.write_operation)
            .send()
            .await
    }
}
