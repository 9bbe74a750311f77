use crate::{common, store};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// Arguments for single-item read operations (GetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    /// Consistent reads consume more capacity units but guarantee you see the latest data.
    pub consistent_read: Option<bool>,
    /// The name of the table to read from.
    pub table_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) table_name: String,
}

/// Arguments for paged read operations (Query, Scan).
///
/// Each request built from these arguments reads exactly one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Filter condition applied to the page after the key condition.
    pub condition: Option<common::condition::KeyCondition<T>>,
    /// Whether to use a consistent read.
    pub consistent_read: Option<bool>,
    /// Where to resume a previous Query or Scan.
    ///
    /// Typically obtained from the cursor of the previous page.
    pub exclusive_start_key: Option<store::Cursor>,
    /// The name of a global secondary index or local secondary index to query.
    pub index_name: Option<String>,
    /// The maximum number of items to evaluate (not necessarily the number of matching items).
    pub limit: Option<i32>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<MultipleReadArgs<T>> for MultipleReadInput {
    type Error = Error;

    fn try_from(multiple_read_args: MultipleReadArgs<T>) -> Result<Self> {
        let condition_operation: Option<common::ExpressionInput> = multiple_read_args
            .condition
            .map(|condition| condition.try_into())
            .transpose()?;
        let (expression_attribute_names, expression_attribute_values, filter_expression) =
            match condition_operation {
                Some(condition_operation) => {
                    let mut names = None;
                    let mut values = None;
                    let expression = condition_operation.merge_into(&mut names, &mut values);
                    (names, values, Some(expression))
                }
                None => (None, None, None),
            };
        let operation = Self {
            consistent_read: multiple_read_args.consistent_read,
            exclusive_start_key: multiple_read_args
                .exclusive_start_key
                .map(store::Cursor::into_item),
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: multiple_read_args.index_name,
            limit: multiple_read_args.limit,
            table_name: multiple_read_args.table_name,
        };
        Ok(operation)
    }
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_args {
    ($builder:expr, $single_read_args:expr) => {
        $builder
            .set_consistent_read($single_read_args.consistent_read)
            .table_name($single_read_args.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .table_name($multiple_read_operation.table_name)
    };
}
