use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::collections;

/// Separator joining the conditions of a key condition expression.
const AND: &str = " AND ";

/// Condition on a single attribute.
///
/// `Equals` and `Between` are valid on sort keys in key condition expressions.
/// `NotNull` and `Null` guard conditional writes and filter scans.
///
/// ```rust
/// use dynamodb_entity::common::condition;
///
/// let eq = condition::Condition::Equals("value".to_string());
/// let range = condition::Condition::Between("0002".to_string(), "0007".to_string());
/// let exists: condition::Condition<String> = condition::Condition::NotNull;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// Checks if an attribute value is between two values (inclusive).
    Between(T, T),
    /// Checks if an attribute value equals a specified value.
    Equals(T),
    /// Checks if an attribute exists (is not null).
    NotNull,
    /// Checks if an attribute does not exist (is null).
    Null,
}

impl<T: Serialize> Condition<T> {
    fn get_expression(
        self,
        key: &str,
        key_placeholder: &str,
        index: &mut usize,
    ) -> Result<(String, collections::HashMap<String, types::AttributeValue>)> {
        let mut expression_attribute_values = collections::HashMap::new();
        let expression = match self {
            Self::Between(value1, value2) => {
                let value1 = to_attribute_value(value1)?;
                let value2 = to_attribute_value(value2)?;
                let value_placeholder_1 = format!(":{}_between{}", key, index);
                *index += 1;
                let value_placeholder_2 = format!(":{}_between{}", key, index);
                *index += 1;
                let expression = format!(
                    "{} BETWEEN {} AND {}",
                    key_placeholder, value_placeholder_1, value_placeholder_2
                );
                expression_attribute_values.insert(value_placeholder_1, value1);
                expression_attribute_values.insert(value_placeholder_2, value2);
                expression
            }
            Self::Equals(value) => {
                let value = to_attribute_value(value)?;
                let value_placeholder = format!(":{}_eq{}", key, index);
                *index += 1;
                let expression = format!("{} = {}", key_placeholder, value_placeholder);
                expression_attribute_values.insert(value_placeholder, value);
                expression
            }
            Self::NotNull => {
                format!("attribute_exists({})", key_placeholder)
            }
            Self::Null => {
                format!("attribute_not_exists({})", key_placeholder)
            }
        };
        Ok((expression, expression_attribute_values))
    }
}

/// Condition applied to an attribute.
///
/// ```rust
/// use dynamodb_entity::common::condition;
///
/// let condition = condition::KeyCondition {
///     name: "sk".to_string(),
///     condition: condition::Condition::Equals("42".to_string()),
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition<T> {
    /// The condition to apply to the attribute.
    pub condition: Condition<T>,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

impl<T> KeyCondition<T> {
    /// Condition that holds when the attribute exists.
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            condition: Condition::NotNull,
            name: name.into(),
        }
    }

    /// Condition that holds when the attribute does not exist.
    pub fn not_exists(name: impl Into<String>) -> Self {
        Self {
            condition: Condition::Null,
            name: name.into(),
        }
    }
}

impl<T: Serialize> KeyCondition<T> {
    pub(crate) fn get_expression_operation(keys: Vec<Self>) -> Result<common::ExpressionInput> {
        let mut expressions = Vec::with_capacity(keys.len());
        let mut expression_attribute_names = collections::HashMap::with_capacity(keys.len());
        let mut expression_attribute_values = collections::HashMap::new();
        let mut index = 0;
        for key in keys {
            let placeholder = format!("#{}", key.name);
            let (expression, condition_expression_attribute_values) = key
                .condition
                .get_expression(&key.name, &placeholder, &mut index)?;
            expressions.push(expression);
            expression_attribute_names.insert(placeholder, key.name);
            expression_attribute_values.extend(condition_expression_attribute_values);
        }
        let expression = expressions.join(AND);
        let operation = common::ExpressionInput {
            expression,
            expression_attribute_names,
            expression_attribute_values,
        };
        Ok(operation)
    }
}

impl<T: Serialize> TryFrom<KeyCondition<T>> for common::ExpressionInput {
    type Error = Error;

    fn try_from(key_condition: KeyCondition<T>) -> Result<Self> {
        KeyCondition::get_expression_operation(vec![key_condition])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::equals(
        KeyCondition {
            name: "a".to_string(),
            condition: Condition::Equals(
                "b".to_string()
            ),
        },
        common::ExpressionInput {
            expression: "#a = :a_eq0".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (
                        ":a_eq0".to_string(),
                        types::AttributeValue::S(
                            "b".to_string()
                        )
                    ),
                ]
            ),
        }
    )]
    #[case::between(
        KeyCondition {
            name: "a".to_string(),
            condition: Condition::Between(
                "b".to_string(),
                "c".to_string()
            ),
        },
        common::ExpressionInput {
            expression: "#a BETWEEN :a_between0 AND :a_between1".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (
                        ":a_between0".to_string(),
                        types::AttributeValue::S(
                            "b".to_string()
                        )
                    ),
                    (
                        ":a_between1".to_string(),
                        types::AttributeValue::S(
                            "c".to_string()
                        )
                    ),
                ]
            ),
        }
    )]
    #[case::not_null(
        KeyCondition::exists("a"),
        common::ExpressionInput {
            expression: "attribute_exists(#a)".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                ]
            ),
            ..Default::default()
        }
    )]
    #[case::null(
        KeyCondition::not_exists("a"),
        common::ExpressionInput {
            expression: "attribute_not_exists(#a)".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                ]
            ),
            ..Default::default()
        }
    )]
    fn test_key_condition(
        #[case] condition: KeyCondition<String>,
        #[case] expected: common::ExpressionInput,
    ) {
        let actual: common::ExpressionInput = condition.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_key_conditions_joined_with_and() {
        let conditions = vec![
            KeyCondition {
                name: "pk".to_string(),
                condition: Condition::Equals("x".to_string()),
            },
            KeyCondition {
                name: "sk".to_string(),
                condition: Condition::Between("0002".to_string(), "0007".to_string()),
            },
        ];
        let actual = KeyCondition::get_expression_operation(conditions).unwrap();
        assert_eq!(
            actual.expression,
            "#pk = :pk_eq0 AND #sk BETWEEN :sk_between1 AND :sk_between2"
        );
        assert_eq!(actual.expression_attribute_values.len(), 3);
    }
}
