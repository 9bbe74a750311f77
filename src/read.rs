//! Read operations for retrieving data from DynamoDB tables.
//!
//! This module provides operations for reading data from DynamoDB:
//! - Getting individual items by primary key
//! - Querying one page of items with key conditions
//! - Scanning one page of a table

/// Common utilities and types for read operations.
pub mod common;

/// Get item operation for retrieving a single item by primary key.
pub mod get_item;

/// Query operation for retrieving one page of items with key conditions.
pub mod query;

/// Scan operation for retrieving one page of all items in a table.
pub mod scan;
