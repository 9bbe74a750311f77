#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Entity
//!
//! Typed entities with lifecycle methods and cursor pagination on top of a
//! partitioned, sorted key-value store such as Amazon DynamoDB.
//!
//! ## Overview
//!
//! An entity type is described once by a [`entity::Descriptor`]: the store it
//! lives in, the functions deriving its partition and sort keys, and a validator.
//! A [`model::Model`] builds entities of that type in memory, and every
//! entity persists itself through `write`, `create`, `update`, `refresh` and
//! `delete`. A [`getters::Getters`] reads them back one at a time or page by page.
//!
//! ## Quick Example
//!
//! ```rust
//! use dynamodb_entity::{
//!     common::key::Key,
//!     entity::{Descriptor, KeySchema},
//!     getters::ListQuery,
//!     model::Model,
//!     store::memory::MemoryStore,
//! };
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Deserialize, Serialize)]
//! struct Reading {
//!     sensor: String,
//!     at: String,
//!     value: f64,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), dynamodb_entity::Error> {
//! let descriptor = Descriptor::new(
//!     Arc::new(MemoryStore::new("pk", Some("sk"))),
//!     KeySchema::new(|reading: &Reading| Key::new("pk", format!("Sensor#{}", reading.sensor)))
//!         .with_sort(|reading: &Reading| Key::new("sk", reading.at.as_str())),
//!     |reading: &Reading| reading.value.is_finite(),
//! );
//! let readings = Model::new(descriptor);
//!
//! let mut reading = readings.construct(Reading {
//!     sensor: "a".to_string(),
//!     at: "0001".to_string(),
//!     value: 1.5,
//! });
//! reading.create().await?;
//! reading.update(&serde_json::json!({ "value": 2.5 })).await?;
//!
//! let by_sensor = readings.getters(
//!     |sensor: &String| Key::new("pk", format!("Sensor#{sensor}")),
//!     |_: &String| Key::new("sk", ""),
//! );
//! let all = by_sensor.all(&ListQuery::new("a".to_string())).await?;
//! assert_eq!(all.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Keys and attribute conditions
//! - [`mod@read`] - Single-page read requests (GetItem, Query, Scan)
//! - [`mod@write`] - Write requests (PutItem, UpdateItem, DeleteItem)
//! - [`mod@store`] - The store contract and its DynamoDB and in-memory implementations
//! - [`mod@entity`] - Entity descriptors and lifecycle
//! - [`mod@getters`] - Point lookups and pagination
//! - [`mod@model`] - Entity factories

/// Common utilities for keys and conditions.
pub mod common;

pub mod entity;

pub mod error;

pub mod getters;

pub mod model;

/// Read requests against DynamoDB tables.
///
/// Every request reads a single page; following cursors is left to the caller.
pub mod read;

pub mod store;

/// Write requests against DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Setting attributes of existing items
/// - Deleting items by key
pub mod write;

pub use error::{Error, Result};
