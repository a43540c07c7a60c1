//! Core types and trait definitions for the dashboard service.
//!
//! Free of HTTP and database dependencies; every other crate builds on it.

#![allow(async_fn_in_trait)]

pub mod dashboard;
pub mod data_table;
pub mod error;
pub mod id;
pub mod load;
pub mod ownership;
pub mod query;
pub mod store;
pub mod widget;

pub use error::{Error, Result};
