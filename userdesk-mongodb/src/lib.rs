//! MongoDB backend implementation for userdesk.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! translating the store-neutral filter expressions into MongoDB filter documents.
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Native queries** - Filters, skip/limit and counts run server-side
//! - **Unique indexes** - Duplicate-key write errors surface as `DuplicateKey`
//!
//! # Connection
//!
//! The builder takes a connection string and an optional database name. Without a name
//! the database named in the connection string is used, falling back to `test`.
//!
//! # Example
//!
//! ```ignore
//! use userdesk_core::backend::StoreBackendBuilder;
//! use userdesk_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017/userdesk")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as userdesk_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
