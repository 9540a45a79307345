//! In-memory document storage backend for userdesk.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is what the service runs on with `STORE_BACKEND=memory`, and what the tests use in
//! place of MongoDB.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes behind an async-aware RwLock
//! - **Insertion order** - Queries return documents in the order they were inserted
//! - **Unique indexes** - Writes that duplicate a uniquely indexed value are rejected
//! - **Full filter support** - Every expression in the query API is evaluated
//!
//! # Quick Start
//!
//! ```ignore
//! use userdesk_core::{backend::StoreBackendBuilder, store::DynDocumentStore};
//! use userdesk_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DynDocumentStore::from_backend(InMemoryStore::builder().build().await.unwrap());
//!     store.add_index("users", "email", true).await.unwrap();
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as userdesk_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
