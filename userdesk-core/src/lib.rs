//! Document store abstraction underneath the userdesk service.
//!
//! This crate provides the pieces every backend and the service share:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing documents
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing different storage backends
//! - **Query and filtering API** ([`query`]) - Store-neutral filter expressions
//! - **Collections interface** ([`collection`]) - Typed access to a single collection
//! - **Document store** ([`store`]) - Owner of a boxed backend chosen at runtime
//! - **Error handling** ([`error`]) - Error and result types for store operations
//! - **Pagination** ([`page`]) - Page arithmetic and the paged result envelope
//!
//! # Example
//!
//! ```ignore
//! use userdesk_core::{document::Document, store::DocumentStore};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Note {
//!     pub id: Uuid,
//!     pub body: String,
//! }
//!
//! impl Document for Note {
//!     fn id(&self) -> &Uuid {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "notes"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as userdesk_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
pub mod page;
