//! User record service.
//!
//! A paginated, searchable CRUD API over the `users` collection of a document store.
//!
//! - [`model`] - The stored record and its JSON view
//! - [`validation`] - Field rules, reporting every failure at once
//! - [`service`] - List/create/update/delete over a [`DynDocumentStore`](userdesk_core::store::DynDocumentStore)
//! - [`http`] - actix-web handlers and error mapping
//! - [`config`] - Flags and environment, store selection
//! - [`telemetry`] - Log setup
//!
//! # Example
//!
//! ```ignore
//! use actix_web::{App, web};
//! use userdesk::{http, service::UserService};
//!
//! let service = web::Data::new(UserService::new(store));
//! let app = App::new().app_data(service).configure(http::configure);
//! ```

pub mod config;
pub mod http;
pub mod model;
pub mod service;
pub mod telemetry;
pub mod validation;
