//! Typed collection handles.
//!
//! A [`DynTypedCollection`] serializes documents to BSON on the way in and deserializes
//! on the way out, so callers only ever see their own document type.
//!
//! # Example
//!
//! ```ignore
//! # async fn example(store: &userdesk_core::store::DynDocumentStore) -> userdesk_core::error::DocumentStoreResult<()> {
//! let notes = store.typed_collection::<Note>();
//! notes.insert(vec![note]).await?;
//! let total = notes.count(None).await?;
//! # Ok(()) }
//! ```

use bson::{Bson, Uuid};
use std::marker::PhantomData;

use crate::{
    backend::DynStoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::{Expr, Query},
};

fn to_pairs<D: Document>(documents: Vec<D>) -> DocumentStoreResult<Vec<(Uuid, Bson)>> {
    documents
        .into_iter()
        .map(|d| {
            d.to_bson()
                .map(|b| (*d.id(), b))
        })
        .collect()
}

fn from_bsons<D: Document>(documents: Vec<Bson>) -> DocumentStoreResult<Vec<D>> {
    documents
        .into_iter()
        .map(D::from_bson)
        .collect()
}

#[derive(Debug)]
pub struct DynTypedCollection<'a, D: Document> {
    name: String,
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> DynTypedCollection<'a, D> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts new documents into the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or insertion fails.
    pub async fn insert(&self, documents: Vec<D>) -> DocumentStoreResult<()> {
        self.backend
            .insert_documents(to_pairs(documents)?, self.name())
            .await
    }

    /// Replaces existing documents in the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or update fails.
    pub async fn update(&self, documents: Vec<D>) -> DocumentStoreResult<()> {
        self.backend
            .update_documents(to_pairs(documents)?, self.name())
            .await
    }

    /// Deletes documents from the collection by their IDs.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the operation fails.
    pub async fn delete<U>(&self, ids: Vec<U>) -> DocumentStoreResult<()>
    where
        U: Into<Uuid> + Send + Sync + 'static,
    {
        self.backend
            .delete_documents(
                ids.into_iter()
                    .map(Into::into)
                    .collect(),
                self.name(),
            )
            .await
    }

    /// Retrieves documents from the collection by their IDs.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if deserialization or retrieval fails.
    pub async fn get<U>(&self, ids: Vec<U>) -> DocumentStoreResult<Vec<D>>
    where
        U: Into<Uuid> + Send + Sync + 'static,
    {
        from_bsons(
            self.backend
                .get_documents(
                    ids.into_iter()
                        .map(Into::into)
                        .collect(),
                    self.name(),
                )
                .await?,
        )
    }

    /// Queries documents in the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if deserialization or query fails.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        from_bsons(
            self.backend
                .query_documents(query, self.name())
                .await?,
        )
    }

    /// Counts the documents matching `filter`.
    pub async fn count(&self, filter: Option<Expr>) -> DocumentStoreResult<u64> {
        self.backend
            .count_documents(filter, self.name())
            .await
    }
}
