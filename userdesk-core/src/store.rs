//! Owner of a storage backend.
//!
//! [`DynDocumentStore`] holds a boxed backend, so the backend can be picked at runtime
//! (for example from configuration) while callers keep one concrete store type.
//!
//! # Example
//!
//! ```ignore
//! use userdesk_core::store::DynDocumentStore;
//!
//! let store = DynDocumentStore::from_backend(backend);
//! let notes = store.typed_collection::<Note>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::DynTypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    /// Creates a new dynamic document store with the given backend trait object.
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// Boxes `backend` into a store.
    pub fn from_backend<B: StoreBackend + 'static>(backend: B) -> Self {
        Self::new(Box::new(backend))
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<'a, D: Document>(&'a self) -> DynTypedCollection<'a, D> {
        DynTypedCollection::new(D::collection_name().to_string(), &*self.backend)
    }

    /// Adds an index to a field in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the index.
    pub async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()> {
        self.backend
            .add_index(collection, field, unique)
            .await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}
