//! In-memory storage implementation for document stores.
//!
//! Each collection keeps its documents in insertion order together with an id lookup
//! table and the set of fields carrying a unique index.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Uuid, Bson};

use userdesk_core::{
    query::{Expr, Query},
    error::{DocumentStoreError, DocumentStoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::DocumentEvaluator;

type StoreMap = HashMap<String, CollectionData>;

#[derive(Debug, Default)]
struct CollectionData {
    /// Next insertion sequence number.
    next_seq: u64,
    /// document id -> insertion sequence
    slots: HashMap<String, u64>,
    /// insertion sequence -> (document id, document)
    documents: BTreeMap<u64, (String, Bson)>,
    unique_fields: HashSet<String>,
}

impl CollectionData {
    /// Finds a uniquely indexed field whose value in `document` is already held by a
    /// document other than `key`.
    fn unique_conflict(&self, key: &str, document: &Bson) -> Option<&str> {
        let fields = document.as_document()?;

        self.unique_fields
            .iter()
            .find(|field| {
                let Some(candidate) = fields.get(field.as_str()) else {
                    return false;
                };

                self.documents
                    .values()
                    .filter(|(id, _)| id != key)
                    .filter_map(|(_, existing)| existing.as_document()?.get(field.as_str()))
                    .any(|existing| existing == candidate)
            })
            .map(String::as_str)
    }

    fn check_unique(&self, key: &str, document: &Bson, collection: &str) -> DocumentStoreResult<()> {
        match self.unique_conflict(key, document) {
            Some(field) => Err(DocumentStoreError::DuplicateKey(field.to_string(), collection.to_string())),
            None => Ok(()),
        }
    }

    fn matching<'a>(
        &'a self,
        filter: Option<&'a Expr>,
    ) -> impl Iterator<Item = DocumentStoreResult<&'a Bson>> + 'a {
        self.documents
            .values()
            .filter_map(move |(_, doc)| match DocumentEvaluator::matches(doc, filter) {
                Ok(true) => Some(Ok(doc)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            })
    }
}

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones share
/// the same data. Queries scan the whole collection (no indexing beyond the id lookup).
///
/// # Example
///
/// ```ignore
/// use userdesk_memory::InMemoryStore;
/// use userdesk_core::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = Uuid::new();
/// store.insert_documents(vec![(id, Bson::Document(doc! { "name": "Alice" }))], "users").await?;
/// assert_eq!(store.count_documents(None, "users").await?, 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_data = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            let key = id.to_string();

            if collection_data.slots.contains_key(&key) {
                return Err(DocumentStoreError::DocumentAlreadyExists(key, collection.to_string()));
            }
            collection_data.check_unique(&key, &doc, collection)?;

            let seq = collection_data.next_seq;
            collection_data.next_seq += 1;
            collection_data.slots.insert(key.clone(), seq);
            collection_data.documents.insert(seq, (key, doc));
        }

        Ok(())
    }

    async fn update_documents(&self, documents: Vec<(Uuid, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_data = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            let key = id.to_string();

            let Some(seq) = collection_data.slots.get(&key).copied() else {
                return Err(DocumentStoreError::DocumentNotFound(key, collection.to_string()));
            };
            collection_data.check_unique(&key, &doc, collection)?;

            collection_data.documents.insert(seq, (key, doc));
        }

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<Uuid>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_data = store
            .entry(collection.to_string())
            .or_default();

        for id in ids {
            let key = id.to_string();

            match collection_data.slots.remove(&key) {
                Some(seq) => {
                    collection_data.documents.remove(&seq);
                }
                None => return Err(DocumentStoreError::DocumentNotFound(key, collection.to_string())),
            }
        }

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<Uuid>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(collection_data) = store.get(collection) else {
            return Ok(vec![]);
        };

        Ok(
            ids.into_iter()
                .filter_map(|id| collection_data.slots.get(&id.to_string()))
                .filter_map(|seq| collection_data.documents.get(seq))
                .map(|(_, doc)| doc.clone())
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(collection_data) = store.get(collection) else {
            return Ok(vec![]);
        };

        collection_data
            .matching(query.filter.as_ref())
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|doc| doc.cloned())
            .collect()
    }

    async fn count_documents(&self, filter: Option<Expr>, collection: &str) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;
        let Some(collection_data) = store.get(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for doc in collection_data.matching(filter.as_ref()) {
            doc?;
            count += 1;
        }

        Ok(count)
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        // Non-unique indexes have nothing to enforce here.
        if unique {
            self.store
                .write()
                .await
                .entry(collection.to_string())
                .or_default()
                .unique_fields
                .insert(field.to_string());
        }

        Ok(())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
