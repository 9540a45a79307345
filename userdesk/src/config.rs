//! Runtime configuration, read from flags or the environment.

use clap::{Parser, ValueEnum};
use userdesk_core::{
    backend::StoreBackendBuilder,
    error::{DocumentStoreError, DocumentStoreResult},
    store::DynDocumentStore,
};
use userdesk_memory::InMemoryStore;
use userdesk_mongodb::MongoDbStore;

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "userdesk", version, about = "Paginated, searchable user record API")]
pub struct Config {
    /// MongoDB connection string. Required for the mongodb store.
    #[arg(long, env = "MONGO_URI")]
    pub mongo_uri: Option<String>,

    /// Database name. Defaults to the one in the connection string, then `test`.
    #[arg(long, env = "MONGO_DATABASE")]
    pub mongo_database: Option<String>,

    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "store", env = "STORE_BACKEND", value_enum, default_value_t = StoreKind::Mongodb)]
    pub store: StoreKind,
}

impl Config {
    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] when the mongodb store is selected
    /// without a connection string, or when the connection string is rejected.
    pub async fn open_store(&self) -> DocumentStoreResult<DynDocumentStore> {
        match self.store {
            StoreKind::Memory => Ok(
                DynDocumentStore::from_backend(InMemoryStore::builder().build().await?)
            ),
            StoreKind::Mongodb => {
                let uri = self.mongo_uri.as_deref().ok_or_else(|| {
                    DocumentStoreError::Initialization("MONGO_URI is required for the mongodb store".into())
                })?;

                let mut builder = MongoDbStore::builder(uri);
                if let Some(database) = &self.mongo_database {
                    builder = builder.database(database.clone());
                }

                Ok(DynDocumentStore::from_backend(builder.build().await?))
            }
        }
    }
}
