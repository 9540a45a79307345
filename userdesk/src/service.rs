//! User operations over the document store.
//!
//! [`UserService`] owns the store handle and is shared by every HTTP worker. It
//! validates input, builds store queries and maps store failures onto
//! [`UserServiceError`]; it knows nothing about HTTP.

use bson::Uuid;
use thiserror::Error;
use tracing::{debug, info};
use userdesk_core::{
    document::Document,
    error::DocumentStoreError,
    page::{Page, PaginationParams},
    query::{Expr, Filter, Query},
    store::DynDocumentStore,
};

use crate::{
    model::User,
    validation::{UserPayload, ValidationErrors, validate, validate_patch},
};

/// Fields matched by a search.
pub const SEARCH_FIELDS: [&str; 3] = ["name", "email", "address"];

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("user not found")]
    NotFound,
    #[error("invalid user id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

pub type ServiceResult<T> = Result<T, UserServiceError>;

/// Builds the list filter for `search`.
///
/// An empty search matches everything. Otherwise a record matches when any of
/// [`SEARCH_FIELDS`] contains `search`, ignoring case.
pub fn user_search_filter(search: &str) -> Option<Expr> {
    if search.is_empty() {
        return None;
    }

    Some(Filter::or(
        SEARCH_FIELDS.map(|field| Filter::contains(field, search)),
    ))
}

fn parse_id(id: &str) -> ServiceResult<Uuid> {
    uuid::Uuid::parse_str(id)
        .map(Uuid::from)
        .map_err(|_| UserServiceError::InvalidId(id.to_string()))
}

/// Maps write failures: a duplicate email is a validation failure, a missing
/// document is not-found, anything else stays a store error.
fn write_error(err: DocumentStoreError) -> UserServiceError {
    match err {
        DocumentStoreError::DuplicateKey(field, _) => {
            UserServiceError::Validation(ValidationErrors::single(field, "already exists"))
        }
        DocumentStoreError::DocumentNotFound(..) => UserServiceError::NotFound,
        other => UserServiceError::Store(other),
    }
}

#[derive(Debug)]
pub struct UserService {
    store: DynDocumentStore,
}

impl UserService {
    pub fn new(store: DynDocumentStore) -> Self {
        Self { store }
    }

    /// Creates the service and its indexes.
    ///
    /// # Errors
    ///
    /// Fails when the unique index on `email` cannot be created, since duplicate
    /// emails would otherwise be accepted.
    pub async fn start(store: DynDocumentStore) -> ServiceResult<Self> {
        let service = Self::new(store);
        service.ensure_indexes().await?;

        Ok(service)
    }

    /// Ensures the unique index on `email` exists.
    pub async fn ensure_indexes(&self) -> ServiceResult<()> {
        self.store
            .add_index(User::collection_name(), "email", true)
            .await?;

        Ok(())
    }

    /// Returns one page of users matching `search`, plus the total match count.
    ///
    /// The page and the count are fetched concurrently with the same filter.
    pub async fn list(&self, pagination: PaginationParams, search: &str) -> ServiceResult<Page<User>> {
        let users = self.store.typed_collection::<User>();
        let filter = user_search_filter(search);
        let query = Query::builder()
            .maybe_filter(filter.clone())
            .offset(pagination.offset())
            .limit(pagination.per_page)
            .build();

        let (data, total) = futures::try_join!(users.query(query), users.count(filter))?;
        debug!(page = pagination.page, limit = pagination.per_page, total, "listed users");

        Ok(pagination.page_of(data, total))
    }

    pub async fn create(&self, payload: &UserPayload) -> ServiceResult<User> {
        let user = validate(payload)?.into_user(Uuid::new());

        self.store
            .typed_collection::<User>()
            .insert(vec![user.clone()])
            .await
            .map_err(write_error)?;
        info!(id = %user.id, "user created");

        Ok(user)
    }

    /// Changes the fields given in `payload` on the user `id` and returns the stored record.
    ///
    /// Fields absent from `payload` keep their stored values. Validation runs before
    /// the lookup, so an invalid body is reported even for an unknown id.
    pub async fn update(&self, id: &str, payload: &UserPayload) -> ServiceResult<User> {
        let id = parse_id(id)?;
        let patch = validate_patch(payload)?;
        let users = self.store.typed_collection::<User>();

        let current = users
            .get(vec![id])
            .await?
            .into_iter()
            .next()
            .ok_or(UserServiceError::NotFound)?;
        let user = patch.apply(current);

        users
            .update(vec![user.clone()])
            .await
            .map_err(write_error)?;
        info!(%id, "user updated");

        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;

        self.store
            .typed_collection::<User>()
            .delete(vec![id])
            .await
            .map_err(write_error)?;
        info!(%id, "user deleted");

        Ok(())
    }

    /// Releases the store.
    pub async fn shutdown(self) -> ServiceResult<()> {
        Ok(self.store.shutdown().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use userdesk_core::backend::StoreBackendBuilder;
    use userdesk_memory::InMemoryStore;

    async fn service() -> UserService {
        let store = DynDocumentStore::from_backend(InMemoryStore::builder().build().await.unwrap());
        UserService::start(store).await.unwrap()
    }

    fn payload(name: &str, email: &str, address: Option<&str>) -> UserPayload {
        serde_json::from_value(json!({ "name": name, "age": 30, "email": email, "address": address })).unwrap()
    }

    #[test]
    fn empty_search_has_no_filter() {
        assert!(user_search_filter("").is_none());
    }

    #[test]
    fn search_covers_name_email_and_address() {
        assert_eq!(
            user_search_filter("an"),
            Some(Filter::or([
                Filter::contains("name", "an"),
                Filter::contains("email", "an"),
                Filter::contains("address", "an"),
            ]))
        );
    }

    #[tokio::test]
    async fn list_pages_and_counts_matches() {
        let service = service().await;
        for i in 0..7 {
            service
                .create(&payload(&format!("User {i}"), &format!("u{i}@x.io"), None))
                .await
                .unwrap();
        }
        service.create(&payload("Other", "o@y.io", Some("Hue"))).await.unwrap();

        let page = service.list(PaginationParams::new(2, 5), "X.IO").await.unwrap();

        assert_eq!((page.total, page.total_pages), (7, 2));
        assert_eq!(
            page.data.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
            ["User 5", "User 6"]
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let service = service().await;
        service.create(&payload("Al", "a@b.com", None)).await.unwrap();

        let err = service.create(&payload("Bo", "a@b.com", None)).await.unwrap_err();

        match err {
            UserServiceError::Validation(errors) => {
                assert_eq!(errors.to_string(), "user validation failed: email: already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_changes_given_fields_and_rejects_unknown_ids() {
        let service = service().await;
        let created = service.create(&payload("Al", "a@b.com", Some("Hanoi"))).await.unwrap();
        let id = created.id.to_string();

        let renamed = service
            .update(&id, &serde_json::from_value(json!({ "name": "Alan" })).unwrap())
            .await
            .unwrap();
        assert_eq!(renamed, User { name: "Alan".into(), ..created.clone() });

        let cleared = service
            .update(&id, &serde_json::from_value(json!({ "address": null })).unwrap())
            .await
            .unwrap();
        assert_eq!(cleared.address, None);
        assert_eq!(cleared.name, "Alan");

        let missing = service
            .update(&Uuid::new().to_string(), &payload("Al", "z@b.com", None))
            .await
            .unwrap_err();
        assert!(matches!(missing, UserServiceError::NotFound));
    }

    #[tokio::test]
    async fn update_to_taken_email_is_a_validation_error() {
        let service = service().await;
        service.create(&payload("Al", "a@b.com", None)).await.unwrap();
        let bo = service.create(&payload("Bo", "bo@b.com", None)).await.unwrap();

        let err = service
            .update(&bo.id.to_string(), &serde_json::from_value(json!({ "email": "a@b.com" })).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, UserServiceError::Validation(errors) if errors.fields()[0].message == "already exists"));
    }

    #[tokio::test]
    async fn validation_runs_before_lookup() {
        let service = service().await;

        let err = service
            .update(&Uuid::new().to_string(), &payload("A", "a@b.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, UserServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_removes_then_reports_missing() {
        let service = service().await;
        let created = service.create(&payload("Al", "a@b.com", None)).await.unwrap();
        let id = created.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(matches!(service.delete(&id).await, Err(UserServiceError::NotFound)));
        assert_eq!(service.list(PaginationParams::new(1, 5), "").await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let service = service().await;

        assert!(matches!(service.delete("42").await, Err(UserServiceError::InvalidId(id)) if id == "42"));
    }
}
