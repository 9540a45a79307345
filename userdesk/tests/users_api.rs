//! HTTP-level behaviour of `/api/users`, driven through `actix_web::test`.

use actix_web::{App, http::{StatusCode, header}, test as actix_test, web};
use async_trait::async_trait;
use bson::{Bson, Uuid};
use rstest::rstest;
use serde_json::{Value, json};
use userdesk::{http, service::UserService};
use userdesk_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
    store::DynDocumentStore,
};
use userdesk_memory::InMemoryStore;

/// A store whose every operation fails.
#[derive(Debug)]
struct UnavailableStore;

fn unavailable<T>() -> DocumentStoreResult<T> {
    Err(DocumentStoreError::Backend("store unavailable".into()))
}

#[async_trait]
impl StoreBackend for UnavailableStore {
    async fn insert_documents(&self, _: Vec<(Uuid, Bson)>, _: &str) -> DocumentStoreResult<()> {
        unavailable()
    }

    async fn update_documents(&self, _: Vec<(Uuid, Bson)>, _: &str) -> DocumentStoreResult<()> {
        unavailable()
    }

    async fn delete_documents(&self, _: Vec<Uuid>, _: &str) -> DocumentStoreResult<()> {
        unavailable()
    }

    async fn get_documents(&self, _: Vec<Uuid>, _: &str) -> DocumentStoreResult<Vec<Bson>> {
        unavailable()
    }

    async fn query_documents(&self, _: Query, _: &str) -> DocumentStoreResult<Vec<Bson>> {
        unavailable()
    }

    async fn count_documents(&self, _: Option<Expr>, _: &str) -> DocumentStoreResult<u64> {
        unavailable()
    }

    async fn add_index(&self, _: &str, _: &str, _: bool) -> DocumentStoreResult<()> {
        unavailable()
    }
}

async fn memory_service() -> web::Data<UserService> {
    let store = DynDocumentStore::from_backend(InMemoryStore::builder().build().await.unwrap());
    web::Data::new(UserService::start(store).await.unwrap())
}

fn unavailable_service() -> web::Data<UserService> {
    web::Data::new(UserService::new(DynDocumentStore::from_backend(UnavailableStore)))
}

macro_rules! app {
    ($service:expr) => {
        actix_test::init_service(
            App::new()
                .app_data($service.clone())
                .configure(http::configure),
        )
        .await
    };
}

async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;

    (status, serde_json::from_slice(&body).expect("json body"))
}

fn create(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri("/api/users").set_json(body)
}

fn list(query: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::get().uri(&format!("/api/users{query}"))
}

fn user(name: &str, email: &str, address: Option<&str>) -> Value {
    json!({ "name": name, "age": 20, "email": email, "address": address })
}

fn field_messages(body: &Value) -> Vec<(String, String)> {
    body["details"]
        .as_array()
        .expect("details present")
        .iter()
        .map(|d| (d["field"].as_str().unwrap().to_string(), d["message"].as_str().unwrap().to_string()))
        .collect()
}

#[actix_web::test]
async fn create_then_list_returns_the_record() {
    let service = memory_service().await;
    let app = app!(service);

    let (status, created) = send(&app, create(json!({ "name": "Al", "age": 20, "email": "a@b.com" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "user created");
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, page) = send(&app, list("?search=AL")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        page,
        json!({
            "page": 1,
            "limit": 5,
            "total": 1,
            "totalPages": 1,
            "data": [{ "id": id, "name": "Al", "age": 20, "email": "a@b.com", "address": null }],
        })
    );
}

#[actix_web::test]
async fn list_paginates_and_counts_matches() {
    let service = memory_service().await;
    let app = app!(service);
    for i in 0..12 {
        let address = if i % 3 == 0 { Some("Da Nang") } else { None };
        send(&app, create(user(&format!("Member {i:02}"), &format!("m{i}@team.vn"), address))).await;
    }

    let (_, page) = send(&app, list("?page=3&limit=5")).await;
    assert_eq!((page["total"].clone(), page["totalPages"].clone()), (json!(12), json!(3)));
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["data"][0]["name"], "Member 10");

    let (_, matches) = send(&app, list("?search=da%20nang&limit=10")).await;
    assert_eq!(matches["total"], 4);
    assert_eq!(matches["totalPages"], 1);

    let (_, beyond) = send(&app, list("?page=9")).await;
    assert_eq!(beyond["data"], json!([]));
    assert_eq!(beyond["total"], 12);
}

#[actix_web::test]
async fn empty_store_has_zero_pages() {
    let service = memory_service().await;
    let app = app!(service);

    let (status, page) = send(&app, list("")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);
    assert_eq!(page["totalPages"], 0);
}

#[rstest]
#[case("?page=0&limit=0", 1, 5)]
#[case("?page=-3&limit=abc", 1, 5)]
#[case("?page=3abc&limit=2", 3, 2)]
#[case("", 1, 5)]
#[actix_web::test]
async fn lenient_page_parameters(#[case] query: &str, #[case] page: u64, #[case] limit: u64) {
    let service = memory_service().await;
    let app = app!(service);

    let (status, body) = send(&app, list(query)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], page);
    assert_eq!(body["limit"], limit);
}

#[actix_web::test]
async fn search_matches_literally() {
    let service = memory_service().await;
    let app = app!(service);
    send(&app, create(user("Dot", "a.b@c.io", None))).await;
    send(&app, create(user("Plain", "axb@c.io", None))).await;

    let (_, dotted) = send(&app, list("?search=a.b")).await;
    let (_, pattern) = send(&app, list("?search=.%2A")).await;

    assert_eq!(dotted["total"], 1);
    assert_eq!(dotted["data"][0]["name"], "Dot");
    assert_eq!(pattern["total"], 0);
}

#[rstest]
#[case(json!({ "name": "Al", "age": -1, "email": "a@b.com" }), "age", "must be >= 0")]
#[case(json!({ "name": "Al", "age": 2.5, "email": "a@b.com" }), "age", "must be an integer")]
#[case(json!({ "name": "Al", "age": 20, "email": "bad" }), "email", "is invalid")]
#[case(json!({ "name": "A", "age": 20, "email": "a@b.com" }), "name", "must be at least 2 characters")]
#[actix_web::test]
async fn create_rejects_invalid_fields(#[case] body: Value, #[case] field: &str, #[case] message: &str) {
    let service = memory_service().await;
    let app = app!(service);

    let (status, error) = send(&app, create(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_messages(&error), vec![(field.to_string(), message.to_string())]);
    assert_eq!(error["error"], format!("user validation failed: {field}: {message}"));
}

#[actix_web::test]
async fn duplicate_email_is_a_validation_error() {
    let service = memory_service().await;
    let app = app!(service);
    send(&app, create(user("Al", "a@b.com", None))).await;

    let (status, error) = send(&app, create(user("Bo", "a@b.com", None))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_messages(&error), vec![("email".to_string(), "already exists".to_string())]);
}

#[actix_web::test]
async fn malformed_body_is_a_bad_request() {
    let service = memory_service().await;
    let app = app!(service);

    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json");
    let (status, error) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].is_string());
    assert!(error.get("details").is_none());
}

fn update(id: &str, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::put().uri(&format!("/api/users/{id}")).set_json(body)
}

#[actix_web::test]
async fn update_changes_given_fields() {
    let service = memory_service().await;
    let app = app!(service);
    let (_, created) = send(&app, create(user("Al", "a@b.com", Some("Hue")))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, updated) = send(&app, update(id, json!({ "name": "Alice", "age": "31", "email": "alice@b.com" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "user updated");
    assert_eq!(
        updated["data"],
        json!({ "id": id, "name": "Alice", "age": 31, "email": "alice@b.com", "address": "Hue" })
    );

    let (_, page) = send(&app, list("?search=alice")).await;
    assert_eq!(page["data"][0], updated["data"]);
}

#[actix_web::test]
async fn update_with_null_address_clears_it() {
    let service = memory_service().await;
    let app = app!(service);
    let (_, created) = send(&app, create(user("Al", "a@b.com", Some("Hue")))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, updated) = send(&app, update(id, json!({ "address": null }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated["data"],
        json!({ "id": id, "name": "Al", "age": 20, "email": "a@b.com", "address": null })
    );
}

#[actix_web::test]
async fn update_revalidates_given_fields() {
    let service = memory_service().await;
    let app = app!(service);
    let (_, created) = send(&app, create(user("Al", "a@b.com", None))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, error) = send(&app, update(id, json!({ "name": "A", "age": null, "email": null }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_messages(&error),
        vec![
            ("name".to_string(), "must be at least 2 characters".to_string()),
            ("age".to_string(), "is required".to_string()),
            ("email".to_string(), "is required".to_string()),
        ]
    );

    let (_, page) = send(&app, list("")).await;
    assert_eq!(page["data"][0]["name"], "Al");
}

#[actix_web::test]
async fn update_to_taken_email_is_a_validation_error() {
    let service = memory_service().await;
    let app = app!(service);
    send(&app, create(user("Al", "a@b.com", None))).await;
    let (_, bo) = send(&app, create(user("Bo", "bo@b.com", None))).await;
    let id = bo["data"]["id"].as_str().unwrap();

    let (status, error) = send(&app, update(id, json!({ "email": "a@b.com" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error,
        json!({
            "error": "user validation failed: email: already exists",
            "details": [{ "field": "email", "message": "already exists" }],
        })
    );

    let (_, page) = send(&app, list("?search=bo")).await;
    assert_eq!(page["data"][0]["email"], "bo@b.com");
}

#[rstest]
#[case(actix_test::TestRequest::put().set_json(json!({ "name": "Al", "age": 1, "email": "a@b.com" })))]
#[case(actix_test::TestRequest::delete())]
#[actix_web::test]
async fn missing_user_is_not_found(#[case] request: actix_test::TestRequest) {
    let service = memory_service().await;
    let app = app!(service);

    let (status, error) = send(&app, request.uri(&format!("/api/users/{}", Uuid::new()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({ "error": "user not found" }));
}

#[rstest]
#[case(actix_test::TestRequest::put().set_json(json!({ "name": "Al", "age": 1, "email": "a@b.com" })))]
#[case(actix_test::TestRequest::delete())]
#[actix_web::test]
async fn malformed_id_is_a_bad_request(#[case] request: actix_test::TestRequest) {
    let service = memory_service().await;
    let app = app!(service);

    let (status, error) = send(&app, request.uri("/api/users/not-an-id")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "invalid user id: not-an-id");
}

#[actix_web::test]
async fn delete_removes_the_record() {
    let service = memory_service().await;
    let app = app!(service);
    let (_, created) = send(&app, create(user("Al", "a@b.com", None))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let delete = || actix_test::TestRequest::delete().uri(&format!("/api/users/{id}"));
    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "user deleted" }));

    let (status, _) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = send(&app, list("")).await;
    assert_eq!(page["total"], 0);
}

#[actix_web::test]
async fn store_failure_on_list_is_a_server_error() {
    let service = unavailable_service();
    let app = app!(service);

    let (status, error) = send(&app, list("?search=x")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error, json!({ "error": "store operation failed" }));
}

#[rstest]
#[case(create(json!({ "name": "Al", "age": 20, "email": "a@b.com" })))]
#[case(actix_test::TestRequest::delete().uri(&format!("/api/users/{}", Uuid::new())))]
#[case(
    actix_test::TestRequest::put()
        .uri(&format!("/api/users/{}", Uuid::new()))
        .set_json(json!({ "name": "Al", "age": 20, "email": "a@b.com" }))
)]
#[actix_web::test]
async fn store_failure_on_write_is_a_bad_request(#[case] request: actix_test::TestRequest) {
    let service = unavailable_service();
    let app = app!(service);

    let (status, error) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({ "error": "store operation failed" }));
}

#[actix_web::test]
async fn startup_fails_when_the_email_index_cannot_be_created() {
    let result = UserService::start(DynDocumentStore::from_backend(UnavailableStore)).await;

    assert!(result.is_err());
}

#[actix_web::test]
async fn preflight_allows_any_origin() {
    let service = memory_service().await;
    let app = actix_test::init_service(
        App::new()
            .wrap(http::cors())
            .app_data(service.clone())
            .configure(http::configure),
    )
    .await;

    let request = actix_test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/users")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}
