//! Users API handlers.
//!
//! ```text
//! GET    /api/users?page=1&limit=5&search=an
//! POST   /api/users       {"name":"Al","age":20,"email":"a@b.com","address":"Hanoi"}
//! PUT    /api/users/{id}  {"name":"Al","age":21,"email":"a@b.com"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use userdesk_core::page::PaginationParams;

use crate::{
    http::error::{ApiError, ApiResult},
    model::UserView,
    service::UserService,
    validation::UserPayload,
};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 5;

/// Raw list parameters. Kept as text so bad numbers fall back to defaults
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(
            positive_or(self.page.as_deref(), DEFAULT_PAGE),
            positive_or(self.limit.as_deref(), DEFAULT_LIMIT),
        )
    }

    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }
}

/// Reads a leading integer the way lenient form parsers do: skips leading
/// whitespace, accepts a sign, stops at the first non-digit.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = &digits[..digits.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .bytes()
        .fold(0_i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    Some(if negative { -magnitude } else { magnitude })
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    match raw.and_then(parse_int_prefix) {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => default,
    }
}

/// Body of successful writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UserView>,
}

impl MessageResponse {
    fn new(message: &str, data: Option<UserView>) -> Self {
        Self { message: message.to_string(), data }
    }
}

#[get("/users")]
pub async fn list_users(
    service: web::Data<UserService>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let page = service
        .list(query.pagination(), query.search())
        .await
        .map_err(ApiError::on_read)?;

    Ok(HttpResponse::Ok().json(page.map(UserView::from)))
}

#[post("/users")]
pub async fn create_user(
    service: web::Data<UserService>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let user = service
        .create(&payload)
        .await
        .map_err(ApiError::on_write)?;

    Ok(HttpResponse::Created().json(MessageResponse::new("user created", Some(user.into()))))
}

#[put("/users/{id}")]
pub async fn update_user(
    service: web::Data<UserService>,
    id: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let user = service
        .update(&id, &payload)
        .await
        .map_err(ApiError::on_write)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("user updated", Some(user.into()))))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    service: web::Data<UserService>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    service
        .delete(&id)
        .await
        .map_err(ApiError::on_write)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("user deleted", None)))
}
