//! actix-web surface of the service.

pub mod error;
pub mod users;

use actix_cors::Cors;
use actix_web::web;

pub use error::{ApiError, ApiResult, ErrorBody};

/// Body parsing config: malformed JSON answers 400 with the usual error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into())
}

/// Cross-origin policy: any origin, method and header.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Registers the `/api` routes. The app must provide `web::Data<UserService>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .service(users::list_users)
            .service(users::create_user)
            .service(users::update_user)
            .service(users::delete_user),
    );
}
