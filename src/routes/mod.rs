use actix_web::web;

use crate::error::ApiError;

pub mod account;
pub mod bookings;
pub mod destinations;
pub mod health;
pub mod messages;
pub mod recommendations;

/// Malformed or mistyped JSON bodies become `InvalidInput` failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::invalid_input(err.to_string()).into())
}

/// Same for query strings and path segments.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::invalid_input(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::invalid_input(err.to_string()).into())
}

/// Registers `/health` and every `/api` route.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(account::register))
                        .route("/login", web::post().to(account::login)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(account::list_users))
                        .route("/{id}", web::get().to(account::get_user))
                        .route("/{id}/bookings", web::get().to(bookings::get_for_user)),
                )
                .service(
                    web::scope("/destinations")
                        .route("", web::get().to(destinations::get_all))
                        .route("", web::post().to(destinations::save))
                        .route("/{id}", web::get().to(destinations::get_by_id)),
                )
                .service(
                    web::scope("/bookings")
                        .route("", web::post().to(bookings::create))
                        .route("/estimate", web::post().to(bookings::estimate))
                        .route("/{id}", web::get().to(bookings::get_by_id)),
                )
                .service(
                    web::scope("/messages")
                        .route("", web::get().to(messages::get_recent))
                        .route("", web::post().to(messages::post))
                        .route("/{id}", web::delete().to(messages::delete)),
                )
                .service(
                    web::scope("/recommendations")
                        .route("", web::get().to(recommendations::get_all))
                        .route("", web::post().to(recommendations::post)),
                ),
        );
}
