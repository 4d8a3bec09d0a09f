//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod users;
mod views;

use actix_web::web;

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/users")
                        .route("/register", web::post().to(users::register))
                        .route("/login", web::post().to(users::login))
                        .service(
                            web::scope("/posts")
                                // Token required
                                .route("/create", web::post().to(posts::create))
                                .route("/comments/create", web::post().to(comments::create))
                                // Public reads
                                .route("/all/get", web::get().to(posts::list))
                                .route("/get", web::get().to(posts::get))
                                .route("/comments/all/get", web::get().to(comments::list))
                                // Ownership-checked
                                .route("/update", web::put().to(posts::update))
                                .route("/delete", web::delete().to(posts::delete)),
                        ),
                ),
        );
}
