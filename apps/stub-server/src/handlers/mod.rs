//! HTTP handlers and route configuration.

mod entities;
mod health;

use actix_web::web;

use blog_core::domain::{Comment, Post, User};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .configure(entities::routes::<Post>)
            .configure(entities::routes::<Comment>)
            .configure(entities::routes::<User>),
    );
}
