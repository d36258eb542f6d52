//! # Stub Server
//!
//! Development backend for the blog client. Serves the conventional
//! collection endpoints for posts, comments and users from in-memory
//! storage, with the same pagination headers and problem-details errors as
//! the real backend.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

use actix_web::web;

use state::AppState;

/// Register the entity storages and every route.
pub fn configure(state: &AppState, cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::from(state.posts.clone()))
        .app_data(web::Data::from(state.comments.clone()))
        .app_data(web::Data::from(state.users.clone()))
        .configure(handlers::configure_routes);
}
