//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the sign-in flow, the session payload consumed by the client auth
//! mirror, wishlist edits, the role-gated admin surfaces, and the form-mail
//! collaborator under a single Axum router.

pub mod admin;
pub mod auth;
pub mod email;
pub mod wishlist;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/api/auth/session", get(auth::session_payload))
        .route("/api/auth/logout", post(auth::logout))
        .route("/account", get(auth::account_home))
        .route("/api/wishlist", get(wishlist::list_wishlist))
        .route(
            "/api/wishlist/{listing_id}",
            put(wishlist::add_item).delete(wishlist::remove_item),
        )
        .route("/admin", get(admin::admin_home))
        .route("/admin/dashboard", get(admin::agent_dashboard))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}", delete(admin::delete_user))
        .route("/api/admin/users/{id}/roles", patch(admin::update_roles))
        .route("/api/admin/users/{id}/active", post(admin::set_active))
        .route("/api/email", post(email::dispatch))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
