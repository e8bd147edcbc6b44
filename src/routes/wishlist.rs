//! Wishlist routes — idempotent add/remove plus listing.
//!
//! Unauthenticated calls get 401 so the client can surface a login prompt
//! without having issued an optimistic write.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::services::wishlist;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WishlistBody {
    pub wishlist: Vec<Uuid>,
}

/// Outcome of an idempotent wishlist edit. A no-op is still a success;
/// `changed` reports whether the persisted set moved.
#[derive(Debug, Serialize)]
pub struct EditBody {
    pub success: bool,
    pub changed: bool,
}

fn db_error(e: &sqlx::Error) -> StatusCode {
    tracing::error!(error = %e, "wishlist operation failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// `GET /api/wishlist` — the signed-in user's wishlist.
pub async fn list_wishlist(State(state): State<AppState>, auth: AuthUser) -> Result<Json<WishlistBody>, StatusCode> {
    let wishlist = wishlist::list(&state.pool, auth.user.id)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(WishlistBody { wishlist }))
}

/// `PUT /api/wishlist/{listing_id}` — idempotent set-union.
pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> Result<Json<EditBody>, StatusCode> {
    let changed = wishlist::add(&state.pool, auth.user.id, listing_id)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(EditBody { success: true, changed }))
}

/// `DELETE /api/wishlist/{listing_id}` — idempotent set-difference.
pub async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<Uuid>,
) -> Result<Json<EditBody>, StatusCode> {
    let changed = wishlist::remove(&state.pool, auth.user.id, listing_id)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(Json(EditBody { success: true, changed }))
}

#[cfg(test)]
#[path = "wishlist_test.rs"]
mod tests;
