//! Admin routes — role-gated back-office surfaces and user administration.
//!
//! Gating is capability-based: the full admin area requires `RequireAdmin`,
//! the agent-limited area `RequireStaff`. Denied roles are redirected to a
//! landing surface by the gates, never shown an error page.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::{RequireAdmin, RequireStaff};
use crate::services::account::{self, AccountError, UserRecord};
use crate::state::AppState;

fn account_error_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::NotFound => StatusCode::NOT_FOUND,
        AccountError::Database(e) => {
            tracing::error!(error = %e, "account operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /admin` — entry to the full admin layout.
pub async fn admin_home(RequireAdmin(user): RequireAdmin) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "area": "admin", "viewer": user }))
}

/// `GET /admin/dashboard` — entry to the agent-limited layout.
pub async fn agent_dashboard(RequireStaff(user): RequireStaff) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "area": "dashboard", "viewer": user }))
}

/// `GET /api/admin/users` — all accounts, for the user-management table.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<UserRecord>>, StatusCode> {
    let users = account::list_users(&state.pool)
        .await
        .map_err(|e| account_error_status(&e))?;
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct RolesBody {
    pub is_admin: bool,
    pub is_agent: bool,
}

/// `PATCH /api/admin/users/{id}/roles` — set capability flags.
pub async fn update_roles(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<Uuid>,
    Json(body): Json<RolesBody>,
) -> Result<StatusCode, StatusCode> {
    account::set_roles(&state.pool, user_id, body.is_admin, body.is_agent)
        .await
        .map_err(|e| account_error_status(&e))?;
    tracing::info!(admin = %admin.id, %user_id, is_admin = body.is_admin, is_agent = body.is_agent, "roles updated");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ActiveBody {
    pub active: bool,
}

/// `POST /api/admin/users/{id}/active` — activate or deactivate an account.
/// Deactivation wipes the user's sessions in the same transaction.
pub async fn set_active(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ActiveBody>,
) -> Result<StatusCode, StatusCode> {
    account::set_active(&state.pool, user_id, body.active)
        .await
        .map_err(|e| account_error_status(&e))?;
    tracing::info!(admin = %admin.id, %user_id, active = body.active, "activation changed");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/admin/users/{id}` — delete an account and its sessions and
/// wishlist rows.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    account::delete_user(&state.pool, user_id)
        .await
        .map_err(|e| account_error_status(&e))?;
    tracing::info!(admin = %admin.id, %user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
