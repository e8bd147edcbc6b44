//! Admin account management — role flags, activation, deletion.
//!
//! INVARIANT
//! =========
//! Deactivation and session invalidation commit as one transaction: a
//! concurrent session resolution observes either the fully-active or the
//! fully-deactivated state, never a deactivated user with a live session.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::session;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("user not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Admin-facing user listing row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub is_admin: bool,
    pub is_agent: bool,
    pub is_active: bool,
    pub member_since: Option<String>,
}

/// List all users, newest first.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRecord>, AccountError> {
    let rows = sqlx::query(
        r"SELECT id, name, email, image_url, is_admin, is_agent, is_active,
                 to_char(created_at, 'YYYY-MM-DD') AS member_since
          FROM users
          ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| UserRecord {
            id: r.get("id"),
            name: r.get("name"),
            email: r.get("email"),
            image_url: r.get("image_url"),
            is_admin: r.get("is_admin"),
            is_agent: r.get("is_agent"),
            is_active: r.get("is_active"),
            member_since: r.get("member_since"),
        })
        .collect())
}

/// Set the capability flags. The flags are independent; an account may hold
/// both.
pub async fn set_roles(pool: &PgPool, user_id: Uuid, is_admin: bool, is_agent: bool) -> Result<(), AccountError> {
    let updated = sqlx::query("UPDATE users SET is_admin = $2, is_agent = $3, updated_at = now() WHERE id = $1 RETURNING id")
        .bind(user_id)
        .bind(is_admin)
        .bind(is_agent)
        .fetch_optional(pool)
        .await?;

    if updated.is_none() {
        return Err(AccountError::NotFound);
    }
    Ok(())
}

/// Activate or deactivate an account.
///
/// Deactivation wipes every session for the user in the same transaction as
/// the flag change.
pub async fn set_active(pool: &PgPool, user_id: Uuid, active: bool) -> Result<(), AccountError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query("UPDATE users SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING id")
        .bind(user_id)
        .bind(active)
        .fetch_optional(&mut *tx)
        .await?;

    if updated.is_none() {
        return Err(AccountError::NotFound);
    }

    if !active {
        let wiped = session::invalidate_all_sessions(&mut *tx, user_id).await?;
        tracing::info!(%user_id, sessions = wiped, "user deactivated");
    }

    tx.commit().await?;
    Ok(())
}

/// Delete an account and everything hanging off it.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<(), AccountError> {
    let mut tx = pool.begin().await?;

    session::invalidate_all_sessions(&mut *tx, user_id).await?;
    sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1 RETURNING id")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    if deleted.is_none() {
        return Err(AccountError::NotFound);
    }

    tx.commit().await?;
    tracing::info!(%user_id, "user deleted");
    Ok(())
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
