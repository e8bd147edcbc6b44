//! Persisted wishlist membership.
//!
//! Add and remove are idempotent set operations: the composite primary key
//! serializes concurrent writers, so racing requests for the same
//! (user, listing) pair converge without caller-side locking.

use sqlx::PgPool;
use uuid::Uuid;

/// Add a listing to the user's wishlist. Returns `true` when the set
/// changed; adding a present id is a successful no-op.
pub async fn add(pool: &PgPool, user_id: Uuid, listing_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("INSERT INTO wishlist_items (user_id, listing_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a listing from the user's wishlist. Returns `true` when the set
/// changed; removing an absent id is a successful no-op.
pub async fn remove(pool: &PgPool, user_id: Uuid, listing_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND listing_id = $2")
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// The user's current wishlist, oldest first.
pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT listing_id FROM wishlist_items WHERE user_id = $1 ORDER BY created_at")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

#[cfg(test)]
#[path = "wishlist_test.rs"]
mod tests;
