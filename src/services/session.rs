//! Session issuance, resolution, and revocation.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived opaque session tokens stored server-side and
//! joined to the user row on every resolution, so role changes and
//! deactivation take effect without waiting for expiry.
//!
//! TRADE-OFFS
//! ==========
//! Sliding renewal writes on an otherwise read-only path; the 24-hour
//! threshold bounds that write to at most one per session per day.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgExecutor, PgPool, Row};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Fixed session lifetime from issue or renewal.
pub const SESSION_LIFETIME: Duration = Duration::days(7);

/// Minimum age since the last refresh before a resolve slides the expiry.
pub const RENEWAL_THRESHOLD: Duration = Duration::hours(24);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Capability set carried by a session, as a closed variant set.
///
/// `Guest` is the no-session case; a resolved session always maps to one of
/// the other three. Gates match this exhaustively instead of re-checking the
/// raw flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guest,
    User,
    Agent,
    Admin,
}

impl Role {
    /// Derive the role from the stored capability flags. The flags are not
    /// mutually exclusive; the admin flag dominates.
    #[must_use]
    pub fn from_flags(is_admin: bool, is_agent: bool) -> Self {
        match (is_admin, is_agent) {
            (true, _) => Self::Admin,
            (false, true) => Self::Agent,
            (false, false) => Self::User,
        }
    }
}

/// User view joined at session resolution. Also the wire shape the client
/// auth mirror is populated from.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub is_admin: bool,
    pub is_agent: bool,
    pub wishlist: Vec<Uuid>,
}

impl SessionUser {
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_flags(self.is_admin, self.is_agent)
    }
}

/// Why a session token failed to resolve.
///
/// Expected outcomes are values, not panics: callers distinguish "absent"
/// (`NotFound`) from "present but unusable" (the rest).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Token unknown or expired.
    #[error("session not found")]
    NotFound,
    /// Token row exists but its user is gone.
    #[error("session user no longer exists")]
    UserNotFound,
    /// Token row exists but its user is deactivated.
    #[error("session user is deactivated")]
    UserInactive,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Wire tag for session errors surfaced to clients on the session payload.
/// UI collaborators react by forcing sign-out and explaining, keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionErrorTag {
    UserNotFound,
    UserInactive,
    DatabaseError,
}

impl SessionError {
    /// The client-facing tag, if any. An absent/expired session carries no
    /// tag: to the client it is indistinguishable from never signing in.
    #[must_use]
    pub fn tag(&self) -> Option<SessionErrorTag> {
        match self {
            Self::NotFound => None,
            Self::UserNotFound => Some(SessionErrorTag::UserNotFound),
            Self::UserInactive => Some(SessionErrorTag::UserInactive),
            Self::Database(_) => Some(SessionErrorTag::DatabaseError),
        }
    }
}

/// Newly issued session, ready for cookie transport.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Create a session for the given user, returning the token and expiry.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<NewSession, sqlx::Error> {
    let token = generate_token();
    let expires_at = OffsetDateTime::now_utc() + SESSION_LIFETIME;
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(NewSession { token, expires_at })
}

/// True when a session resolved at `now` should slide its expiry forward.
#[must_use]
pub fn needs_renewal(refreshed_at: OffsetDateTime, now: OffsetDateTime) -> bool {
    now - refreshed_at > RENEWAL_THRESHOLD
}

/// Resolve a session token to its user.
///
/// Joins the user row and re-checks it on every call: a session whose user
/// is missing or deactivated is never valid, regardless of expiry. On
/// success, a session older than [`RENEWAL_THRESHOLD`] since its last
/// refresh has both timestamps slid forward.
pub async fn resolve_session(pool: &PgPool, token: &str) -> Result<SessionUser, SessionError> {
    let row = sqlx::query(
        r"SELECT s.refreshed_at,
                 u.id AS user_id, u.name, u.email, u.image_url,
                 u.is_admin, u.is_agent, u.is_active
          FROM sessions s
          LEFT JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(SessionError::NotFound);
    };

    let user_id: Option<Uuid> = row.get("user_id");
    let Some(user_id) = user_id else {
        return Err(SessionError::UserNotFound);
    };
    if !row.get::<bool, _>("is_active") {
        return Err(SessionError::UserInactive);
    }

    let refreshed_at: OffsetDateTime = row.get("refreshed_at");
    let now = OffsetDateTime::now_utc();
    if needs_renewal(refreshed_at, now) {
        sqlx::query("UPDATE sessions SET expires_at = $2, refreshed_at = $3 WHERE token = $1")
            .bind(token)
            .bind(now + SESSION_LIFETIME)
            .bind(now)
            .execute(pool)
            .await?;
    }

    let wishlist: Vec<Uuid> =
        sqlx::query_scalar("SELECT listing_id FROM wishlist_items WHERE user_id = $1 ORDER BY created_at")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(SessionUser {
        id: user_id,
        name: row.get("name"),
        email: row.get("email"),
        image_url: row.get("image_url"),
        is_admin: row.get("is_admin"),
        is_agent: row.get("is_agent"),
        wishlist,
    })
}

/// Delete every session for a user, returning how many were removed.
///
/// Takes any executor so deactivation can run it inside the same transaction
/// as the user-flag change.
pub async fn invalidate_all_sessions<'e, E>(executor: E, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Delete a single session by token (sign-out).
pub async fn destroy_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
