//! Google sign-in — code exchange, profile fetch, user upsert.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Google OAuth configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl GoogleConfig {
    /// Load from `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
    /// `GOOGLE_REDIRECT_URI`. Returns `None` if any are missing (sign-in
    /// will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;
        let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI").ok()?;
        Some(Self { client_id, client_secret, redirect_uri })
    }

    /// Build the Google authorization URL carrying the CSRF state.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&state={}",
            self.client_id, self.redirect_uri, state
        )
    }
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Userinfo profile for the signed-in Google account.
#[derive(Debug, serde::Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("google token exchange failed: {0}")]
    TokenExchange(String),
    #[error("google userinfo error: {0}")]
    Userinfo(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Exchange an OAuth code for an access token.
pub async fn exchange_code(config: &GoogleConfig, code: &str) -> Result<String, AuthError> {
    let client = reqwest::Client::new();
    let resp = client
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let body = resp
        .text()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
    let token_resp: TokenResponse =
        serde_json::from_str(&body).map_err(|_| AuthError::TokenExchange(format!("unexpected response: {body}")))?;
    Ok(token_resp.access_token)
}

/// Fetch the authenticated Google account's userinfo profile.
pub async fn fetch_profile(access_token: &str) -> Result<GoogleProfile, AuthError> {
    let client = reqwest::Client::new();
    let resp = client
        .get("https://openidconnect.googleapis.com/v1/userinfo")
        .header("Authorization", format!("Bearer {access_token}"))
        .send()
        .await
        .map_err(|e| AuthError::Userinfo(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::Userinfo(format!("{status}: {body}")));
    }

    resp.json::<GoogleProfile>()
        .await
        .map_err(|e| AuthError::Userinfo(e.to_string()))
}

/// Outcome of upserting a Google profile into the credential store.
#[derive(Debug, Clone, Copy)]
pub struct UpsertedUser {
    pub id: Uuid,
    /// Deactivated accounts keep their row but must never get a session.
    pub is_active: bool,
}

/// Upsert a user from their Google profile.
///
/// First sign-in creates exactly one row with both capability flags false
/// and the account active; later sign-ins only refresh name and avatar.
pub async fn upsert_user(pool: &PgPool, profile: &GoogleProfile) -> Result<UpsertedUser, AuthError> {
    let row = sqlx::query(
        r"INSERT INTO users (google_sub, email, name, image_url)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (google_sub) DO UPDATE
              SET name = EXCLUDED.name, image_url = EXCLUDED.image_url, updated_at = now()
          RETURNING id, is_active",
    )
    .bind(&profile.sub)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.picture)
    .fetch_one(pool)
    .await?;

    Ok(UpsertedUser { id: row.get("id"), is_active: row.get("is_active") })
}

#[cfg(test)]
#[path = "google_test.rs"]
mod tests;
