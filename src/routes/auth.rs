//! Auth routes — Google sign-in flow, session gates, sign-out.
//!
//! ARCHITECTURE
//! ============
//! `authenticate` resolves the session cookie into a tagged `SessionState`
//! instead of throwing: callers can tell "absent" from "present but
//! unusable" and react accordingly. Page gates are extractors that redirect
//! by exhaustive role match; API handlers use `AuthUser`, which rejects with
//! a status code.

use axum::extract::{FromRef, FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::services::{google, session};
use crate::services::session::{Role, SessionError, SessionErrorTag, SessionUser};
use crate::state::AppState;

/// The `__Secure-` prefixed name is only accepted on HTTPS origins, so
/// non-production deployments use the bare name and never collide with a
/// production cookie on a shared parent domain.
const SESSION_COOKIE_PROD: &str = "__Secure-next-auth.session-token";
const SESSION_COOKIE_DEV: &str = "next-auth.session-token";
const OAUTH_STATE_COOKIE: &str = "oauth_state";
const RETURN_TO_COOKIE: &str = "return_to";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn is_production() -> bool {
    std::env::var("APP_ENV").is_ok_and(|v| v.trim().eq_ignore_ascii_case("production"))
}

pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }
    is_production()
}

/// Session cookie name for the deployment environment.
#[must_use]
pub(crate) fn session_cookie_name(production: bool) -> &'static str {
    if production { SESSION_COOKIE_PROD } else { SESSION_COOKIE_DEV }
}

fn session_cookie(token: String, secure: bool, production: bool) -> Cookie<'static> {
    Cookie::build((session_cookie_name(production), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(session::SESSION_LIFETIME)
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Only local absolute paths may be used as a post-login return target.
pub(crate) fn sanitize_return_to(raw: Option<&str>) -> String {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_owned(),
        _ => "/".to_owned(),
    }
}

// =============================================================================
// AUTH GATE
// =============================================================================

/// Outcome of resolving the session cookie on a request.
#[derive(Debug)]
pub enum SessionState {
    /// No cookie, or the token is unknown/expired.
    Missing,
    Valid(SessionUser),
    /// A token was presented but its subject is unusable.
    Invalid(SessionErrorTag),
}

/// Resolve the request's session cookie without failing for expected
/// invalid-session outcomes.
pub async fn authenticate(state: &AppState, jar: &CookieJar) -> SessionState {
    let name = session_cookie_name(is_production());
    let token = jar.get(name).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return SessionState::Missing;
    }

    match session::resolve_session(&state.pool, token).await {
        Ok(user) => SessionState::Valid(user),
        Err(SessionError::NotFound) => SessionState::Missing,
        Err(err) => {
            if let SessionError::Database(ref e) = err {
                tracing::error!(error = %e, "session lookup failed");
            }
            match err.tag() {
                Some(tag) => SessionState::Invalid(tag),
                None => SessionState::Missing,
            }
        }
    }
}

/// Where a role lands when denied entry to an admin-only surface.
/// `None` means entry is allowed.
pub(crate) fn admin_denial(role: Role) -> Option<&'static str> {
    match role {
        Role::Admin => None,
        Role::Agent => Some("/admin/dashboard"),
        Role::User | Role::Guest => Some("/"),
    }
}

/// Where a role lands when denied entry to an admin-or-agent surface.
pub(crate) fn staff_denial(role: Role) -> Option<&'static str> {
    match role {
        Role::Admin | Role::Agent => None,
        Role::User | Role::Guest => Some("/"),
    }
}

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter on JSON API routes; rejects with 401.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let name = session_cookie_name(is_production());
        let token = jar.get(name).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        match session::resolve_session(&app_state.pool, token).await {
            Ok(user) => Ok(Self { user, token: token.to_owned() }),
            Err(SessionError::Database(e)) => {
                tracing::error!(error = %e, "session lookup failed");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Err(_) => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

/// Page gate: any signed-in user. Fails closed to the login surface.
pub struct RequireAuth(pub SessionUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);
        match authenticate(&app_state, &jar).await {
            SessionState::Valid(user) => Ok(Self(user)),
            SessionState::Missing | SessionState::Invalid(_) => Err(Redirect::to("/login")),
        }
    }
}

/// Page gate: admin-or-agent areas (the agent-limited back office).
pub struct RequireStaff(pub SessionUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);
        match authenticate(&app_state, &jar).await {
            SessionState::Valid(user) => match staff_denial(user.role()) {
                None => Ok(Self(user)),
                Some(target) => Err(Redirect::to(target)),
            },
            SessionState::Missing | SessionState::Invalid(_) => Err(Redirect::to("/login")),
        }
    }
}

/// Page gate: admin-only areas. Agents land on their dashboard, not an
/// error page.
pub struct RequireAdmin(pub SessionUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);
        match authenticate(&app_state, &jar).await {
            SessionState::Valid(user) => match admin_denial(user.role()) {
                None => Ok(Self(user)),
                Some(target) => Err(Redirect::to(target)),
            },
            SessionState::Missing | SessionState::Invalid(_) => Err(Redirect::to("/login")),
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct SignInQuery {
    return_to: Option<String>,
}

/// `GET /auth/google` — redirect to the Google authorization page.
pub async fn google_redirect(State(state): State<AppState>, Query(params): Query<SignInQuery>) -> Response {
    let Some(config) = &state.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response();
    };

    let oauth_state = session::generate_token();
    let secure = cookie_secure();
    let state_cookie = Cookie::build((OAUTH_STATE_COOKIE, oauth_state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::minutes(10));
    let return_cookie = Cookie::build((RETURN_TO_COOKIE, sanitize_return_to(params.return_to.as_deref())))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::minutes(10));

    let jar = CookieJar::new().add(state_cookie).add(return_cookie);
    (jar, Redirect::temporary(&config.authorize_url(&oauth_state))).into_response()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: Option<String>,
}

/// `GET /auth/google/callback` — exchange code, upsert user, set session
/// cookie, redirect to the return URL.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(config) = &state.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response();
    };
    let secure = cookie_secure();
    let production = is_production();

    // Verify OAuth CSRF state from cookie.
    let Some(callback_state) = params.state.as_deref() else {
        return (StatusCode::BAD_REQUEST, "missing oauth state").into_response();
    };
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(Cookie::value).unwrap_or_default();
    if expected_state.is_empty() || expected_state != callback_state {
        return (StatusCode::UNAUTHORIZED, "invalid oauth state").into_response();
    }

    let return_to = sanitize_return_to(jar.get(RETURN_TO_COOKIE).map(Cookie::value));

    // Exchange code for access token.
    let access_token = match google::exchange_code(config, &params.code).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "oauth code exchange failed");
            return (StatusCode::BAD_GATEWAY, "OAuth code exchange failed").into_response();
        }
    };

    // Fetch the Google profile.
    let profile = match google::fetch_profile(&access_token).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "google profile fetch failed");
            return (StatusCode::BAD_GATEWAY, "Failed to fetch Google profile").into_response();
        }
    };

    // Upsert user in DB.
    let user = match google::upsert_user(&state.pool, &profile).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "user upsert failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user").into_response();
        }
    };

    let clear_state = expired_cookie(OAUTH_STATE_COOKIE, secure);
    let clear_return = expired_cookie(RETURN_TO_COOKIE, secure);

    // A deactivated account never gets a session.
    if !user.is_active {
        tracing::warn!(user_id = %user.id, "sign-in refused for deactivated user");
        let jar = jar.add(clear_state).add(clear_return);
        return (jar, Redirect::temporary("/login?error=user-inactive")).into_response();
    }

    // Create session.
    let new_session = match session::create_session(&state.pool, user.id).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "session creation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response();
        }
    };

    let jar = jar
        .add(session_cookie(new_session.token, secure, production))
        .add(clear_state)
        .add(clear_return);
    (jar, Redirect::temporary(&return_to)).into_response()
}

/// Session payload served to the client auth mirror.
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub user: Option<SessionUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionErrorTag>,
}

/// `GET /api/auth/session` — current session for the client mirror.
///
/// Always 200: "signed out" and "session carries an error tag" are payload
/// states, not transport failures.
pub async fn session_payload(State(state): State<AppState>, jar: CookieJar) -> Json<SessionPayload> {
    match authenticate(&state, &jar).await {
        SessionState::Valid(user) => Json(SessionPayload { user: Some(user), error: None }),
        SessionState::Missing => Json(SessionPayload { user: None, error: None }),
        SessionState::Invalid(tag) => Json(SessionPayload { user: None, error: Some(tag) }),
    }
}

/// `GET /account` — the signed-in traveler's account surface.
pub async fn account_home(RequireAuth(user): RequireAuth) -> Json<SessionUser> {
    Json(user)
}

/// `POST /api/auth/logout` — delete the session row, clear the cookie,
/// land on the login surface.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let production = is_production();
    let name = session_cookie_name(production);
    if let Some(cookie) = jar.get(name) {
        let _ = session::destroy_session(&state.pool, cookie.value()).await;
    }

    let jar = CookieJar::new().add(expired_cookie(name, cookie_secure()));
    (jar, Redirect::to("/login"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
