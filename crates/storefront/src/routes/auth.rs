//! Auth route handlers.
//!
//! The logout handler is the orchestrator for the logout -> clear-cart
//! sequence: the auth store does not reach into the cart store behind the
//! scenes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopstore_core::Session;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Login request body.
///
/// Both fields are optional at the serde level so that missing fields get
/// the inline validation message instead of a generic deserialization error.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Current session response; `session` is `null` when logged out.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Option<Session>,
}

/// Log in against the configured auth backend.
///
/// Field validation happens before any network call. A persistence failure
/// after a successful login is logged but does not fail the request - the
/// in-memory session is authoritative.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>> {
    let username = require_field(form.username.as_deref(), "username")?;
    let password = require_field(form.password.as_deref(), "password")?;

    let session = state.login().login(username, password).await?;

    if let Err(e) = state
        .auth()
        .login_success(session.token.clone(), session.user.clone())
    {
        tracing::warn!(error = %e, "failed to persist session; continuing in memory");
    }

    tracing::info!(user = %session.user.username, "login succeeded");
    Ok(Json(SessionResponse {
        session: Some(session),
    }))
}

/// Log out: clear the session, then explicitly clear the cart.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Json<SessionResponse> {
    if let Err(e) = state.auth().logout() {
        tracing::warn!(error = %e, "failed to remove persisted session");
    }

    // Cross-store coordination lives here, not inside the auth store.
    state.cart().clear();

    Json(SessionResponse { session: None })
}

/// Current session snapshot.
#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        session: state.auth().current(),
    })
}

fn require_field<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}
