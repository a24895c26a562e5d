//! Handlers for the `/auth` resource (login, logout, current session).

use axum::extract::State;
use fieldhub_core::schemas::auth::LoginInput;
use fieldhub_db::models::user::UserResponse;
use serde::Serialize;

use crate::auth::jwt::generate_token;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ok, ApiJson, Message};
use crate::services::AuthService;
use crate::state::AppState;

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/auth/login
///
/// Every authentication failure answers the same 401 so callers cannot tell
/// an unknown email from a wrong password or an inactive account.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> AppResult<ApiJson<LoginResponse>> {
    let user = AuthService::new(&state.stores)
        .authenticate(&input)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let token = generate_token(&AuthUser::from(&user), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to issue session token: {e}")))?;

    Ok(ok(LoginResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        user,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> ApiJson<Message> {
    ok(Message::new("Logged out"))
}

/// GET /api/auth/session
pub async fn session(user: AuthUser) -> ApiJson<AuthUser> {
    ok(user)
}
