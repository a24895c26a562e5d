//! Session gate for protected routes.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::jwt::{generate_token, validate_token};
use crate::error::AppError;
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::state::AppState;

/// Response header carrying the reissued session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Reject the request with 401 unless it carries a valid bearer token.
///
/// On success the decoded [`AuthUser`] is stored in the request extensions
/// and a fresh token with the same identity is returned in
/// [`SESSION_TOKEN_HEADER`].
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = validate_token(token, &state.config.jwt).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AppError::unauthorized("Invalid or expired token")
    })?;

    let user = AuthUser::from(claims);
    let fresh_token = generate_token(&user, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to reissue session token: {e}")))?;

    request.extensions_mut().insert(user);
    let mut response = next.run(request).await;

    match HeaderValue::from_str(&fresh_token) {
        Ok(value) => {
            response.headers_mut().insert(SESSION_TOKEN_HEADER, value);
        }
        Err(e) => tracing::warn!(error = %e, "Reissued token is not a valid header value"),
    }

    Ok(response)
}
