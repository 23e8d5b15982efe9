use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::token::ports::TokenServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Revoke the token the request was authenticated with.
pub async fn logout(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<()>, ApiError> {
    if let Some(token) = &authenticated.user.token {
        state.token_service.delete_by_token(&token.plaintext).await?;
        tracing::info!(user_id = %authenticated.user.id, token_id = %token.id, "Token revoked");
    }

    Ok(ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
