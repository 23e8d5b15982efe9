use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::token::errors::TokenError;
use crate::domain::token::ports::TokenServicePort;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated user, with the presented token attached.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Middleware that resolves the bearer token and adds the user to request extensions.
///
/// Every failure produces the same 401 response; the reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not visible ASCII is treated like a missing one.
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let user = state
        .token_service
        .authenticate(authorization.as_deref())
        .await
        .map_err(|e| {
            match &e {
                TokenError::DatabaseError(_) | TokenError::User(_) => {
                    tracing::error!(error = %e, "Token lookup failed")
                }
                _ => tracing::warn!(reason = %e, "Rejected bearer token"),
            }
            ApiError::invalid_auth_credentials()
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}
