use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::update_user::update_user;
use super::handlers::validate_token::validate_token;
use super::middleware::authenticate as auth_middleware;
use crate::domain::token::service::TokenService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::PostgresTokenRepository;
use crate::outbound::repositories::PostgresUserRepository;

pub type AppUserService = UserService<PostgresUserRepository, PostgresTokenRepository>;
pub type AppTokenService = TokenService<PostgresTokenRepository, PostgresUserRepository>;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<AppUserService>,
    pub token_service: Arc<AppTokenService>,
}

pub fn create_router(
    user_service: Arc<AppUserService>,
    token_service: Arc<AppTokenService>,
) -> Router {
    let state = AppState {
        user_service,
        token_service,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/validate", post(validate_token))
        .route("/api/users", post(create_user));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/users", get(list_users))
        .route(
            "/api/users/:user_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out of the span so bearer tokens never reach the logs.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
