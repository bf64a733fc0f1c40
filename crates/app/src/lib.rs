//! Tokengate application composition root
//!
//! Wires the token guards in front of a few demonstration handlers.

pub mod config;

pub use config::Config;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokengate_auth::{
    jwt_refresh_token_required, jwt_required, AuthConfig, AuthError, ClaimSet, Claims,
    RequestContext,
};
use tracing::info;

/// Create the main application router with all routes and middleware
pub fn create_app(auth_config: AuthConfig) -> Router {
    let auth = Arc::new(auth_config);
    let access = jwt_required(auth.clone());
    let refresh = jwt_refresh_token_required(auth);

    for (route, guard) in [
        ("/v1/me", &access),
        ("/v1/me/claims", &access),
        ("/v1/session/refresh", &refresh),
    ] {
        info!(route, token_type = %guard.expected(), "Guarded route");
    }

    let access_routes = Router::new()
        .route("/v1/me", get(me))
        .route("/v1/me/claims", get(raw_claims));

    let refresh_routes = Router::new().route("/v1/session/refresh", post(refresh_identity));

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { "Tokengate API v0.0.1-SNAPSHOT" }))
        .merge(access.apply(access_routes))
        .merge(refresh.apply(refresh_routes))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Identity and user claims of the access token holder
async fn me(Claims(claims): Claims) -> Json<Value> {
    Json(json!({
        "identity": claims.identity(),
        "user_claims": claims.user_claims(),
        "jti": claims.jti(),
    }))
}

/// Full decoded payload, read through the request context
async fn raw_claims(ctx: RequestContext) -> Result<Json<ClaimSet>, AuthError> {
    ctx.into_claims().map(Json).ok_or(AuthError::NotVerified)
}

/// Identity a refresh token was issued for; issuing the new pair is left to
/// the token service
async fn refresh_identity(Claims(claims): Claims) -> Json<Value> {
    Json(json!({
        "identity": claims.identity(),
        "jti": claims.jti(),
        "type": claims.token_type(),
    }))
}
