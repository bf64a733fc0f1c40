//! axum glue for [`Guard`]
//!
//! The request's named arguments are its query-string parameters. When the
//! configured token argument is not among them, an `Authorization: Bearer`
//! header is accepted in its place. On success the verified [`ClaimSet`] is
//! inserted into the request extensions, which axum scopes to the single
//! request.
//!
//! ```ignore
//! let protected = Router::new().route("/v1/me", get(me));
//! let app = jwt_required(config).apply(protected);
//! ```
//!
//! [`ClaimSet`]: crate::ClaimSet

use std::collections::HashMap;

use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
    Router,
};

use crate::error::AuthError;
use crate::guard::Guard;

/// Middleware body for `axum::middleware::from_fn_with_state(guard, guard_middleware)`
pub async fn guard_middleware(
    State(guard): State<Guard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let args = request_arguments(&req, &guard.config().token_argument_name);
    let claims = guard.verify(&args)?;

    // middleware -> extractor
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

impl Guard {
    /// Guard every route already registered on `router`
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(middleware::from_fn_with_state(self, guard_middleware))
    }

    /// Guard a single method router
    pub fn layer<S>(self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(self, guard_middleware))
    }
}

/// Collect the named arguments of a request
fn request_arguments(req: &Request, token_argument: &str) -> HashMap<String, String> {
    let mut args = Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .map(|Query(query)| query)
        .unwrap_or_default();

    if !args.contains_key(token_argument) {
        if let Some(token) = req.headers().get(AUTHORIZATION).and_then(extract_bearer_token) {
            args.insert(token_argument.to_string(), token);
        }
    }

    args
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(header: &HeaderValue) -> Option<String> {
    header
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
