//! Axum extractors for verified claims
//!
//! Both read what [`crate::guard_middleware`] left in the request extensions.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::claims::ClaimSet;
use crate::context::RequestContext;
use crate::error::AuthError;

/// Verified claims of a guarded request.
///
/// Rejects with [`AuthError::NotVerified`] when no guard ran for the route.
#[derive(Debug, Clone)]
pub struct Claims(pub ClaimSet);

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(Claims)
            .ok_or(AuthError::NotVerified)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let mut ctx = RequestContext::new();
        if let Some(claims) = parts.extensions.get::<ClaimSet>() {
            ctx.set_claims(claims.clone());
        }
        Ok(ctx)
    }
}
