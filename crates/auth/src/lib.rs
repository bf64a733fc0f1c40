//! Token guard middleware
//!
//! Verifies JWTs carried by a handler call, enforces access/refresh token
//! semantics and hands the verified claims to the handler through a
//! request-scoped context. Works with plain functions via [`Guard::protect`]
//! and with axum routers via [`Guard::apply`].

mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod guard;
mod jwt;
mod middleware;

pub use claims::{ClaimSet, TokenType};
pub use config::{
    AuthConfig, ConfigError, DEFAULT_IDENTITY_CLAIM, DEFAULT_TOKEN_ARGUMENT_NAME,
    DEFAULT_USER_CLAIMS,
};
pub use context::RequestContext;
pub use error::{AuthError, DecodeError, DecodeErrorKind};
pub use extractors::Claims;
pub use guard::{
    jwt_refresh_token_required, jwt_required, require_token, BoxFuture, Guard, NamedArguments,
};
pub use jwt::{decode_token, fetch_typed};
pub use middleware::guard_middleware;

pub use jsonwebtoken::Algorithm;
