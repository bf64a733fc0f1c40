//! Handler guards
//!
//! A [`Guard`] wraps a handler so that it only runs once a token of the
//! required type has been verified. The verified [`ClaimSet`] is handed to the
//! handler through its [`RequestContext`].
//!
//! ```ignore
//! let config = Arc::new(AuthConfig::new(secret));
//! let whoami = jwt_required(config).protect(|ctx: RequestContext, _args: HashMap<String, String>| {
//!     Ok::<_, AuthError>(ctx.jwt_identity().cloned())
//! });
//! ```

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::hash::BuildHasher;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::claims::{ClaimSet, TokenType};
use crate::config::AuthConfig;
use crate::context::RequestContext;
use crate::error::AuthError;
use crate::jwt::fetch_typed;

/// Boxed future returned by handlers wrapped with [`Guard::protect_async`]
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Named arguments of a single handler call
pub trait NamedArguments {
    /// String value of the argument called `name`
    fn argument(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> NamedArguments for HashMap<String, String, S> {
    fn argument(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl NamedArguments for BTreeMap<String, String> {
    fn argument(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl NamedArguments for Map<String, Value> {
    fn argument(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

impl<T: NamedArguments + ?Sized> NamedArguments for &T {
    fn argument(&self, name: &str) -> Option<&str> {
        (**self).argument(name)
    }
}

/// Token check for one required token type
#[derive(Debug, Clone)]
pub struct Guard {
    expected: TokenType,
    config: Arc<AuthConfig>,
}

/// Guard accepting only tokens of `expected` type
pub fn require_token(expected: TokenType, config: Arc<AuthConfig>) -> Guard {
    Guard { expected, config }
}

/// Guard for endpoints that need a valid access token
pub fn jwt_required(config: Arc<AuthConfig>) -> Guard {
    require_token(TokenType::Access, config)
}

/// Guard for endpoints that need a valid refresh token
pub fn jwt_refresh_token_required(config: Arc<AuthConfig>) -> Guard {
    require_token(TokenType::Refresh, config)
}

impl Guard {
    pub fn expected(&self) -> TokenType {
        self.expected
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Pull the token out of `args` and verify it.
    ///
    /// Runs exactly once per call; there is no retry on failure.
    pub fn verify<A: NamedArguments + ?Sized>(&self, args: &A) -> Result<ClaimSet, AuthError> {
        let argument = &self.config.token_argument_name;
        let token = args
            .argument(argument)
            .ok_or_else(|| AuthError::MissingToken {
                argument: argument.clone(),
            })
            .inspect_err(|_| {
                tracing::warn!(expected = %self.expected, %argument, "token argument missing");
            })?;

        match fetch_typed(token, self.expected, &self.config) {
            Ok(claims) => {
                tracing::debug!(expected = %self.expected, jti = claims.jti(), "token accepted");
                Ok(claims)
            }
            Err(e) => {
                tracing::warn!(expected = %self.expected, error = %e, "token rejected");
                Err(e)
            }
        }
    }

    /// Wrap a synchronous handler.
    ///
    /// The returned handler verifies the call's token, stores the claims in
    /// the context and forwards the original arguments. On failure the inner
    /// handler is not called and the error is returned as `E`.
    pub fn protect<A, T, E, H>(
        &self,
        handler: H,
    ) -> impl Fn(RequestContext, A) -> Result<T, E> + Clone
    where
        A: NamedArguments,
        H: Fn(RequestContext, A) -> Result<T, E> + Clone,
        E: From<AuthError>,
    {
        let guard = self.clone();
        move |mut ctx: RequestContext, args: A| -> Result<T, E> {
            let claims = guard.verify(&args)?;
            ctx.set_claims(claims);
            handler(ctx, args)
        }
    }

    /// Wrap an async handler.
    ///
    /// Verification still happens synchronously before the handler future is
    /// created, so a rejected call never polls the handler.
    pub fn protect_async<A, T, E, H, Fut>(
        &self,
        handler: H,
    ) -> impl Fn(RequestContext, A) -> BoxFuture<Result<T, E>> + Clone + Send + Sync
    where
        A: NamedArguments + Send + 'static,
        H: Fn(RequestContext, A) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: From<AuthError> + 'static,
        T: 'static,
    {
        let guard = self.clone();
        move |mut ctx: RequestContext, args: A| -> BoxFuture<Result<T, E>> {
            let verified = guard.verify(&args);
            let handler = handler.clone();
            Box::pin(async move {
                match verified {
                    Ok(claims) => ctx.set_claims(claims),
                    Err(e) => return Err(E::from(e)),
                }
                handler(ctx, args).await
            })
        }
    }
}
