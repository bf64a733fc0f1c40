//! Common test utilities and fixtures for integration tests
//!
//! - Test configuration loaded from the environment
//! - Token fixtures minted with `jsonwebtoken`
//! - Request helpers driving the application router in-process

#![allow(dead_code)]

use std::env;
use std::sync::Once;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};
use tokengate_auth::AuthConfig;
use tower::ServiceExt;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Test environment configuration
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub jwt_secret: String,
}

impl TestConfig {
    pub fn from_env() -> Self {
        INIT.call_once(|| {
            dotenvy::from_filename(".env.test").ok();
        });

        Self {
            jwt_secret: env::var("TEST_JWT_SECRET").unwrap_or_else(|_| "s3cret".to_string()),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.jwt_secret.clone())
    }
}

/// Application router plus the secret its tokens are signed with
pub struct TestApp {
    pub router: Router,
    pub config: TestConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let config = TestConfig::from_env();
        let router = tokengate_app::create_app(config.auth_config());
        Self { router, config }
    }

    pub fn with_auth_config(auth: AuthConfig) -> Self {
        let config = TestConfig {
            jwt_secret: auth.secret.clone(),
        };
        let router = tokengate_app::create_app(auth);
        Self { router, config }
    }

    /// Drive a hand-built router instead of the application one
    pub fn with_router(router: Router) -> Self {
        Self {
            router,
            config: TestConfig::from_env(),
        }
    }

    pub fn tokens(&self) -> TokenFixture {
        TokenFixture::new(&self.config.jwt_secret)
    }

    /// GET `path` with the token as the `token` query argument
    pub async fn get_with_token(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, &format!("{path}?token={token}"), None)
            .await
    }

    /// POST `path` with the token as the `token` query argument
    pub async fn post_with_token(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, &format!("{path}?token={token}"), None)
            .await
    }

    /// GET `path` with `Authorization: Bearer <token>`
    pub async fn get_with_bearer(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, Some(&format!("Bearer {token}")))
            .await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth_header: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let request = builder.body(Body::empty())?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        Ok((status, body))
    }
}

/// Mints HS256 test tokens
#[derive(Debug, Clone)]
pub struct TokenFixture {
    secret: String,
}

impl TokenFixture {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Claims of a fresh token with all required fields
    pub fn claims(&self, identity: &str, token_type: &str) -> Map<String, Value> {
        let now = Utc::now().timestamp();
        let claims = json!({
            "jti": Uuid::new_v4().to_string(),
            "identity": identity,
            "type": token_type,
            "user_claims": {},
            "iat": now,
            "nbf": now,
            "exp": now + 900,
        });
        match claims {
            Value::Object(map) => map,
            _ => unreachable!("json! object literal"),
        }
    }

    pub fn sign(&self, claims: &Map<String, Value>) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("Failed to encode JWT")
    }

    pub fn access(&self, identity: &str) -> String {
        self.sign(&self.claims(identity, "access"))
    }

    pub fn refresh(&self, identity: &str) -> String {
        self.sign(&self.claims(identity, "refresh"))
    }
}

/// Error code from a JSON error body
pub fn error_code(body: &Value) -> Option<&str> {
    body.pointer("/error/code").and_then(Value::as_str)
}

/// Error message from a JSON error body
pub fn error_message(body: &Value) -> Option<&str> {
    body.pointer("/error/message").and_then(Value::as_str)
}
