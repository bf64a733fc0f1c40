//! Verified claims as seen by handlers

use axum::{http::StatusCode, routing::get, Router};
use serde_json::json;
use tokengate_auth::{Claims, RequestContext};

use crate::common::{error_code, TestApp};

#[tokio::test]
async fn test_raw_claims_round_trip() {
    let app = TestApp::new();
    let tokens = app.tokens();
    let mut claims = tokens.claims("user1", "access");
    claims.insert("user_claims".into(), json!({"role": "admin", "teams": ["blue"]}));
    claims.insert("custom".into(), json!(7));
    let token = tokens.sign(&claims);

    let (status, first) = app.get_with_token("/v1/me/claims", &token).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, serde_json::Value::Object(claims));

    // Decoding the same token again gives the same claim set
    let (_, second) = app.get_with_token("/v1/me/claims", &token).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_claims_extractor_without_guard() {
    async fn unguarded(Claims(claims): Claims) -> String {
        claims.jti().to_string()
    }

    async fn context(ctx: RequestContext) -> String {
        ctx.is_verified().to_string()
    }

    let router = Router::new()
        .route("/unguarded", get(unguarded))
        .route("/context", get(context));
    let app = TestApp {
        router,
        config: crate::common::TestConfig::from_env(),
    };

    let (status, body) = app
        .send(axum::http::Method::GET, "/unguarded", None)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), Some("NOT_VERIFIED"));

    let (status, body) = app
        .send(axum::http::Method::GET, "/context", None)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(false));
}
