//! Request isolation under concurrency
//!
//! Many requests carrying different tokens run at once against one router;
//! each handler must only ever see the claims of its own request.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_see_only_their_own_claims() {
    let app = std::sync::Arc::new(TestApp::new());

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let identity = format!("user-{i}");
                let tokens = app.tokens();
                let mut claims = tokens.claims(&identity, "access");
                claims.insert("user_claims".into(), json!({ "seq": i }));
                let token = tokens.sign(&claims);

                for _ in 0..4 {
                    let (status, body) = app.get_with_token("/v1/me", &token).await.unwrap();
                    assert_eq!(status, StatusCode::OK);
                    assert_eq!(body["identity"], json!(identity));
                    assert_eq!(body["user_claims"]["seq"], json!(i));
                    assert_eq!(body["jti"], claims["jti"]);
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rejections_do_not_leak_into_accepted_requests() {
    let app = std::sync::Arc::new(TestApp::new());

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let tokens = app.tokens();
                let identity = format!("user-{i}");
                if i % 2 == 0 {
                    let (status, body) = app
                        .get_with_token("/v1/me", &tokens.access(&identity))
                        .await
                        .unwrap();
                    assert_eq!(status, StatusCode::OK);
                    assert_eq!(body["identity"], json!(identity));
                } else {
                    let (status, _) = app
                        .get_with_token("/v1/me", &tokens.refresh(&identity))
                        .await
                        .unwrap();
                    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}
