use crate::helpers::{spawn_app, spawn_app_with, test_configuration};
use backend::errors::ErrorBody;

#[tokio::test]
async fn json_bodies_are_decoded() {
    let app = spawn_app().await;
    let body = serde_json::json!({ "name": "le guin", "books": 23 });

    let response = app.post_json("/echo", &body, None).await;

    assert_eq!(200, response.status().as_u16());
    let echoed: serde_json::Value = response.json().await.expect("Invalid JSON response");
    assert_eq!(body, echoed);
}

#[tokio::test]
async fn invalid_json_is_rejected_with_a_400() {
    let app = spawn_app().await;

    let response = app
        .post_raw("/echo", "application/json", "{not json".into(), None)
        .await;

    assert_eq!(400, response.status().as_u16());
    let error: ErrorBody = response.json().await.expect("Invalid JSON response");
    assert_eq!("Invalid request body", error.error);
}

#[tokio::test]
async fn bodies_over_the_limit_are_rejected_with_a_413() {
    let mut configuration = test_configuration();
    configuration.body.json_limit_bytes = 32;
    let app = spawn_app_with(configuration, None).await;

    let body = serde_json::json!({ "name": "a".repeat(64) });
    let response = app.post_json("/echo", &body, None).await;

    assert_eq!(413, response.status().as_u16());
}

#[tokio::test]
async fn non_json_content_types_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .post_raw("/echo", "text/plain", "{\"name\":\"x\"}".into(), None)
        .await;

    assert!(response.status().is_client_error());
}
