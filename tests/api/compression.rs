use crate::helpers::{spawn_app, LARGE_BODY_LENGTH};
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING};

#[tokio::test]
async fn responses_are_compressed_when_the_client_accepts_it() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(app.url("/large"))
        .header(ACCEPT_ENCODING, "gzip")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        Some("gzip"),
        response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
    );

    let body = response.bytes().await.expect("Failed to read the body");
    assert!(body.len() < LARGE_BODY_LENGTH);
}

#[tokio::test]
async fn responses_are_left_alone_without_accept_encoding() {
    let app = spawn_app().await;

    let response = app.get("/large", None).await;

    assert_eq!(200, response.status().as_u16());
    assert!(response.headers().get(CONTENT_ENCODING).is_none());

    let body = response.text().await.expect("Failed to read the body");
    assert_eq!(LARGE_BODY_LENGTH, body.len());
}
