use crate::helpers::spawn_app;
use backend::errors::ErrorBody;
use std::collections::HashMap;

#[tokio::test]
async fn signed_cookies_are_verified_with_the_application_secret() {
    let app = spawn_app().await;

    let cookie = format!("{}; theme=dark", app.signed_cookie("flavour", "oat"));
    let response = app.get("/cookies", Some(&cookie)).await;

    assert_eq!(200, response.status().as_u16());
    let signed: HashMap<String, String> = response.json().await.expect("Invalid JSON response");
    assert_eq!(HashMap::from([("flavour".to_string(), "oat".to_string())]), signed);
}

#[tokio::test]
async fn tampered_signed_cookies_are_not_trusted() {
    let app = spawn_app().await;

    let signed_cookie = app.signed_cookie("flavour", "oat");
    let cookie = format!("{}rye", signed_cookie.strip_suffix("oat").unwrap());
    let response = app.get("/cookies", Some(&cookie)).await;

    assert_eq!(200, response.status().as_u16());
    let signed: HashMap<String, String> = response.json().await.expect("Invalid JSON response");
    assert!(signed.is_empty());
}

#[tokio::test]
async fn a_malformed_cookie_is_rejected_before_the_body_is_parsed() {
    let app = spawn_app().await;

    let response = app
        .post_raw(
            "/echo",
            "application/json",
            "{not json".into(),
            Some("not-a-cookie"),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
    let error: ErrorBody = response.json().await.expect("Invalid JSON response");
    assert_eq!("Malformed cookie header", error.error);
}

#[tokio::test]
async fn a_malformed_cookie_never_reaches_the_route() {
    let app = spawn_app().await;

    let response = app.get("/health_check", Some("not-a-cookie")).await;

    assert_eq!(400, response.status().as_u16());
    assert!(app.session_cookie(&response).is_none());
}
