use crate::helpers::{spawn_app, MeBody};
use backend::errors::ErrorBody;
use uuid::Uuid;

#[tokio::test]
async fn anonymous_requests_have_no_current_user() {
    let app = spawn_app().await;

    let response = app.get("/me", None).await;

    assert_eq!(200, response.status().as_u16());
    let me: MeBody = response.json().await.expect("Invalid JSON response");
    assert!(me.user_id.is_none());
}

#[tokio::test]
async fn anonymous_requests_are_rejected_from_protected_routes() {
    let app = spawn_app().await;

    let response = app.get("/private", None).await;

    assert_eq!(401, response.status().as_u16());
    let error: ErrorBody = response.json().await.expect("Invalid JSON response");
    assert_eq!("Authentication required", error.error);
}

#[tokio::test]
async fn the_session_user_is_restored_on_later_requests() {
    let app = spawn_app().await;
    let user_id = Uuid::new_v4();

    let cookie = app.login(user_id, None).await;

    let response = app.get("/me", Some(&cookie)).await;
    let me: MeBody = response.json().await.expect("Invalid JSON response");
    assert_eq!(Some(user_id), me.user_id);

    let response = app.get("/private", Some(&cookie)).await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(user_id.to_string(), response.text().await.unwrap());
}

#[tokio::test]
async fn logging_in_renews_the_session() {
    let app = spawn_app().await;

    let response = app.get("/health_check", None).await;
    let anonymous_cookie = app
        .session_cookie(&response)
        .expect("No session cookie was issued");

    let user_id = Uuid::new_v4();
    let cookie = app.login(user_id, Some(&anonymous_cookie)).await;
    assert_ne!(anonymous_cookie, cookie);

    // The renewed session keeps what was stored before the renewal
    let response = app.get("/me", Some(&cookie)).await;
    let me: MeBody = response.json().await.expect("Invalid JSON response");
    assert_eq!(Some(user_id), me.user_id);

    // The pre-login session must not carry the user
    let response = app.get("/me", Some(&anonymous_cookie)).await;
    let me: MeBody = response.json().await.expect("Invalid JSON response");
    assert!(me.user_id.is_none());
}

#[tokio::test]
async fn logging_out_forgets_the_user() {
    let app = spawn_app().await;

    let cookie = app.login(Uuid::new_v4(), None).await;

    let response = app.post_json("/logout", &serde_json::json!({}), Some(&cookie)).await;
    assert_eq!(200, response.status().as_u16());

    let response = app.get("/me", Some(&cookie)).await;
    let me: MeBody = response.json().await.expect("Invalid JSON response");
    assert!(me.user_id.is_none());

    let response = app.get("/private", Some(&cookie)).await;
    assert_eq!(401, response.status().as_u16());
}
