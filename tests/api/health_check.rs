use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;
    assert_ne!(0, app.port);

    let response = app.get("/health_check", None).await;

    assert!(response.status().is_success());
    assert_eq!(0, response.content_length().unwrap());
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = spawn_app().await;

    let response = app.get("/user", None).await;

    assert_eq!(404, response.status().as_u16());
}
