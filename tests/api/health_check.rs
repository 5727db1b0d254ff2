use crate::helpers::spawn_app;
use crate::helpers::spawn_app_without_store;

#[tokio::test]
async fn health_check() {
    let app = spawn_app().await;

    let resp = app
        .api_client
        .get(format!("{}/health_check", app.addr))
        .send()
        .await
        .expect("execute request");
    assert!(resp.status().is_success());
    assert_eq!(resp.content_length().unwrap(), 0); // empty body
    assert!(app.registry.is_configured());
}

#[tokio::test]
async fn health_check_without_store() {
    let app = spawn_app_without_store().await;

    let resp = reqwest::get(format!("http://127.0.0.1:{}/health_check", app.port))
        .await
        .expect("execute request");
    assert!(resp.status().is_success());
    assert!(!app.registry.is_configured());
}
