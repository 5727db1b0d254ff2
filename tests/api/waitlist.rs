use std::time::Duration;

use serde_json::json;
use wiremock::matchers::any;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::check_redirect;
use crate::helpers::spawn_app;
use crate::helpers::spawn_app_without_store;
use crate::helpers::TestApp;
use crate::helpers::API_KEY;
use crate::helpers::STORE_TIMEOUT_MILLISECONDS;

const MODAL: &str = r#"id="waitlist-modal""#;

fn prefilled(email: &str) -> String {
    format!(
        r#"name="email" value="{}""#,
        htmlescape::encode_attribute(email)
    )
}

/// Open the modal and submit `email`, returning the page rendered afterwards
async fn submit_from_modal(
    app: &TestApp,
    email: &str,
) -> String {
    app.open_modal().await;
    let resp = app.join_waitlist(email).await;
    check_redirect(&resp, "/");
    app.get_landing_html().await
}

#[tokio::test]
async fn new_email_joins_the_waitlist() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .and(header("apikey", API_KEY))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .and(body_json(json!([
            { "email": "new@x.com", "source": "landing_page" }
        ])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "new@x.com").await;

    assert!(html.contains("Welcome to the waitlist!"));
    assert!(!html.contains("toast-destructive"));
    assert!(!html.contains(MODAL));
}

#[tokio::test]
async fn existing_email_is_already_registered() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"waitlist_email_key\""
        })))
        .expect(1)
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "dup@x.com").await;

    assert!(html.contains("Already on the list!"));
    assert!(!html.contains("toast-destructive"));
    // the vendor message is never shown
    assert!(!html.contains("unique constraint"));
    assert!(html.contains(MODAL));
    assert!(html.contains(&prefilled("dup@x.com")));
}

#[tokio::test]
async fn missing_store_is_a_configuration_error() {
    let app = spawn_app_without_store().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "a@b.co").await;

    assert!(html.contains("Configuration error"));
    assert!(html.contains("toast-destructive"));
    assert!(html.contains(MODAL));
}

#[tokio::test]
async fn store_failure_is_reported_and_modal_stays_open() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": "08006",
            "message": "connection failure"
        })))
        .expect(1)
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "a@b.co").await;

    assert!(html.contains("Something went wrong"));
    assert!(html.contains("toast-destructive"));
    assert!(!html.contains("connection failure"));
    assert!(html.contains(MODAL));
    assert!(html.contains(&prefilled("a@b.co")));
    // submitting has been reset
    assert!(html.contains(">Join Waitlist</button>"));
    assert!(!html.contains("Joining..."));
}

#[tokio::test]
async fn unresponsive_store_is_a_submission_failure() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_delay(Duration::from_millis(STORE_TIMEOUT_MILLISECONDS * 6)),
        )
        .expect(1)
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "slow@x.com").await;

    assert!(html.contains("Something went wrong"));
    assert!(html.contains(MODAL));
}

#[tokio::test]
async fn submit_while_pending_is_ignored() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "code": "23505" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&app.store_server)
        .await;

    app.open_modal().await;
    let first = app.join_waitlist("first@x.com");
    let second = async {
        // lands while the first insert is still pending
        tokio::time::sleep(Duration::from_millis(100)).await;
        app.join_waitlist("second@x.com").await
    };
    let (first, second) = tokio::join!(first, second);
    check_redirect(&first, "/");
    check_redirect(&second, "/");

    assert_eq!(app.store_server.received_requests().await.unwrap().len(), 1);

    let html = app.get_landing_html().await;
    assert_eq!(html.matches("Already on the list!").count(), 1);
    assert!(html.contains(&prefilled("first@x.com")));
    assert!(!html.contains(&prefilled("second@x.com")));
}

#[tokio::test]
async fn invalid_email_is_rejected_with_400() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.store_server)
        .await;

    let cases = [
        ("email=".to_string(), "empty email"),
        ("email=not-an-email".to_string(), "no @"),
        ("email=%40domain.com".to_string(), "no subject"),
        ("".to_string(), "missing field"),
    ];

    for (body, msg) in cases {
        let resp = app.post_waitlist(body).await;
        assert_eq!(resp.status().as_u16(), 400, "{msg}");
    }

    // no outcome, so no toast
    let html = app.get_landing_html().await;
    assert!(!html.contains(r#"class="toaster""#));
}

#[tokio::test]
async fn toasts_are_shown_once() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "once@x.com").await;
    assert!(html.contains("Welcome to the waitlist!"));

    let html = app.get_landing_html().await;
    assert!(!html.contains("Welcome to the waitlist!"));
}

#[tokio::test]
async fn each_submission_gets_its_own_toast() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "code": "23505" })))
        .expect(2)
        .mount(&app.store_server)
        .await;

    app.open_modal().await;
    app.join_waitlist("dup@x.com").await;
    app.join_waitlist("dup@x.com").await;

    let html = app.get_landing_html().await;
    assert_eq!(html.matches("Already on the list!").count(), 2);
}

#[tokio::test]
async fn closing_the_modal_clears_the_input() {
    let app = spawn_app().await;

    Mock::given(path("/rest/v1/waitlist"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.store_server)
        .await;

    let html = submit_from_modal(&app, "keep@x.com").await;
    assert!(html.contains(&prefilled("keep@x.com")));

    let resp = app.close_modal().await;
    check_redirect(&resp, "/");
    app.open_modal().await;

    let html = app.get_landing_html().await;
    assert!(html.contains(MODAL));
    assert!(html.contains(r#"name="email" value="""#));
}
