use crate::helpers::check_redirect;
use crate::helpers::spawn_app;

#[tokio::test]
async fn landing_page_starts_with_modal_closed() {
    let app = spawn_app().await;

    let resp = app.get_landing().await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );

    let html = resp.text().await.unwrap();
    assert!(html.contains("Your 24/7 AI Property Team"));
    assert!(html.contains("Join Waitlist"));
    assert!(!html.contains(r#"id="waitlist-modal""#));
    assert!(!html.contains(r#"class="toaster""#));
}

#[tokio::test]
async fn modal_state_is_kept_per_visitor() {
    let app = spawn_app().await;

    let resp = app.open_modal().await;
    check_redirect(&resp, "/");
    let html = app.get_landing_html().await;
    assert!(html.contains(r#"id="waitlist-modal""#));
    assert!(html.contains("Join the Waitlist"));
    assert!(html.contains("Get early access when we launch"));
    assert!(html.contains(r#"placeholder="you@company.com""#));

    // a fresh client carries no session cookie, so it is a different visitor
    let stranger = reqwest::Client::new()
        .get(format!("{}/", app.addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!stranger.contains(r#"id="waitlist-modal""#));

    let resp = app.close_modal().await;
    check_redirect(&resp, "/");
    let html = app.get_landing_html().await;
    assert!(!html.contains(r#"id="waitlist-modal""#));
}

#[tokio::test]
async fn visitors_without_a_session_are_not_registered() {
    let app = spawn_app().await;

    // never keeps cookies
    let client = reqwest::Client::new();
    for _ in 0..3 {
        let resp = client.get(format!("{}/", app.addr)).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
    }
    assert!(app.registry.is_empty());

    app.open_modal().await;
    assert_eq!(app.registry.len(), 1);

    // the session now exists, so later page views reuse the same visitor
    app.get_landing().await;
    assert_eq!(app.registry.len(), 1);
}
