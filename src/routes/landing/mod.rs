use actix_web::http::header::ContentType;
use actix_web::web;
use actix_web::HttpResponse;

use super::existing_signup;
use crate::registry::SignupRegistry;
use crate::session_state::TypedSession;
use crate::waitlist::SignupState;
use crate::waitlist::Toast;
use crate::waitlist::ToastVariant;
use crate::waitlist::WaitlistStore;

pub const SUBMIT_LABEL: &str = "Join Waitlist";
pub const SUBMITTING_LABEL: &str = "Joining...";

/// `GET /`
///
/// Pending toasts are drained here, so each is shown exactly once. A first
/// visit renders the default page; the visitor is registered by their first
/// `/waitlist*` POST.
pub async fn landing<S: WaitlistStore + 'static>(
    session: TypedSession,
    registry: web::Data<SignupRegistry<S>>,
) -> Result<HttpResponse, actix_web::Error> {
    let body = match existing_signup(&session, &registry)? {
        Some(signup) => {
            let toasts = signup.notifier().drain();
            render_page(&signup.state(), &toasts)
        }
        None => render_page(&SignupState::default(), &[]),
    };
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

pub fn render_page(
    state: &SignupState,
    toasts: &[Toast],
) -> String {
    let toasts = render_toasts(toasts);
    let modal = match state.modal_open {
        true => render_modal(state),
        false => String::new(),
    };
    let sections = include_str!("./sections.html");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>PropertyAI - Your 24/7 AI Property Team</title>
</head>
<body>
{toasts}
{sections}
{modal}
</body>
</html>"#
    )
}

fn render_toasts(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ol class=\"toaster\">\n");
    for toast in toasts {
        let class = match toast.variant {
            ToastVariant::Default => "toast",
            ToastVariant::Destructive => "toast toast-destructive",
        };
        html.push_str(&format!(
            "    <li class=\"{class}\" role=\"status\"><strong>{}</strong><p>{}</p></li>\n",
            htmlescape::encode_minimal(&toast.title),
            htmlescape::encode_minimal(&toast.description),
        ));
    }
    html.push_str("</ol>");
    html
}

fn render_modal(state: &SignupState) -> String {
    let value = htmlescape::encode_attribute(&state.email_input);
    let (label, disabled) = match state.submitting {
        true => (SUBMITTING_LABEL, " disabled"),
        false => (SUBMIT_LABEL, ""),
    };
    format!(
        r#"<div id="waitlist-modal" class="modal">
    <form action="/waitlist/close" method="post">
        <button type="submit" aria-label="Close">&times;</button>
    </form>
    <h2>Join the Waitlist</h2>
    <p>Get early access when we launch</p>
    <form action="/waitlist" method="post">
        <label>Email
            <input required type="email" name="email" value="{value}" placeholder="you@company.com">
        </label>
        <button type="submit"{disabled}>{label}</button>
    </form>
</div>"#
    )
}
