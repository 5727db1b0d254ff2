use actix_web::web;
use actix_web::HttpResponse;
use serde::Deserialize;
use tracing::Instrument;

use super::current_signup;
use crate::domain::WaitlistEmail;
use crate::registry::SignupRegistry;
use crate::session_state::TypedSession;
use crate::utils::error_500;
use crate::utils::redirect;
use crate::waitlist::WaitlistStore;

#[derive(Deserialize)]
pub struct WaitlistFormData {
    email: String,
}

/// `POST /waitlist/open`
pub async fn open_waitlist<S: WaitlistStore + 'static>(
    session: TypedSession,
    registry: web::Data<SignupRegistry<S>>,
) -> Result<HttpResponse, actix_web::Error> {
    current_signup(&session, &registry)?.open_modal();
    Ok(redirect("/"))
}

/// `POST /waitlist/close`
pub async fn close_waitlist<S: WaitlistStore + 'static>(
    session: TypedSession,
    registry: web::Data<SignupRegistry<S>>,
) -> Result<HttpResponse, actix_web::Error> {
    current_signup(&session, &registry)?.close_modal();
    Ok(redirect("/"))
}

/// `POST /waitlist`
///
/// The outcome is not part of the response; it is queued as a toast and
/// rendered by the following `GET /`.
///
/// ```sh
///     curl -v -c jar -b jar --data 'email=you%40company.com' http://127.0.0.1:8000/waitlist
/// ```
///
/// A malformed email is rejected with 400 before the signup is involved
/// (browsers already refuse to submit it, thanks to `type="email"`). While a
/// submission is in flight the form is ignored entirely, input included.
#[tracing::instrument(
    name = "Joining the waitlist",
    skip(form, session, registry),
    fields(waitlist_email = %form.email)
)]
pub async fn join_waitlist<S: WaitlistStore + 'static>(
    form: web::Form<WaitlistFormData>,
    session: TypedSession,
    registry: web::Data<SignupRegistry<S>>,
) -> Result<HttpResponse, actix_web::Error> {
    let signup = current_signup(&session, &registry)?;
    let input = form.into_inner().email;

    let email = match WaitlistEmail::parse(input.clone()) {
        Ok(email) => email,
        Err(e) => {
            tracing::warn!(error.message = %e, "Rejected waitlist form");
            return Ok(HttpResponse::BadRequest().finish());
        }
    };

    // actix drops the handler future if the client disconnects; the insert
    // runs in its own task so that it always completes
    let outcome = actix_web::rt::spawn(
        async move { signup.submit_form(input, email).await }.instrument(tracing::Span::current()),
    )
    .await
    .map_err(error_500)?;

    if outcome.is_none() {
        tracing::info!("Ignored duplicate submit while another is in flight");
    }
    Ok(redirect("/"))
}
