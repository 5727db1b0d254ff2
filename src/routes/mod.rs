mod health_check;
mod landing;
mod waitlist;
pub use health_check::*;
pub use landing::*;
pub use waitlist::*;

use std::sync::Arc;

use uuid::Uuid;

use crate::registry::Signup;
use crate::registry::SignupRegistry;
use crate::session_state::TypedSession;
use crate::utils::error_500;
use crate::waitlist::WaitlistStore;

/// Look up the visitor behind this session, assigning a fresh id on their
/// first request
fn current_signup<S: WaitlistStore>(
    session: &TypedSession,
    registry: &SignupRegistry<S>,
) -> Result<Arc<Signup<S>>, actix_web::Error> {
    let visitor_id = match session.get_visitor_id().map_err(error_500)? {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            session.insert_visitor_id(id).map_err(error_500)?;
            id
        }
    };
    Ok(registry.visitor(visitor_id))
}

/// As `current_signup`, but a request without a session gets `None` and is
/// not registered; crawlers and uptime checks never hold a cookie
fn existing_signup<S: WaitlistStore>(
    session: &TypedSession,
    registry: &SignupRegistry<S>,
) -> Result<Option<Arc<Signup<S>>>, actix_web::Error> {
    let visitor_id = session.get_visitor_id().map_err(error_500)?;
    Ok(visitor_id.map(|id| registry.visitor(id)))
}
