use serde::Serialize;

use super::WaitlistEmail;

/// Source tag for entries created by the landing page signup form
pub const LANDING_PAGE_SOURCE: &str = "landing_page";

/// A single row of the waitlist table. Created once, when a submission
/// succeeds; never read back, updated or deleted by this crate.
///
/// Serializes to `{"email": ..., "source": ...}`, which is also the shape of
/// the REST insert body.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntry {
    pub email: WaitlistEmail,
    pub source: String,
}
