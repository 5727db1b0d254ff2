use std::fmt::Debug;
use std::future::Future;

use crate::domain::WaitlistEntry;
use crate::utils::error_chain_fmt;

/// SQLSTATE raised by Postgres (and anything fronting it) when an insert
/// collides with a unique constraint
pub const UNIQUE_VIOLATION: &str = "23505";

/// Everything that can go wrong on insert, as far as the signup flow cares.
/// Adapters are responsible for translating vendor-specific signals into
/// `Duplicate`; nothing above the adapter inspects error codes.
#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("An entry with this email already exists")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Classify a failure by the SQLSTATE it carried (if any)
    pub fn from_sql_state(
        code: Option<&str>,
        error: anyhow::Error,
    ) -> Self {
        match code {
            Some(UNIQUE_VIOLATION) => Self::Duplicate,
            _ => Self::Other(error),
        }
    }
}

impl Debug for StoreError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The persistent service holding waitlist entries. Uniqueness on `email` is
/// enforced by the store itself, atomically, on its side.
pub trait WaitlistStore: Send + Sync {
    fn insert(
        &self,
        entry: &WaitlistEntry,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
