//! Concrete `WaitlistStore`s, and picking one from configuration.
mod postgres;
mod rest;
pub use postgres::PgWaitlistStore;
pub use rest::RestWaitlistStore;

use crate::configuration::StoreSettings;
use crate::domain::WaitlistEntry;
use crate::waitlist::StoreError;
use crate::waitlist::WaitlistStore;

/// The store selected by `StoreSettings`
pub enum WaitlistBackend {
    Rest(RestWaitlistStore),
    Postgres(PgWaitlistStore),
}

impl WaitlistBackend {
    /// `Ok(None)` when no usable store is configured: the section is missing,
    /// or the REST url/key are blank. The server still starts; signups then
    /// report a configuration error.
    pub fn from_settings(settings: Option<&StoreSettings>) -> Result<Option<Self>, anyhow::Error> {
        let backend = match settings {
            None => {
                tracing::warn!("No waitlist store configured");
                None
            }
            Some(StoreSettings::Rest(rest)) if !rest.is_complete() => {
                tracing::warn!("Missing waitlist store url or api key");
                None
            }
            Some(StoreSettings::Rest(rest)) => Some(Self::Rest(RestWaitlistStore::from_settings(rest)?)),
            Some(StoreSettings::Postgres(db)) => Some(Self::Postgres(PgWaitlistStore::from_settings(db))),
        };
        Ok(backend)
    }
}

impl WaitlistStore for WaitlistBackend {
    async fn insert(
        &self,
        entry: &WaitlistEntry,
    ) -> Result<(), StoreError> {
        match self {
            Self::Rest(store) => store.insert(entry).await,
            Self::Postgres(store) => store.insert(entry).await,
        }
    }
}
