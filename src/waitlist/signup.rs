use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use super::Notifier;
use super::StoreError;
use super::SubmissionOutcome;
use super::WaitlistStore;
use crate::domain::WaitlistEmail;
use crate::domain::WaitlistEntry;
use crate::domain::LANDING_PAGE_SOURCE;

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// What the visitor currently sees. Reset (apart from `submitting`) when the
/// modal is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupState {
    pub modal_open: bool,
    pub email_input: String,
    /// True from the start of `submit` until its outcome is known
    pub submitting: bool,
}

/// One signup modal instance.
///
/// `Idle -> Submitting -> {Success | AlreadyRegistered | ConfigurationError |
/// SubmissionFailed} -> Idle`
///
/// The store is injected; `None` means no store was configured, and every
/// submission ends in `ConfigurationError` without touching the network.
pub struct WaitlistSignup<S, N> {
    store: Option<Arc<S>>,
    notifier: N,
    source: String,
    timeout: Duration,
    // never held across an `.await`
    state: Mutex<SignupState>,
}

impl<S, N> WaitlistSignup<S, N>
where
    S: WaitlistStore,
    N: Notifier,
{
    pub fn new(
        store: Option<Arc<S>>,
        notifier: N,
    ) -> Self {
        Self {
            store,
            notifier,
            source: LANDING_PAGE_SOURCE.to_string(),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            state: Mutex::new(SignupState::default()),
        }
    }

    pub fn with_source(
        mut self,
        source: impl Into<String>,
    ) -> Self {
        self.source = source.into();
        self
    }

    /// Upper bound on a single insert; expiry counts as `SubmissionFailed`
    pub fn with_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn notifier(&self) -> &N { &self.notifier }

    /// Snapshot of the current state
    pub fn state(&self) -> SignupState { self.lock().clone() }

    pub fn is_submitting(&self) -> bool { self.lock().submitting }

    pub fn open_modal(&self) { self.lock().modal_open = true; }

    /// Allowed mid-submission. The pending insert is not cancelled, and its
    /// toast is still delivered.
    pub fn close_modal(&self) {
        let mut state = self.lock();
        state.modal_open = false;
        state.email_input.clear();
    }

    pub fn set_email_input(
        &self,
        value: String,
    ) {
        self.lock().email_input = value;
    }

    /// Attempt to register `email`, reporting exactly one toast.
    ///
    /// Returns `None` without doing anything if a submission is already in
    /// flight on this instance.
    pub async fn submit(
        &self,
        email: WaitlistEmail,
    ) -> Option<SubmissionOutcome> {
        self.submit_with_input(None, email).await
    }

    /// As `submit`, but first binds `input` (the raw form value) to the modal.
    /// An ignored call leaves the input untouched.
    pub async fn submit_form(
        &self,
        input: String,
        email: WaitlistEmail,
    ) -> Option<SubmissionOutcome> {
        self.submit_with_input(Some(input), email).await
    }

    #[tracing::instrument(
        name = "Submitting waitlist signup",
        skip(self, input, email),
        fields(waitlist_email = %email)
    )]
    async fn submit_with_input(
        &self,
        input: Option<String>,
        email: WaitlistEmail,
    ) -> Option<SubmissionOutcome> {
        let Some(in_flight) = self.begin(input) else {
            tracing::info!("Submission already in flight, ignoring");
            return None;
        };

        let outcome = self.attempt(email).await;

        if outcome.closes_modal() {
            let mut state = self.lock();
            state.modal_open = false;
            state.email_input.clear();
        }
        drop(in_flight);

        tracing::info!(?outcome, "Waitlist submission finished");
        self.notifier.notify(outcome.toast());
        Some(outcome)
    }

    async fn attempt(
        &self,
        email: WaitlistEmail,
    ) -> SubmissionOutcome {
        let Some(store) = &self.store else {
            tracing::warn!("Missing waitlist store configuration");
            return SubmissionOutcome::ConfigurationError;
        };

        let entry = WaitlistEntry {
            email,
            source: self.source.clone(),
        };

        match tokio::time::timeout(self.timeout, store.insert(&entry)).await {
            Ok(Ok(())) => SubmissionOutcome::Success,
            Ok(Err(StoreError::Duplicate)) => SubmissionOutcome::AlreadyRegistered,
            Ok(Err(e)) => {
                tracing::error!(
                    error.cause_chain=?e,
                    error.message=%e,
                    "Failed to insert waitlist entry"
                );
                SubmissionOutcome::SubmissionFailed
            }
            Err(_) => {
                tracing::error!(
                    timeout = ?self.timeout,
                    "Timed out inserting waitlist entry"
                );
                SubmissionOutcome::SubmissionFailed
            }
        }
    }

    /// Flip `submitting` on (and bind `input`), unless it already is
    fn begin(
        &self,
        input: Option<String>,
    ) -> Option<InFlight<'_>> {
        let mut state = self.lock();
        if state.submitting {
            return None;
        }
        state.submitting = true;
        if let Some(input) = input {
            state.email_input = input;
        }
        Some(InFlight { state: &self.state })
    }

    fn lock(&self) -> MutexGuard<'_, SignupState> { lock(&self.state) }
}

fn lock(state: &Mutex<SignupState>) -> MutexGuard<'_, SignupState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears `submitting` when dropped, including when the `submit` future is
/// dropped before completion.
struct InFlight<'a> {
    state: &'a Mutex<SignupState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) { lock(self.state).submitting = false; }
}
