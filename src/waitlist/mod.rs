//! The signup flow: one email in, one insert attempt out, one toast back.
mod notification;
mod outcome;
mod signup;
mod store;
pub use notification::Notifier;
pub use notification::Toast;
pub use notification::ToastQueue;
pub use notification::ToastVariant;
pub use outcome::SubmissionOutcome;
pub use signup::SignupState;
pub use signup::WaitlistSignup;
pub use signup::DEFAULT_SUBMIT_TIMEOUT;
pub use store::StoreError;
pub use store::WaitlistStore;
pub use store::UNIQUE_VIOLATION;
