use super::Toast;

/// Terminal result of one `submit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// New entry created
    Success,
    /// The store already had this email. Not an error.
    AlreadyRegistered,
    /// No usable store; retrying through the form will not help
    ConfigurationError,
    /// Anything else, including timeouts. The user may retry.
    SubmissionFailed,
}

impl SubmissionOutcome {
    /// The one message shown to the user for this outcome. Never contains
    /// the underlying store error.
    pub fn toast(self) -> Toast {
        match self {
            Self::Success => Toast::new(
                "Welcome to the waitlist!",
                "We'll notify you when spots open up.",
            ),
            Self::AlreadyRegistered => Toast::new(
                "Already on the list!",
                "You're already signed up for early access.",
            ),
            Self::ConfigurationError => Toast::destructive(
                "Configuration error",
                "Please contact us directly to join the waitlist.",
            ),
            Self::SubmissionFailed => Toast::destructive(
                "Something went wrong",
                "Please try again or contact us directly.",
            ),
        }
    }

    /// Only a fresh signup dismisses the modal; on a duplicate it stays open
    /// so the message is read in context.
    pub fn closes_modal(self) -> bool { matches!(self, Self::Success) }
}
