use serde::Serialize;
use validator::ValidateEmail;

/// An email address that passed syntactic validation. Can only be built with
/// `WaitlistEmail::parse`, so holding one means the check already happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WaitlistEmail(String);

impl WaitlistEmail {
    /// Surrounding whitespace is dropped, as `<input type="email">` does
    pub fn parse(email: String) -> Result<Self, String> {
        let email = email.trim().to_string();
        match ValidateEmail::validate_email(&email) {
            true => Ok(Self(email)),
            false => Err(format!("Invalid email: {email:?}")),
        }
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for WaitlistEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
