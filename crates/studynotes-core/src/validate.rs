//! Form checks done before calling into the store or the backend.
//!
//! The store never validates; front ends run these first and show the error message.

pub const MIN_PASSWORD_LEN: usize = 8;
pub const GAME_PIN_MIN_LEN: usize = 4;
pub const GAME_PIN_MAX_LEN: usize = 6;

/// A note ready to be saved: title and content trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub course: String,
}

impl NoteDraft {
    pub fn new(title: &str, content: &str, course: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            course: course.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(())
    }
}

/// Numeric quiz game pin, 4 to 6 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePin(String);

impl GamePin {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        let len_ok = (GAME_PIN_MIN_LEN..=GAME_PIN_MAX_LEN).contains(&s.len());
        if !len_ok || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidGamePin(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in both title and content")]
    EmptyNote,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("invalid game pin: {0:?} (expected 4-6 digits)")]
    InvalidGamePin(String),
}
