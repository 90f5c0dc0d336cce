use crate::library::cancel::CancellationToken;
use serde::Serialize;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Redirect(String),
    Rejected { message: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    Transport(String),
    Malformed(String),
    TimedOut,
    Cancelled,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Transport(msg) => write!(f, "transport error: {msg}"),
            AuthError::Malformed(msg) => write!(f, "malformed login response: {msg}"),
            AuthError::TimedOut => write!(f, "login request timed out"),
            AuthError::Cancelled => write!(f, "login request cancelled"),
        }
    }
}

impl std::error::Error for AuthError {}

pub trait Authenticator: Send + Sync {
    fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome, AuthError>;
}
