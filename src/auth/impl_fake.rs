use crate::auth::interface::{AuthError, Authenticator, Credentials, LoginOutcome};
use crate::library::cancel::CancellationToken;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Accepts a single username/password pair.
pub struct AuthenticatorFake {
    logger: Arc<dyn Logger + Send + Sync>,
    accepted: Credentials,
    redirect: String,
    failure: Option<AuthError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl AuthenticatorFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, accepted: Credentials, redirect: &str) -> Self {
        Self {
            logger: logger.with_namespace("auth").with_namespace("fake"),
            accepted,
            redirect: redirect.to_string(),
            failure: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failure(self, failure: AuthError) -> Self {
        Self {
            failure: Some(failure),
            ..self
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Authenticator for AuthenticatorFake {
    fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!("Login {:?}", credentials));

        std::thread::sleep(self.delay);

        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        if *credentials == self.accepted {
            Ok(LoginOutcome::Redirect(self.redirect.clone()))
        } else {
            Ok(LoginOutcome::Rejected {
                message: Some("Invalid credentials".to_string()),
            })
        }
    }
}
