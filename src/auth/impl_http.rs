use crate::auth::interface::{AuthError, Authenticator, Credentials, LoginOutcome};
use crate::library::cancel::CancellationToken;
use crate::library::logger::interface::Logger;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Arc;

pub struct AuthenticatorHttp {
    client: Client,
    url: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl AuthenticatorHttp {
    pub fn new(client: Client, url: String, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            client,
            url,
            logger: logger.with_namespace("auth").with_namespace("http"),
        }
    }
}

impl Authenticator for AuthenticatorHttp {
    fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome, AuthError> {
        let _ = self
            .logger
            .info(&format!("POST {} as {}", self.url, credentials.username));

        let response = self
            .client
            .post(&self.url)
            .json(credentials)
            .send()
            .map_err(map_transport_error)?;

        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        // Status is ignored: the body alone says whether the login succeeded.
        let body = response.bytes().map_err(map_transport_error)?;
        parse_login_body(&body)
    }
}

fn map_transport_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::TimedOut
    } else {
        AuthError::Transport(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    success: bool,
    redirect: Option<String>,
    message: Option<String>,
}

pub fn parse_login_body(body: &[u8]) -> Result<LoginOutcome, AuthError> {
    let body: LoginBody =
        serde_json::from_slice(body).map_err(|e| AuthError::Malformed(e.to_string()))?;

    match (body.success, body.redirect) {
        (true, Some(redirect)) => Ok(LoginOutcome::Redirect(redirect)),
        (true, None) => Err(AuthError::Malformed(
            "success without redirect".to_string(),
        )),
        (false, _) => Ok(LoginOutcome::Rejected {
            message: body.message.filter(|message| !message.is_empty()),
        }),
    }
}
