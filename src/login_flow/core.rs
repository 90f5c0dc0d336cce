use crate::auth::interface::{AuthError, Credentials, LoginOutcome};
use crate::config::Config;
use std::time::Duration;

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter both username and password";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Editing,
    Submitting { request_id: u64 },
    Redirected { url: String },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub state: State,
    pub message: Option<Message>,
    pub next_id: u64,
}

impl Model {
    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replaces the message box content and schedules its dismissal.
    fn show_message(&mut self, config: &Config, text: &str, effects: &mut Vec<Effect>) {
        let message_id = self.take_id();
        self.message = Some(Message {
            id: message_id,
            text: text.to_string(),
        });
        effects.push(Effect::ScheduleMessageDismiss {
            message_id,
            after: config.message_dismiss_after,
        });
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Redirected { .. } | State::Closed)
    }
}

#[derive(Debug)]
pub enum Event {
    Submit { username: String, password: String },
    LoginDone {
        request_id: u64,
        result: Result<LoginOutcome, AuthError>,
    },
    RequestTimedOut { request_id: u64 },
    MessageExpired { message_id: u64 },
    Unload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Login {
        request_id: u64,
        credentials: Credentials,
    },
    StartRequestTimer { request_id: u64, after: Duration },
    CancelRequestTimer { request_id: u64 },
    CancelRequest { request_id: u64 },
    ScheduleMessageDismiss { message_id: u64, after: Duration },
    CancelMessageDismiss { message_id: u64 },
    Navigate { url: String },
}

pub fn init() -> (Model, Vec<Effect>) {
    (
        Model {
            state: State::Editing,
            message: None,
            next_id: 1,
        },
        vec![],
    )
}

pub fn transition(config: &Config, model: Model, event: Event) -> (Model, Vec<Effect>) {
    let mut model = model;
    let mut effects = vec![];

    match (model.state.clone(), event) {
        (State::Redirected { .. } | State::Closed, _) => {}

        (state, Event::Submit { username, password }) => {
            let username = username.trim();
            let password = password.trim();

            if username.is_empty() || password.is_empty() {
                model.show_message(config, MISSING_FIELDS_MESSAGE, &mut effects);
                return (model, effects);
            }

            // A new attempt supersedes the one in flight.
            if let State::Submitting { request_id } = state {
                effects.push(Effect::CancelRequest { request_id });
                effects.push(Effect::CancelRequestTimer { request_id });
            }

            let request_id = model.take_id();
            model.state = State::Submitting { request_id };
            effects.push(Effect::Login {
                request_id,
                credentials: Credentials {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            });
            effects.push(Effect::StartRequestTimer {
                request_id,
                after: config.request_timeout,
            });
        }

        (State::Submitting { request_id }, Event::LoginDone { request_id: done_id, result })
            if request_id == done_id =>
        {
            effects.push(Effect::CancelRequestTimer { request_id });

            match result {
                Ok(LoginOutcome::Redirect(url)) => {
                    if let Some(message) = model.message.take() {
                        effects.push(Effect::CancelMessageDismiss {
                            message_id: message.id,
                        });
                    }
                    effects.push(Effect::Navigate { url: url.clone() });
                    model.state = State::Redirected { url };
                }
                Ok(LoginOutcome::Rejected { message }) => {
                    model.state = State::Editing;
                    let text = message.unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
                    model.show_message(config, &text, &mut effects);
                }
                Err(AuthError::TimedOut) => {
                    model.state = State::Editing;
                    model.show_message(config, TIMEOUT_MESSAGE, &mut effects);
                }
                Err(AuthError::Cancelled) => {
                    model.state = State::Editing;
                }
                Err(AuthError::Transport(_) | AuthError::Malformed(_)) => {
                    model.state = State::Editing;
                    model.show_message(config, NETWORK_ERROR_MESSAGE, &mut effects);
                }
            }
        }

        (State::Submitting { request_id }, Event::RequestTimedOut { request_id: timed_out })
            if request_id == timed_out =>
        {
            model.state = State::Editing;
            effects.push(Effect::CancelRequest { request_id });
            model.show_message(config, TIMEOUT_MESSAGE, &mut effects);
        }

        (_, Event::MessageExpired { message_id }) => {
            if model.message.as_ref().map(|m| m.id) == Some(message_id) {
                model.message = None;
            }
        }

        (state, Event::Unload) => {
            if let State::Submitting { request_id } = state {
                effects.push(Effect::CancelRequest { request_id });
                effects.push(Effect::CancelRequestTimer { request_id });
            }
            if let Some(message) = &model.message {
                effects.push(Effect::CancelMessageDismiss {
                    message_id: message.id,
                });
            }
            model.state = State::Closed;
        }

        // Stale completions and timeouts of superseded attempts.
        _ => {}
    }

    (model, effects)
}
