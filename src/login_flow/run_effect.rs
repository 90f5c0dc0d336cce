use crate::auth::interface::Authenticator;
use crate::library::cancel::RequestRegistry;
use crate::library::logger::interface::Logger;
use crate::library::timer::KeyedTimer;
use crate::login_flow::core::{Effect, Event};
use crate::view::interface::LoginView;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
    view: Arc<dyn LoginView + Send + Sync>,
    requests: RequestRegistry,
    request_timer: Mutex<KeyedTimer>,
    dismiss_timer: Mutex<KeyedTimer>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        authenticator: Arc<dyn Authenticator + Send + Sync>,
        view: Arc<dyn LoginView + Send + Sync>,
    ) -> Self {
        Self {
            logger,
            authenticator,
            view,
            requests: RequestRegistry::new(),
            request_timer: Mutex::new(KeyedTimer::new()),
            dismiss_timer: Mutex::new(KeyedTimer::new()),
        }
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::Login {
                request_id,
                credentials,
            } => {
                let cancel = self.requests.register(request_id);
                let result = self.authenticator.login(&credentials, &cancel);
                self.requests.finish(request_id);

                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Login error: {}", e));
                }
                let _ = event_sender.send(Event::LoginDone { request_id, result });
            }
            Effect::StartRequestTimer { request_id, after } => {
                if let Ok(mut timer) = self.request_timer.lock() {
                    timer.schedule(request_id, after, move || {
                        let _ = event_sender.send(Event::RequestTimedOut { request_id });
                    });
                }
            }
            Effect::CancelRequestTimer { request_id } => {
                if let Ok(mut timer) = self.request_timer.lock() {
                    timer.cancel(request_id);
                }
            }
            Effect::CancelRequest { request_id } => {
                self.requests.cancel(request_id);
            }
            Effect::ScheduleMessageDismiss { message_id, after } => {
                if let Ok(mut timer) = self.dismiss_timer.lock() {
                    timer.schedule(message_id, after, move || {
                        let _ = event_sender.send(Event::MessageExpired { message_id });
                    });
                }
            }
            Effect::CancelMessageDismiss { message_id } => {
                if let Ok(mut timer) = self.dismiss_timer.lock() {
                    timer.cancel(message_id);
                }
            }
            Effect::Navigate { url } => {
                if let Err(e) = self.view.navigate(&url) {
                    let _ = self.logger.error(&format!("Navigation to {} failed: {}", url, e));
                }
            }
        }
    }
}
