use crate::auth::interface::Authenticator;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::login_flow::core::{init, transition, Effect, Event, Model};
use crate::login_flow::render::Render;
use crate::login_flow::run_effect::RunEffect;
use crate::view::interface::LoginView;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// The login page: form submission, message box and redirect.
pub struct LoginFlow {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
    view: Arc<dyn LoginView + Send + Sync>,
}

impl LoginFlow {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        authenticator: Arc<dyn Authenticator + Send + Sync>,
        view: Arc<dyn LoginView + Send + Sync>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("login"),
            authenticator,
            view,
        }
    }

    /// Starts the event loop on its own thread and returns the handle used to
    /// feed it form events.
    pub fn spawn(self) -> (Sender<Event>, std::thread::JoinHandle<Model>) {
        let config = self.config;
        let logger = self.logger.clone();
        let render = Render::new(self.view.clone(), self.logger.clone());
        let run_effect = Arc::new(RunEffect::new(
            self.logger.clone(),
            self.authenticator,
            self.view,
        ));

        let machine = StateMachine::new(
            init(),
            move |model: Model, event: Event| {
                let _ = logger.info(&format!(
                    "\nold model:\n\t{:?}\n\nevent:\n\t{:?}",
                    model, event
                ));
                let (new_model, effects) = transition(&config, model, event);
                let _ = logger.info(&format!(
                    "\nnew model:\n\t{:?}\n\neffects:\n\t{:?}",
                    new_model, effects
                ));
                (new_model, effects)
            },
            move |model: &Model| render.render(model),
            move |effect: Effect, event_sender: Sender<Event>| {
                run_effect.run_effect(effect, event_sender)
            },
            Model::is_done,
        );

        let sender = machine.sender();
        let handle = std::thread::spawn(move || machine.run());
        (sender, handle)
    }
}
