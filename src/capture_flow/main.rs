use crate::capture_flow::core::{init, transition, Effect, Event, Model};
use crate::capture_flow::render::Render;
use crate::capture_flow::run_effect::RunEffect;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::emotion_detector::interface::EmotionDetector;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::view::interface::CaptureView;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

/// The camera page: preview, capture trigger, upload and result.
pub struct CaptureFlow {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    emotion_detector: Arc<dyn EmotionDetector + Send + Sync>,
    view: Arc<dyn CaptureView + Send + Sync>,
}

impl CaptureFlow {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        emotion_detector: Arc<dyn EmotionDetector + Send + Sync>,
        view: Arc<dyn CaptureView + Send + Sync>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("capture"),
            device_camera,
            emotion_detector,
            view,
        }
    }

    /// Starts the event loop on its own thread. The page is not loaded until
    /// `Event::Load` is sent.
    pub fn spawn(self) -> (Sender<Event>, JoinHandle<Model>) {
        let config = self.config;
        let logger = self.logger.clone();
        let render = Render::new(self.view.clone(), self.logger.clone());
        let run_effect = Arc::new(RunEffect::new(
            self.logger.clone(),
            self.device_camera,
            self.emotion_detector,
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
