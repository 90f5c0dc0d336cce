use crate::auth::interface::Authenticator;
use crate::capture_flow::core::Event as CaptureEvent;
use crate::capture_flow::main::CaptureFlow;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::emotion_detector::interface::EmotionDetector;
use crate::library::logger::interface::Logger;
use crate::login_flow::core::Event as LoginEvent;
use crate::login_flow::main::LoginFlow;
use crate::view::impl_gui::{GuiApp, ViewGui};
use std::sync::Arc;

/// Wires both pages to one window and runs until it closes.
pub struct App {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    emotion_detector: Arc<dyn EmotionDetector + Send + Sync>,
}

impl App {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        authenticator: Arc<dyn Authenticator + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        emotion_detector: Arc<dyn EmotionDetector + Send + Sync>,
    ) -> Self {
        Self {
            config,
            logger,
            authenticator,
            device_camera,
            emotion_detector,
        }
    }

    pub fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let view = ViewGui::new();

        let (login_events, login_handle) = LoginFlow::new(
            self.config.clone(),
            self.logger.clone(),
            self.authenticator,
            Arc::new(view.clone()),
        )
        .spawn();

        let (capture_events, capture_handle) = CaptureFlow::new(
            self.config.clone(),
            self.logger.clone(),
            self.device_camera,
            self.emotion_detector,
            Arc::new(view.clone()),
        )
        .spawn();

        let gui = GuiApp::new(
            view,
            login_events.clone(),
            capture_events.clone(),
            &self.config.camera_route,
            &self.config.server_url,
        );
        let result = gui.run();

        // The window may close without a close request reaching it.
        let _ = login_events.send(LoginEvent::Unload);
        let _ = capture_events.send(CaptureEvent::Unload);

        let _ = login_handle.join();
        let _ = capture_handle.join();
        let _ = self.logger.info("Stopped");

        result
    }
}
