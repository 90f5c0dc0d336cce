use app::App;
use auth::impl_http::AuthenticatorHttp;
use config::Config;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::sync::Arc;

mod app;
mod auth;
mod capture_flow;
mod config;
mod device_camera;
mod emotion_detector;
mod frame;
mod library;
mod login_flow;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    // One cookie jar so detection runs inside the login session.
    let client = reqwest::blocking::Client::builder()
        .cookie_store(true)
        .timeout(config.request_timeout)
        .build()?;

    let authenticator = Arc::new(AuthenticatorHttp::new(
        client.clone(),
        config.endpoint(&config.login_path),
        logger.clone(),
    ));

    #[cfg(not(feature = "fake-detector"))]
    let emotion_detector = Arc::new(emotion_detector::impl_http::EmotionDetectorHttp::new(
        client,
        config.endpoint(&config.detect_path),
        logger.clone(),
    ));

    #[cfg(feature = "fake-detector")]
    let emotion_detector = Arc::new(emotion_detector::impl_fake::EmotionDetectorFake::new(
        logger.clone(),
    ));

    #[cfg(feature = "v4l2")]
    let device_camera = Arc::new(device_camera::impl_v4l2::DeviceCameraV4l2::new(
        "/dev/video0",
        logger.clone(),
    ));

    #[cfg(not(feature = "v4l2"))]
    let device_camera = Arc::new(device_camera::impl_fake::DeviceCameraFake::new(
        logger.clone(),
    ));

    let app = App::new(
        config,
        logger,
        authenticator,
        device_camera,
        emotion_detector,
    );

    app.start()?;

    Ok(())
}
