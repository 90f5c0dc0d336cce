use chrono::Offset;
use std::time::Duration;

/// What the capture page does after a successful detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureSuccessPolicy {
    /// Keep the camera open so the user can capture again.
    #[default]
    KeepStreaming,
    /// Disable the trigger and release the camera.
    StopCamera,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    User,
    Environment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConstraints {
    pub width: u32,
    pub height: u32,
    pub facing_mode: FacingMode,
    pub audio: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            facing_mode: FacingMode::User,
            audio: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub login_path: String,
    pub detect_path: String,
    pub camera_route: String,
    pub camera: CameraConstraints,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub jpeg_quality: u8,
    pub capture_success_policy: CaptureSuccessPolicy,
    pub message_dismiss_after: Duration,
    pub request_timeout: Duration,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            login_path: "/login".to_string(),
            detect_path: "/detect_emotion".to_string(),
            camera_route: "/camera".to_string(),
            camera: CameraConstraints::default(),
            canvas_width: 640,
            canvas_height: 480,
            jpeg_quality: 95,
            capture_success_policy: CaptureSuccessPolicy::default(),
            message_dismiss_after: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            logger_timezone: local_time(),
        }
    }
}

impl Config {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }
}

fn local_time() -> chrono::FixedOffset {
    chrono::Local::now().offset().fix()
}
