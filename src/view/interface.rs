use crate::device_camera::interface::MediaStream;
use std::error::Error;
use std::sync::Arc;

pub type ViewResult = Result<(), Box<dyn Error + Send + Sync>>;

/// What the result region shows after a successful detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub emotion: String,
    pub confidence_percent: String,
    pub breakdown: Vec<(String, String)>,
}

/// Surface of the login page.
pub trait LoginView: Send + Sync {
    /// Shows `text` in the message box, or hides the box on `None`.
    fn render_message(&self, text: Option<&str>) -> ViewResult;

    fn navigate(&self, url: &str) -> ViewResult;
}

/// Surface of the capture page.
pub trait CaptureView: Send + Sync {
    fn render_result(&self, result: Option<&ResultView>) -> ViewResult;

    fn set_trigger_enabled(&self, enabled: bool) -> ViewResult;

    fn set_loading(&self, loading: bool) -> ViewResult;

    fn set_permission_prompt_visible(&self, visible: bool) -> ViewResult;

    /// Binds the live feed to the preview, or clears it on `None`.
    fn bind_preview(&self, stream: Option<Arc<dyn MediaStream + Send + Sync>>) -> ViewResult;

    fn alert(&self, message: &str) -> ViewResult;
}
