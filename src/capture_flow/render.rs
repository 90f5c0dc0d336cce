use crate::capture_flow::core::Model;
use crate::emotion_detector::interface::{percent, Detection};
use crate::library::logger::interface::Logger;
use crate::view::interface::{CaptureView, ResultView, ViewResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct Render {
    view: Arc<dyn CaptureView + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

pub fn result_view(detection: &Detection) -> ResultView {
    ResultView {
        emotion: detection.emotion.clone(),
        confidence_percent: detection.confidence_percent(),
        breakdown: detection
            .breakdown
            .iter()
            .map(|(label, p)| (label.clone(), percent(*p)))
            .collect(),
    }
}

impl Render {
    pub fn new(
        view: Arc<dyn CaptureView + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self { view, logger }
    }

    pub fn render(&self, model: &Model) {
        if let Err(e) = self.try_render(model) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }
    }

    fn try_render(&self, model: &Model) -> ViewResult {
        self.view.set_permission_prompt_visible(model.prompt_visible())?;
        self.view.set_trigger_enabled(model.trigger_enabled())?;
        self.view.set_loading(model.loading())?;
        self.view
            .render_result(model.result.as_ref().map(result_view).as_ref())?;
        Ok(())
    }
}
