use crate::library::logger::interface::Logger;
use crate::login_flow::core::Model;
use crate::view::interface::LoginView;
use std::sync::Arc;

#[derive(Clone)]
pub struct Render {
    view: Arc<dyn LoginView + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Render {
    pub fn new(view: Arc<dyn LoginView + Send + Sync>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self { view, logger }
    }

    pub fn render(&self, model: &Model) {
        let text = model.message.as_ref().map(|message| message.text.as_str());
        if let Err(e) = self.view.render_message(text) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }
    }
}
