use crate::device_camera::interface::MediaStream;
use crate::view::interface::{CaptureView, LoginView, ResultView, ViewResult};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub message: Option<String>,
    pub messages_shown: Vec<String>,
    pub navigations: Vec<String>,
    pub result: Option<ResultView>,
    pub trigger_enabled: bool,
    pub loading: bool,
    pub prompt_visible: bool,
    pub preview_stream: Option<u64>,
    pub alerts: Vec<String>,
}

/// Records what the flows asked the view to show.
#[derive(Clone, Default)]
pub struct ViewFake {
    snapshot: Arc<Mutex<ViewSnapshot>>,
}

impl ViewFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot
            .lock()
            .map(|snapshot| snapshot.clone())
            .unwrap_or_default()
    }

    /// Polls until `predicate` holds or `timeout` elapses.
    pub fn wait_until<F>(&self, timeout: Duration, predicate: F) -> bool
    where
        F: Fn(&ViewSnapshot) -> bool,
    {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if predicate(&self.snapshot()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        predicate(&self.snapshot())
    }

    fn update<F>(&self, f: F) -> ViewResult
    where
        F: FnOnce(&mut ViewSnapshot),
    {
        let mut snapshot = self.snapshot.lock().map_err(|e| e.to_string())?;
        f(&mut snapshot);
        Ok(())
    }
}

impl LoginView for ViewFake {
    fn render_message(&self, text: Option<&str>) -> ViewResult {
        self.update(|s| {
            if let Some(text) = text {
                if s.message.as_deref() != Some(text) {
                    s.messages_shown.push(text.to_string());
                }
            }
            s.message = text.map(str::to_string);
        })
    }

    fn navigate(&self, url: &str) -> ViewResult {
        self.update(|s| s.navigations.push(url.to_string()))
    }
}

impl CaptureView for ViewFake {
    fn render_result(&self, result: Option<&ResultView>) -> ViewResult {
        self.update(|s| s.result = result.cloned())
    }

    fn set_trigger_enabled(&self, enabled: bool) -> ViewResult {
        self.update(|s| s.trigger_enabled = enabled)
    }

    fn set_loading(&self, loading: bool) -> ViewResult {
        self.update(|s| s.loading = loading)
    }

    fn set_permission_prompt_visible(&self, visible: bool) -> ViewResult {
        self.update(|s| s.prompt_visible = visible)
    }

    fn bind_preview(&self, stream: Option<Arc<dyn MediaStream + Send + Sync>>) -> ViewResult {
        self.update(|s| s.preview_stream = stream.map(|stream| stream.id()))
    }

    fn alert(&self, message: &str) -> ViewResult {
        self.update(|s| s.alerts.push(message.to_string()))
    }
}
