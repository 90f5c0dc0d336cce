use crate::capture_flow::core::Event as CaptureEvent;
use crate::device_camera::interface::MediaStream;
use crate::login_flow::core::Event as LoginEvent;
use crate::view::interface::{CaptureView, LoginView, ResultView, ViewResult};
use eframe::egui;
use std::collections::VecDeque;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const REPAINT_EVERY: Duration = Duration::from_millis(33);

#[derive(Clone, Default)]
struct GuiState {
    message: Option<String>,
    route: Option<String>,
    result: Option<ResultView>,
    trigger_enabled: bool,
    loading: bool,
    prompt_visible: bool,
    preview: Option<Arc<dyn MediaStream + Send + Sync>>,
    alerts: VecDeque<String>,
}

/// Widget state shared between the flows and the window.
#[derive(Clone, Default)]
pub struct ViewGui {
    state: Arc<Mutex<GuiState>>,
}

impl ViewGui {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, f: F) -> ViewResult
    where
        F: FnOnce(&mut GuiState),
    {
        let mut state = self.state.lock().map_err(|e| e.to_string())?;
        f(&mut state);
        Ok(())
    }

    fn snapshot(&self) -> Option<GuiState> {
        self.state.lock().ok().map(|state| state.clone())
    }

    fn dismiss_alert(&self) {
        let _ = self.update(|s| {
            s.alerts.pop_front();
        });
    }
}

impl LoginView for ViewGui {
    fn render_message(&self, text: Option<&str>) -> ViewResult {
        self.update(|s| s.message = text.map(str::to_string))
    }

    fn navigate(&self, url: &str) -> ViewResult {
        self.update(|s| s.route = Some(url.to_string()))
    }
}

impl CaptureView for ViewGui {
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
        self.update(|s| s.preview = stream)
    }

    fn alert(&self, message: &str) -> ViewResult {
        self.update(|s| s.alerts.push_back(message.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Page {
    Login,
    Redirected { url: String },
    Camera,
}

/// The desktop window. Reads `ViewGui` every frame and forwards clicks to the
/// flows as events.
pub struct GuiApp {
    view: ViewGui,
    login_events: Sender<LoginEvent>,
    capture_events: Sender<CaptureEvent>,
    camera_route: String,
    server_url: String,
    username: String,
    password: String,
    page: Page,
    preview_texture: Option<egui::TextureHandle>,
    unloaded: bool,
}

impl GuiApp {
    pub fn new(
        view: ViewGui,
        login_events: Sender<LoginEvent>,
        capture_events: Sender<CaptureEvent>,
        camera_route: &str,
        server_url: &str,
    ) -> Self {
        Self {
            view,
            login_events,
            capture_events,
            camera_route: camera_route.to_string(),
            server_url: server_url.trim_end_matches('/').to_string(),
            username: String::new(),
            password: String::new(),
            page: Page::Login,
            preview_texture: None,
            unloaded: false,
        }
    }

    /// Blocks until the window is closed.
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([720.0, 760.0])
                .with_title("Emotion Booth"),
            ..Default::default()
        };

        eframe::run_native("Emotion Booth", options, Box::new(|_cc| Box::new(self)))
            .map_err(|e| e.to_string())?;

        Ok(())
    }

    fn open_camera_page(&mut self) {
        self.page = Page::Camera;
        let _ = self.capture_events.send(CaptureEvent::Load);
    }

    fn follow_route(&mut self, state: &GuiState) {
        if self.page != Page::Login {
            return;
        }
        match &state.route {
            Some(url) if *url == self.camera_route => self.open_camera_page(),
            Some(url) => {
                self.page = Page::Redirected { url: url.clone() };
            }
            None => {}
        }
    }

    fn unload(&mut self) {
        if self.unloaded {
            return;
        }
        self.unloaded = true;
        let _ = self.login_events.send(LoginEvent::Unload);
        let _ = self.capture_events.send(CaptureEvent::Unload);
    }

    fn login_page(&mut self, ui: &mut egui::Ui, state: &GuiState) {
        ui.heading("Sign in");
        ui.add_space(12.0);

        ui.label("Username");
        ui.text_edit_singleline(&mut self.username);
        ui.label("Password");
        let password = ui.add(egui::TextEdit::singleline(&mut self.password).password(true));

        let entered = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Login").clicked() || entered {
            let _ = self.login_events.send(LoginEvent::Submit {
                username: self.username.clone(),
                password: self.password.clone(),
            });
        }

        if let Some(message) = &state.message {
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::from_rgb(200, 60, 60), message);
        }
    }

    fn redirected_page(&mut self, ui: &mut egui::Ui, url: &str) {
        ui.heading("Signed in");
        ui.label(format!("Redirected to {}", url));
        ui.hyperlink_to("Open in browser", format!("{}{}", self.server_url, url));
        ui.add_space(8.0);
        if ui.button("Continue to camera").clicked() {
            self.open_camera_page();
        }
    }

    fn camera_page(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, state: &GuiState) {
        ui.heading("Emotion detection");
        ui.add_space(8.0);

        if state.prompt_visible {
            ui.group(|ui| {
                ui.label("Please allow camera access to use emotion detection");
                if ui.button("Allow Access").clicked() {
                    let _ = self.capture_events.send(CaptureEvent::RetryClicked);
                }
            });
        }

        self.preview(ctx, ui, state);

        ui.horizontal(|ui| {
            let capture = ui.add_enabled(
                state.trigger_enabled,
                egui::Button::new("Capture Emotion"),
            );
            if capture.clicked() {
                let _ = self.capture_events.send(CaptureEvent::CaptureClicked);
            }
            if state.loading {
                ui.add(egui::Spinner::new());
            }
        });

        if let Some(result) = &state.result {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(&result.emotion).size(28.0).strong());
            ui.label(format!("Confidence: {}%", result.confidence_percent));

            if !result.breakdown.is_empty() {
                egui::Grid::new("breakdown").striped(true).show(ui, |ui| {
                    for (label, percent) in &result.breakdown {
                        ui.label(label);
                        ui.label(format!("{}%", percent));
                        ui.end_row();
                    }
                });
            }
        }
    }

    fn preview(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, state: &GuiState) {
        let frame = state
            .preview
            .as_ref()
            .filter(|stream| stream.is_active())
            .and_then(|stream| stream.read_frame().ok());

        let Some(frame) = frame else {
            self.preview_texture = None;
            return;
        };

        let rgb = frame.to_rgb8();
        let size = [rgb.width() as usize, rgb.height() as usize];
        let image = egui::ColorImage::from_rgb(size, rgb.as_raw());

        match &mut self.preview_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::default()),
            None => {
                self.preview_texture = Some(ctx.load_texture(
                    "preview",
                    image,
                    egui::TextureOptions::default(),
                ))
            }
        }

        if let Some(texture) = &self.preview_texture {
            ui.image((texture.id(), texture.size_vec2()));
        }
    }

    fn alert_modal(&self, ctx: &egui::Context, state: &GuiState) {
        let Some(message) = state.alerts.front() else {
            return;
        };

        egui::Window::new("Alert")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.view.dismiss_alert();
                }
            });
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.unload();
        }

        let Some(state) = self.view.snapshot() else {
            return;
        };
        self.follow_route(&state);

        egui::CentralPanel::default().show(ctx, |ui| match self.page.clone() {
            Page::Login => self.login_page(ui, &state),
            Page::Redirected { url } => self.redirected_page(ui, &url),
            Page::Camera => self.camera_page(ctx, ui, &state),
        });

        self.alert_modal(ctx, &state);
        ctx.request_repaint_after(REPAINT_EVERY);
    }
}
