use crate::capture_flow::core::{Effect, Event};
use crate::config::CameraConstraints;
use crate::device_camera::interface::{CameraError, DeviceCamera, MediaStream};
use crate::emotion_detector::interface::EmotionDetector;
use crate::frame::capture_frame;
use crate::library::cancel::RequestRegistry;
use crate::library::logger::interface::Logger;
use crate::library::timer::KeyedTimer;
use crate::view::interface::CaptureView;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

/// The page's camera handle. Once released it stays released: a stream that
/// finishes opening afterwards is stopped on the spot.
#[derive(Default)]
struct StreamSlot {
    stream: Option<Arc<dyn MediaStream + Send + Sync>>,
    released: bool,
}

pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    emotion_detector: Arc<dyn EmotionDetector + Send + Sync>,
    view: Arc<dyn CaptureView + Send + Sync>,
    stream: Mutex<StreamSlot>,
    requests: RequestRegistry,
    request_timer: Mutex<KeyedTimer>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        emotion_detector: Arc<dyn EmotionDetector + Send + Sync>,
        view: Arc<dyn CaptureView + Send + Sync>,
    ) -> Self {
        Self {
            logger,
            device_camera,
            emotion_detector,
            view,
            stream: Mutex::new(StreamSlot::default()),
            requests: RequestRegistry::new(),
            request_timer: Mutex::new(KeyedTimer::new()),
        }
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::OpenCamera { constraints } => {
                let opened = self.open_camera(&constraints);
                if let Err(e) = &opened {
                    let _ = self.logger.error(&format!("Camera error: {}", e));
                }
                let _ = event_sender.send(Event::CameraOpenDone(opened));
            }
            Effect::BindPreview { stream_id } => self.bind_preview(stream_id),
            Effect::StopCamera => self.stop_camera(),
            Effect::CaptureFrame {
                request_id,
                canvas_width,
                canvas_height,
                quality,
            } => {
                let result = self.active_stream().and_then(|stream| {
                    let video_frame = stream.read_frame()?;
                    Ok(capture_frame(&video_frame, canvas_width, canvas_height, quality)?)
                });
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Capture failed: {}", e));
                }
                let _ = event_sender.send(Event::FrameCaptured { request_id, result });
            }
            Effect::DetectEmotion { request_id, frame } => {
                let cancel = self.requests.register(request_id);
                let result = self.emotion_detector.detect(&frame, &cancel);
                self.requests.finish(request_id);

                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Detection failed: {}", e));
                }
                let _ = event_sender.send(Event::DetectDone { request_id, result });
            }
            Effect::StartRequestTimer { request_id, after } => {
                if let Ok(mut timer) = self.request_timer.lock() {
                    timer.schedule(request_id, after, move || {
                        let _ = event_sender.send(Event::RequestTimedOut { request_id });
                    });
                }
            }
            Effect::CancelRequestTimer { request_id } => {
                if let Ok(mut timer) = self.request_timer.lock() {
                    timer.cancel(request_id);
                }
            }
            Effect::CancelRequest { request_id } => {
                self.requests.cancel(request_id);
            }
            Effect::Alert { message } => {
                if let Err(e) = self.view.alert(&message) {
                    let _ = self.logger.error(&format!("Alert failed: {}", e));
                }
            }
        }
    }

    fn open_camera(&self, constraints: &CameraConstraints) -> Result<u64, CameraError> {
        let mut slot = self
            .stream
            .lock()
            .map_err(|e| CameraError::Device(e.to_string()))?;

        if slot.released {
            return Err(CameraError::Stopped);
        }

        // Never hold two streams.
        if let Some(previous) = slot.stream.take() {
            previous.stop();
        }

        let stream = self.device_camera.open(constraints)?;
        let stream_id = stream.id();
        slot.stream = Some(stream);
        Ok(stream_id)
    }

    /// Binds under the slot lock so a concurrent stop cannot be undone.
    fn bind_preview(&self, stream_id: u64) {
        let slot = match self.stream.lock() {
            Ok(slot) => slot,
            Err(e) => {
                let _ = self.logger.error(&format!("Preview bind failed: {}", e));
                return;
            }
        };

        let stream = match &slot.stream {
            Some(stream) if !slot.released && stream.id() == stream_id && stream.is_active() => {
                stream.clone()
            }
            _ => {
                let _ = self
                    .logger
                    .info(&format!("Stream {} gone, preview not bound", stream_id));
                return;
            }
        };

        if let Err(e) = self.view.bind_preview(Some(stream)) {
            let _ = self.logger.error(&format!("Preview bind failed: {}", e));
        }
    }

    fn stop_camera(&self) {
        let mut slot = match self.stream.lock() {
            Ok(slot) => slot,
            Err(e) => {
                let _ = self.logger.error(&format!("Camera stop failed: {}", e));
                return;
            }
        };
        slot.released = true;

        if let Some(stream) = slot.stream.take() {
            stream.stop();
            let _ = self
                .logger
                .info(&format!("Stream {} stopped", stream.id()));
        }

        if let Err(e) = self.view.bind_preview(None) {
            let _ = self.logger.error(&format!("Preview unbind failed: {}", e));
        }
    }

    fn active_stream(
        &self,
    ) -> Result<Arc<dyn MediaStream + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
        let slot = self.stream.lock().map_err(|e| e.to_string())?;
        match &slot.stream {
            Some(stream) if stream.is_active() => Ok(stream.clone()),
            _ => Err(Box::new(CameraError::Stopped)),
        }
    }
}
