use crate::config::CameraConstraints;
use crate::device_camera::interface::{CameraError, DeviceCamera, MediaStream};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageFormat};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

const BUFFER_COUNT: u32 = 4;

/// V4L2 webcam delivering MJPEG frames.
pub struct DeviceCameraV4l2 {
    device_path: String,
    logger: Arc<dyn Logger + Send + Sync>,
    next_id: AtomicU64,
}

impl DeviceCameraV4l2 {
    pub fn new(device_path: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            device_path: device_path.to_string(),
            logger: logger.with_namespace("camera").with_namespace("v4l2"),
            next_id: AtomicU64::new(1),
        }
    }
}

fn map_io_error(device_path: &str, err: io::Error) -> CameraError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
        io::ErrorKind::NotFound => CameraError::NotFound(device_path.to_string()),
        _ => CameraError::Device(err.to_string()),
    }
}

impl DeviceCamera for DeviceCameraV4l2 {
    fn open(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Arc<dyn MediaStream + Send + Sync>, CameraError> {
        let _ = self
            .logger
            .info(&format!("Opening {} {:?}", self.device_path, constraints));

        let device =
            Device::with_path(&self.device_path).map_err(|e| map_io_error(&self.device_path, e))?;

        let requested = Format::new(constraints.width, constraints.height, FourCC::new(b"MJPG"));
        let format = device
            .set_format(&requested)
            .map_err(|e| map_io_error(&self.device_path, e))?;

        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(CameraError::Device(
                "MJPEG format not supported by device".to_string(),
            ));
        }

        let stream = MediaStreamV4l2::start(
            self.next_id.fetch_add(1, Ordering::SeqCst),
            device,
            self.logger.clone(),
        );

        Ok(Arc::new(stream))
    }
}

pub struct MediaStreamV4l2 {
    id: u64,
    live: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<DynamicImage>>>,
    capture_thread: Mutex<Option<JoinHandle<()>>>,
}

impl MediaStreamV4l2 {
    fn start(id: u64, device: Device, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let live = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(Mutex::new(None));

        let thread_live = live.clone();
        let thread_latest = latest.clone();
        let handle = std::thread::spawn(move || {
            if let Err(e) = capture_loop(&device, &thread_live, &thread_latest) {
                let _ = logger.error(&format!("Capture loop failed: {}", e));
            }
            thread_live.store(false, Ordering::SeqCst);
        });

        Self {
            id,
            live,
            latest,
            capture_thread: Mutex::new(Some(handle)),
        }
    }
}

fn capture_loop(
    device: &Device,
    live: &AtomicBool,
    latest: &Mutex<Option<DynamicImage>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut stream = MmapStream::with_buffers(device, Type::VideoCapture, BUFFER_COUNT)?;

    while live.load(Ordering::SeqCst) {
        let (data, _metadata) = CaptureStream::next(&mut stream)?;

        // Some webcams emit truncated MJPEG frames; skip them.
        if let Ok(frame) = image::load_from_memory_with_format(data, ImageFormat::Jpeg) {
            if let Ok(mut slot) = latest.lock() {
                *slot = Some(frame);
            }
        }
    }

    Ok(())
}

impl MediaStream for MediaStreamV4l2 {
    fn id(&self) -> u64 {
        self.id
    }

    fn read_frame(&self) -> Result<DynamicImage, CameraError> {
        if !self.is_active() {
            return Err(CameraError::Stopped);
        }

        self.latest
            .lock()
            .map_err(|e| CameraError::Device(e.to_string()))?
            .clone()
            .ok_or_else(|| CameraError::Device("no frame received yet".to_string()))
    }

    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);

        if let Ok(mut handle) = self.capture_thread.lock() {
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }

    fn is_active(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for MediaStreamV4l2 {
    fn drop(&mut self) {
        self.stop();
    }
}
