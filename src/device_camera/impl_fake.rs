use crate::config::CameraConstraints;
use crate::device_camera::interface::{CameraError, DeviceCamera, MediaStream};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Synthetic camera. Permission can be flipped at runtime to exercise the
/// prompt and retry path.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    permission_granted: AtomicBool,
    next_id: AtomicU64,
    streams: Mutex<Vec<Arc<MediaStreamFake>>>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            permission_granted: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            streams: Mutex::new(vec![]),
        }
    }

    #[allow(dead_code)]
    pub fn set_permission_granted(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    /// Number of streams whose tracks are still live.
    #[allow(dead_code)]
    pub fn active_streams(&self) -> usize {
        self.streams
            .lock()
            .map(|streams| streams.iter().filter(|s| s.is_active()).count())
            .unwrap_or(0)
    }

    #[allow(dead_code)]
    pub fn opened_streams(&self) -> usize {
        self.streams.lock().map(|streams| streams.len()).unwrap_or(0)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Arc<dyn MediaStream + Send + Sync>, CameraError> {
        let _ = self.logger.info(&format!("Opening camera {:?}", constraints));

        if !self.permission_granted.load(Ordering::SeqCst) {
            let _ = self.logger.info("Permission denied");
            return Err(CameraError::PermissionDenied);
        }

        let stream = Arc::new(MediaStreamFake::new(
            self.next_id.fetch_add(1, Ordering::SeqCst),
            constraints.width,
            constraints.height,
        ));

        self.streams
            .lock()
            .map_err(|e| CameraError::Device(e.to_string()))?
            .push(stream.clone());

        let _ = self.logger.info(&format!("Stream {} started", stream.id));
        Ok(stream)
    }
}

pub struct MediaStreamFake {
    id: u64,
    width: u32,
    height: u32,
    frame_count: AtomicU64,
    video_track_live: AtomicBool,
}

impl MediaStreamFake {
    fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            frame_count: AtomicU64::new(0),
            video_track_live: AtomicBool::new(true),
        }
    }
}

impl MediaStream for MediaStreamFake {
    fn id(&self) -> u64 {
        self.id
    }

    fn read_frame(&self) -> Result<DynamicImage, CameraError> {
        if !self.is_active() {
            return Err(CameraError::Stopped);
        }

        let frame = self.frame_count.fetch_add(1, Ordering::Relaxed);
        let band = (frame * 4 % self.width.max(1) as u64) as u32;

        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            if x.abs_diff(band) < 8 {
                Rgb([255, 255, 255])
            } else {
                Rgb([
                    (x * 255 / self.width.max(1)) as u8,
                    (y * 255 / self.height.max(1)) as u8,
                    128,
                ])
            }
        });

        Ok(DynamicImage::ImageRgb8(image))
    }

    fn stop(&self) {
        self.video_track_live.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.video_track_live.load(Ordering::SeqCst)
    }
}
