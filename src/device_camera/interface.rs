use crate::config::CameraConstraints;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    PermissionDenied,
    NotFound(String),
    Device(String),
    Stopped,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied => write!(f, "camera permission denied"),
            CameraError::NotFound(device) => write!(f, "camera not found: {device}"),
            CameraError::Device(msg) => write!(f, "camera device error: {msg}"),
            CameraError::Stopped => write!(f, "camera stream stopped"),
        }
    }
}

impl std::error::Error for CameraError {}

/// A live camera feed. Stopping it stops every track; a stopped stream never
/// produces frames again.
pub trait MediaStream: Send + Sync {
    fn id(&self) -> u64;
    fn read_frame(&self) -> Result<DynamicImage, CameraError>;
    fn stop(&self);
    fn is_active(&self) -> bool;
}

pub trait DeviceCamera: Send + Sync {
    fn open(
        &self,
        constraints: &CameraConstraints,
    ) -> Result<Arc<dyn MediaStream + Send + Sync>, CameraError>;
}
