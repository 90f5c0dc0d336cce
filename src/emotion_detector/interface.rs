use crate::frame::CapturedFrame;
use crate::library::cancel::CancellationToken;
use std::fmt;

/// Label order of the server's `all_predictions` vector.
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "neutral", "sad", "surprise",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub emotion: String,
    pub confidence: f64,
    pub breakdown: Vec<(String, f64)>,
}

impl Detection {
    /// Confidence as a percentage with one decimal, e.g. `0.873` -> `"87.3"`.
    pub fn confidence_percent(&self) -> String {
        percent(self.confidence)
    }
}

/// Formats a probability as a percentage with one decimal. Ties round away
/// from zero, so `0.3125` reads `"31.3"`.
pub fn percent(probability: f64) -> String {
    format!("{:.1}", (probability * 1000.0).round() / 10.0)
}

/// Body of a successful HTTP exchange with the detection endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionResult {
    Detected(Detection),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectError {
    Rejected { status: u16 },
    Transport(String),
    Malformed(String),
    TimedOut,
    Cancelled,
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::Rejected { status } => write!(f, "detection rejected with status {status}"),
            DetectError::Transport(msg) => write!(f, "transport error: {msg}"),
            DetectError::Malformed(msg) => write!(f, "malformed detection response: {msg}"),
            DetectError::TimedOut => write!(f, "detection request timed out"),
            DetectError::Cancelled => write!(f, "detection request cancelled"),
        }
    }
}

impl std::error::Error for DetectError {}

pub trait EmotionDetector: Send + Sync {
    fn detect(
        &self,
        frame: &CapturedFrame,
        cancel: &CancellationToken,
    ) -> Result<DetectionResult, DetectError>;
}
