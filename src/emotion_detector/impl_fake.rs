use crate::emotion_detector::interface::{
    Detection, DetectionResult, DetectError, EmotionDetector, EMOTION_LABELS,
};
use crate::frame::CapturedFrame;
use crate::library::cancel::CancellationToken;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct EmotionDetectorFake {
    logger: Arc<dyn Logger + Send + Sync>,
    response: Mutex<Option<Result<DetectionResult, DetectError>>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl EmotionDetectorFake {
    /// Answers every frame with a random emotion.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("detector").with_namespace("fake"),
            response: Mutex::new(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn with_response(self, response: Result<DetectionResult, DetectError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            ..self
        }
    }

    #[allow(dead_code)]
    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Random scores per label, normalized so they sum to one; the top label wins.
    fn random_detection(&self) -> Result<DetectionResult, DetectError> {
        let mut rng = rand::rng();
        let score_dist =
            Uniform::new(0.01, 1.0).map_err(|e| DetectError::Transport(e.to_string()))?;

        let scores: Vec<f64> = EMOTION_LABELS
            .iter()
            .map(|_| score_dist.sample(&mut rng))
            .collect();
        let total: f64 = scores.iter().sum();

        let breakdown: Vec<(String, f64)> = EMOTION_LABELS
            .iter()
            .zip(scores)
            .map(|(label, score)| (label.to_string(), score / total))
            .collect();

        let (emotion, confidence) = breakdown
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .cloned()
            .ok_or_else(|| DetectError::Malformed("no labels".to_string()))?;

        Ok(DetectionResult::Detected(Detection {
            emotion,
            confidence,
            breakdown,
        }))
    }
}

impl EmotionDetector for EmotionDetectorFake {
    fn detect(
        &self,
        frame: &CapturedFrame,
        cancel: &CancellationToken,
    ) -> Result<DetectionResult, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .logger
            .info(&format!("Detecting emotion in {:?}", frame));

        std::thread::sleep(self.delay);

        if cancel.is_cancelled() {
            return Err(DetectError::Cancelled);
        }

        let fixed = self
            .response
            .lock()
            .map_err(|e| DetectError::Transport(e.to_string()))?
            .clone();

        match fixed {
            Some(response) => response,
            None => self.random_detection(),
        }
    }
}
