use crate::emotion_detector::interface::{
    Detection, DetectionResult, DetectError, EmotionDetector, EMOTION_LABELS,
};
use crate::frame::CapturedFrame;
use crate::library::cancel::CancellationToken;
use crate::library::logger::interface::Logger;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Arc;

const FIELD_NAME: &str = "image";
const FILE_NAME: &str = "emotion.jpg";

pub struct EmotionDetectorHttp {
    client: Client,
    url: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl EmotionDetectorHttp {
    pub fn new(client: Client, url: String, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            client,
            url,
            logger: logger.with_namespace("detector").with_namespace("http"),
        }
    }
}

impl EmotionDetector for EmotionDetectorHttp {
    fn detect(
        &self,
        frame: &CapturedFrame,
        cancel: &CancellationToken,
    ) -> Result<DetectionResult, DetectError> {
        let _ = self
            .logger
            .info(&format!("POST {} ({} bytes)", self.url, frame.jpeg.len()));

        let part = Part::bytes(frame.jpeg.clone())
            .file_name(FILE_NAME)
            .mime_str("image/jpeg")
            .map_err(|e| DetectError::Transport(e.to_string()))?;
        let form = Form::new().part(FIELD_NAME, part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(map_transport_error)?;

        // The blocking client cannot be interrupted mid-flight; drop the answer instead.
        if cancel.is_cancelled() {
            return Err(DetectError::Cancelled);
        }

        let status = response.status();
        if !status.is_success() {
            let _ = self.logger.info(&format!("Rejected with {}", status));
            return Err(DetectError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(map_transport_error)?;
        parse_detection_body(&body)
    }
}

fn map_transport_error(err: reqwest::Error) -> DetectError {
    if err.is_timeout() {
        DetectError::TimedOut
    } else {
        DetectError::Transport(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct DetectionBody {
    emotion: Option<String>,
    confidence: Option<f64>,
    error: Option<String>,
    all_predictions: Option<Vec<f64>>,
}

pub fn parse_detection_body(body: &[u8]) -> Result<DetectionResult, DetectError> {
    let body: DetectionBody =
        serde_json::from_slice(body).map_err(|e| DetectError::Malformed(e.to_string()))?;

    if let Some(error) = body.error.filter(|error| !error.is_empty()) {
        return Ok(DetectionResult::Failed { error });
    }

    let (emotion, confidence) = match (body.emotion, body.confidence) {
        (Some(emotion), Some(confidence)) => (emotion, confidence),
        _ => {
            return Err(DetectError::Malformed(
                "missing emotion or confidence".to_string(),
            ))
        }
    };

    let breakdown = match body.all_predictions {
        Some(predictions) if predictions.len() == EMOTION_LABELS.len() => EMOTION_LABELS
            .iter()
            .map(|label| label.to_string())
            .zip(predictions)
            .collect(),
        _ => vec![],
    };

    Ok(DetectionResult::Detected(Detection {
        emotion,
        confidence,
        breakdown,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;
    use chrono::{Offset, Utc};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Accepts one connection, answers with `status` and `body`, returns the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/detect_emotion", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = Vec::new();
            let mut content_length = 0;
            let mut chunked = false;

            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                    chunked = true;
                }
                request.extend_from_slice(line.as_bytes());
                if line == "\r\n" {
                    break;
                }
            }

            if chunked {
                loop {
                    let mut size_line = String::new();
                    reader.read_line(&mut size_line).unwrap();
                    let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
                    let mut chunk = vec![0; size + 2];
                    reader.read_exact(&mut chunk).unwrap();
                    if size == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..size]);
                }
            } else {
                let mut body_bytes = vec![0; content_length];
                reader.read_exact(&mut body_bytes).unwrap();
                request.extend_from_slice(&body_bytes);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            request
        });

        (url, handle)
    }

    fn detector(url: String) -> EmotionDetectorHttp {
        EmotionDetectorHttp::new(
            Client::new(),
            url,
            Arc::new(LoggerConsole::new(Utc.fix())),
        )
    }

    fn frame() -> CapturedFrame {
        CapturedFrame {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn test_parse_detection() {
        let result = parse_detection_body(br#"{"emotion":"happy","confidence":0.873}"#).unwrap();

        match result {
            DetectionResult::Detected(detection) => {
                assert_eq!(detection.emotion, "happy");
                assert_eq!(detection.confidence_percent(), "87.3");
                assert!(detection.breakdown.is_empty());
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_confidence_ties_round_up() {
        let result = parse_detection_body(br#"{"emotion":"fear","confidence":0.3125}"#).unwrap();

        match result {
            DetectionResult::Detected(detection) => {
                assert_eq!(detection.confidence_percent(), "31.3");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_structured_error() {
        let result = parse_detection_body(br#"{"error":"no face"}"#).unwrap();

        assert_eq!(
            result,
            DetectionResult::Failed {
                error: "no face".to_string()
            }
        );
    }

    #[test]
    fn test_parse_breakdown() {
        let body = br#"{"emotion":"sad","confidence":0.5,"all_predictions":[0.1,0.0,0.0,0.1,0.2,0.5,0.1]}"#;

        let result = parse_detection_body(body).unwrap();

        match result {
            DetectionResult::Detected(detection) => {
                assert_eq!(detection.breakdown.len(), 7);
                assert_eq!(detection.breakdown[5], ("sad".to_string(), 0.5));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_detection_body(b"<html>oops</html>"),
            Err(DetectError::Malformed(_))
        ));
    }

    #[test]
    fn test_uploads_multipart_image_field() {
        let (url, server) = serve_once("200 OK", r#"{"emotion":"happy","confidence":0.9}"#);

        let result = detector(url).detect(&frame(), &CancellationToken::new());

        let request = String::from_utf8_lossy(&server.join().unwrap()).to_string();
        assert!(request.starts_with("POST /detect_emotion HTTP/1.1"));
        assert!(request.contains("name=\"image\"; filename=\"emotion.jpg\""));
        assert!(request.contains("image/jpeg"));
        assert!(matches!(result, Ok(DetectionResult::Detected(_))));
    }

    #[test]
    fn test_non_success_status_is_rejected() {
        let (url, server) = serve_once("400 BAD REQUEST", r#"{"error":"No face detected"}"#);

        let result = detector(url).detect(&frame(), &CancellationToken::new());

        server.join().unwrap();
        assert_eq!(result, Err(DetectError::Rejected { status: 400 }));
    }

    #[test]
    fn test_cancelled_request_drops_answer() {
        let (url, server) = serve_once("200 OK", r#"{"emotion":"happy","confidence":0.9}"#);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = detector(url).detect(&frame(), &cancel);

        server.join().unwrap();
        assert_eq!(result, Err(DetectError::Cancelled));
    }
}
