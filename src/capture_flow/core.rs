use crate::config::{CameraConstraints, CaptureSuccessPolicy, Config};
use crate::device_camera::interface::CameraError;
use crate::emotion_detector::interface::{DetectError, Detection, DetectionResult};
use crate::frame::CapturedFrame;
use std::time::Duration;

pub const CAMERA_NOT_READY_MESSAGE: &str = "Camera not ready. Please allow camera access first.";
pub const ALIGN_FACE_MESSAGE: &str = "Please align your face properly";
pub const DETECTION_ERROR_MESSAGE: &str = "Error detecting emotion. Please try again.";
pub const DETECTION_TIMEOUT_MESSAGE: &str = "Detection timed out. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStep {
    Drawing,
    Uploading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    PermissionPending { prompt_visible: bool },
    PermissionDenied,
    Streaming { stream_id: u64 },
    Capturing {
        stream_id: u64,
        request_id: u64,
        step: CaptureStep,
    },
    Terminated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub state: State,
    pub result: Option<Detection>,
    pub next_request_id: u64,
}

impl Model {
    pub fn trigger_enabled(&self) -> bool {
        !matches!(self.state, State::Capturing { .. } | State::Terminated)
    }

    pub fn loading(&self) -> bool {
        matches!(self.state, State::Capturing { .. })
    }

    pub fn prompt_visible(&self) -> bool {
        matches!(
            self.state,
            State::PermissionDenied
                | State::PermissionPending {
                    prompt_visible: true
                }
        )
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Terminated)
    }
}

#[derive(Debug)]
pub enum Event {
    Load,
    CameraOpenDone(Result<u64, CameraError>),
    RetryClicked,
    CaptureClicked,
    FrameCaptured {
        request_id: u64,
        result: Result<CapturedFrame, Box<dyn std::error::Error + Send + Sync>>,
    },
    DetectDone {
        request_id: u64,
        result: Result<DetectionResult, DetectError>,
    },
    RequestTimedOut { request_id: u64 },
    Unload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenCamera { constraints: CameraConstraints },
    BindPreview { stream_id: u64 },
    StopCamera,
    CaptureFrame {
        request_id: u64,
        canvas_width: u32,
        canvas_height: u32,
        quality: u8,
    },
    DetectEmotion { request_id: u64, frame: CapturedFrame },
    StartRequestTimer { request_id: u64, after: Duration },
    CancelRequestTimer { request_id: u64 },
    CancelRequest { request_id: u64 },
    Alert { message: String },
}

impl Effect {
    fn alert(message: &str) -> Self {
        Effect::Alert {
            message: message.to_string(),
        }
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (
        Model {
            state: State::Uninitialized,
            result: None,
            next_request_id: 1,
        },
        vec![],
    )
}

pub fn transition(config: &Config, model: Model, event: Event) -> (Model, Vec<Effect>) {
    let mut model = model;

    let effects = match (model.state.clone(), event) {
        (State::Terminated, _) => vec![],

        (State::Uninitialized, Event::Load) => {
            model.state = State::PermissionPending {
                prompt_visible: false,
            };
            vec![Effect::OpenCamera {
                constraints: config.camera.clone(),
            }]
        }

        (State::PermissionDenied, Event::RetryClicked) => {
            model.state = State::PermissionPending {
                prompt_visible: true,
            };
            vec![Effect::OpenCamera {
                constraints: config.camera.clone(),
            }]
        }

        (State::PermissionPending { .. }, Event::CameraOpenDone(Ok(stream_id))) => {
            model.state = State::Streaming { stream_id };
            vec![Effect::BindPreview { stream_id }]
        }

        (State::PermissionPending { .. }, Event::CameraOpenDone(Err(_))) => {
            model.state = State::PermissionDenied;
            vec![]
        }

        (State::Streaming { stream_id }, Event::CaptureClicked) => {
            let request_id = model.next_request_id;
            model.next_request_id += 1;
            model.state = State::Capturing {
                stream_id,
                request_id,
                step: CaptureStep::Drawing,
            };
            vec![
                Effect::CaptureFrame {
                    request_id,
                    canvas_width: config.canvas_width,
                    canvas_height: config.canvas_height,
                    quality: config.jpeg_quality,
                },
                Effect::StartRequestTimer {
                    request_id,
                    after: config.request_timeout,
                },
            ]
        }

        (
            State::Uninitialized | State::PermissionPending { .. } | State::PermissionDenied,
            Event::CaptureClicked,
        ) => vec![Effect::alert(CAMERA_NOT_READY_MESSAGE)],

        (
            State::Capturing {
                stream_id,
                request_id,
                step: CaptureStep::Drawing,
            },
            Event::FrameCaptured {
                request_id: captured_id,
                result,
            },
        ) if request_id == captured_id => match result {
            Ok(frame) => {
                model.state = State::Capturing {
                    stream_id,
                    request_id,
                    step: CaptureStep::Uploading,
                };
                vec![Effect::DetectEmotion { request_id, frame }]
            }
            Err(_) => {
                model.state = State::Streaming { stream_id };
                vec![
                    Effect::CancelRequestTimer { request_id },
                    Effect::alert(DETECTION_ERROR_MESSAGE),
                ]
            }
        },

        (
            State::Capturing {
                stream_id,
                request_id,
                step: CaptureStep::Uploading,
            },
            Event::DetectDone {
                request_id: done_id,
                result,
            },
        ) if request_id == done_id => {
            let mut effects = vec![Effect::CancelRequestTimer { request_id }];
            model.state = State::Streaming { stream_id };

            match result {
                Ok(DetectionResult::Detected(detection)) => {
                    model.result = Some(detection);
                    if config.capture_success_policy == CaptureSuccessPolicy::StopCamera {
                        model.state = State::Terminated;
                        effects.push(Effect::StopCamera);
                    }
                }
                Ok(DetectionResult::Failed { error }) => effects.push(Effect::Alert { message: error }),
                Err(DetectError::Rejected { .. }) => effects.push(Effect::alert(ALIGN_FACE_MESSAGE)),
                Err(DetectError::TimedOut) => effects.push(Effect::alert(DETECTION_TIMEOUT_MESSAGE)),
                Err(DetectError::Cancelled) => {}
                Err(DetectError::Transport(_) | DetectError::Malformed(_)) => {
                    effects.push(Effect::alert(DETECTION_ERROR_MESSAGE))
                }
            }

            effects
        }

        (
            State::Capturing {
                stream_id,
                request_id,
                ..
            },
            Event::RequestTimedOut {
                request_id: timed_out,
            },
        ) if request_id == timed_out => {
            model.state = State::Streaming { stream_id };
            vec![
                Effect::CancelRequest { request_id },
                Effect::alert(DETECTION_TIMEOUT_MESSAGE),
            ]
        }

        (state, Event::Unload) => {
            let mut effects = vec![Effect::StopCamera];
            if let State::Capturing { request_id, .. } = state {
                effects.push(Effect::CancelRequest { request_id });
                effects.push(Effect::CancelRequestTimer { request_id });
            }
            model.state = State::Terminated;
            effects
        }

        // Clicks on hidden or disabled controls, and stale completions.
        _ => vec![],
    };

    (model, effects)
}
