use std::time::Duration;

pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Face samples collected per student on registration and retraining.
pub const SAMPLE_TARGET: usize = 20;

/// Side length of a normalised face sample, in pixels.
pub const FACE_SIZE: u32 = 200;

/// Predictions with an LBPH distance at or above this are treated as unknown.
pub const RECOGNITION_THRESHOLD: f64 = 65.0;

/// Accepted predictions needed before a student is marked present.
pub const REQUIRED_RECOGNITIONS: u32 = 20;

/// Detector score threshold used by every capture workflow.
pub const DETECTION_CONFIDENCE: f64 = 0.5;

/// Pause after a frame that produced samples, giving the student time to move.
pub const CAPTURE_INTERVAL: Duration = Duration::from_millis(100);

pub const SAMPLE_EXTENSION: &str = "jpg";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// ffmpeg input device format and default device name per platform.
#[cfg(target_os = "linux")]
pub const CAMERA_INPUT_FORMAT: &str = "v4l2";
#[cfg(target_os = "linux")]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

#[cfg(target_os = "macos")]
pub const CAMERA_INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_DEVICE: &str = "0";

#[cfg(target_os = "windows")]
pub const CAMERA_INPUT_FORMAT: &str = "dshow";
#[cfg(target_os = "windows")]
pub const DEFAULT_CAMERA_DEVICE: &str = "video=Integrated Camera";

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const CAMERA_INPUT_FORMAT: &str = "v4l2";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
