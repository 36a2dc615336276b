//! Capture Core - Hardware-independent logic for the ESP32-CAM uploader
//!
//! This crate contains the capture session, the frame and upload seams and
//! the control loop, so they can be tested on the host platform without
//! requiring ESP32 hardware.

pub mod config;
pub mod control;
pub mod frame;
pub mod session;
pub mod upload;

pub use config::{CaptureConfig, ConfigError, Endpoint};
pub use control::{CaptureLoop, Iteration, LoopStats, LoopTiming, SessionState};
pub use frame::{Frame, FrameInfo, FrameSource, PixelFormat};
pub use session::{announce, CaptureSession, Toggle};
pub use upload::{UploadStatus, Uploader, UPLOAD_CONTENT_TYPE};
