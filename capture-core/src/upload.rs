use std::fmt;

/// Content type sent with every frame upload
pub const UPLOAD_CONTENT_TYPE: &str = "data/jpeg";

/// Result of a single POST attempt. Never retried, only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// The server answered; any status code, 2xx or not
    Response(u16),
    /// The request could not be sent (no route, refused, timeout...)
    TransportFailure(String),
}

impl UploadStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadStatus::Response(code) if (200..300).contains(code))
    }

    /// Numeric status, `-1` when nothing was received
    pub fn code(&self) -> i32 {
        match self {
            UploadStatus::Response(code) => i32::from(*code),
            UploadStatus::TransportFailure(_) => -1,
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Response(code) => write!(f, "{}", code),
            UploadStatus::TransportFailure(reason) => write!(f, "{} ({})", self.code(), reason),
        }
    }
}

/// Blocking single-shot upload of a frame body to the fixed endpoint.
///
/// Implementations open and close their connection inside the call.
pub trait Uploader {
    fn post_frame(&mut self, body: &[u8]) -> UploadStatus;
}
