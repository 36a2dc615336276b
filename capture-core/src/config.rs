/// Capture settings that can be tested independently of the device
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::session::DEFAULT_DEBOUNCE_MS;
use crate::upload::UPLOAD_CONTENT_TYPE;

pub const DEFAULT_UPLOAD_HOST: &str = "172.20.10.5";
pub const DEFAULT_UPLOAD_PORT: u16 = 8080;
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_UPLOAD_HOST.to_string(),
            port: DEFAULT_UPLOAD_PORT,
            path: DEFAULT_UPLOAD_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    pub endpoint: Endpoint,
    pub content_type: String,
    /// Sleep between iterations while the session is inactive
    pub idle_interval_ms: u32,
    /// Sleep between uploads while the session is active
    pub capture_interval_ms: u32,
    pub debounce_ms: u32,
    pub wifi_retry_ms: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            content_type: UPLOAD_CONTENT_TYPE.to_string(),
            idle_interval_ms: 2_000,
            capture_interval_ms: 12_000,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            wifi_retry_ms: 1_000,
        }
    }
}

impl CaptureConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.idle_interval_ms))
    }

    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.capture_interval_ms))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.endpoint)?;
        if self.content_type.trim().is_empty() {
            return Err(ConfigError::EmptyContentType);
        }
        if self.idle_interval_ms == 0 || self.capture_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyHost,
    InvalidHost(String),
    ZeroPort,
    InvalidPath(String),
    EmptyContentType,
    ZeroInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyHost => write!(f, "upload host cannot be empty"),
            ConfigError::InvalidHost(host) => write!(f, "upload host '{}' contains invalid characters", host),
            ConfigError::ZeroPort => write!(f, "upload port cannot be 0"),
            ConfigError::InvalidPath(path) => write!(f, "upload path '{}' must start with '/'", path),
            ConfigError::EmptyContentType => write!(f, "content type cannot be empty"),
            ConfigError::ZeroInterval => write!(f, "loop intervals must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn validate_endpoint(endpoint: &Endpoint) -> Result<(), ConfigError> {
    if endpoint.host.is_empty() {
        return Err(ConfigError::EmptyHost);
    }
    if endpoint
        .host
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '@'))
    {
        return Err(ConfigError::InvalidHost(endpoint.host.clone()));
    }
    if endpoint.port == 0 {
        return Err(ConfigError::ZeroPort);
    }
    if !endpoint.path.starts_with('/') {
        return Err(ConfigError::InvalidPath(endpoint.path.clone()));
    }
    Ok(())
}
