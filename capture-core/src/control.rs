//! Session control loop: one frame acquire/release cycle per iteration,
//! uploading only while the capture session is active.

use log::{debug, error, info, warn};
use std::time::Duration;

use crate::config::CaptureConfig;
use crate::frame::{Frame, FrameInfo, FrameSource};
use crate::session::CaptureSession;
use crate::upload::{UploadStatus, Uploader};

// Log running totals every this many iterations
const STATS_LOG_INTERVAL: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub idle: Duration,
    pub capture: Duration,
}

impl LoopTiming {
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self {
            idle: config.idle_interval(),
            capture: config.capture_interval(),
        }
    }
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self::from_config(&CaptureConfig::default())
    }
}

/// What one iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub state: SessionState,
    pub frame: Option<FrameInfo>,
    pub upload: Option<UploadStatus>,
    pub sleep: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub captures: u64,
    pub uploads_ok: u64,
    pub upload_failures: u64,
    pub acquire_failures: u64,
}

pub struct CaptureLoop<'a, S: FrameSource, U: Uploader> {
    session: &'a CaptureSession,
    source: S,
    uploader: U,
    timing: LoopTiming,
    stats: LoopStats,
}

impl<'a, S: FrameSource, U: Uploader> CaptureLoop<'a, S, U> {
    pub fn new(session: &'a CaptureSession, source: S, uploader: U, timing: LoopTiming) -> Self {
        Self {
            session,
            source,
            uploader,
            timing,
            stats: LoopStats::default(),
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn uploader_mut(&mut self) -> &mut U {
        &mut self.uploader
    }

    /// Run one cycle and return what happened, including how long to sleep
    /// before the next one. Does not sleep itself.
    pub fn run_iteration(&mut self) -> Iteration {
        self.stats.iterations += 1;

        let frame = self.source.acquire();
        if frame.is_none() {
            self.stats.acquire_failures += 1;
            error!("Camera capture failed");
        }

        let iteration = if self.session.is_active() {
            self.capture(frame)
        } else {
            if let Some(frame) = frame {
                self.source.release(frame);
            }
            info!("Periodic capture session is inactive. Press the button to start.");
            Iteration {
                state: SessionState::Idle,
                frame: None,
                upload: None,
                sleep: self.timing.idle,
            }
        };

        if self.stats.iterations % STATS_LOG_INTERVAL == 0 {
            debug!("Loop stats: {:?}", self.stats);
        }

        iteration
    }

    fn capture(&mut self, frame: Option<S::Frame>) -> Iteration {
        let Some(frame) = frame else {
            return Iteration {
                state: SessionState::Capturing,
                frame: None,
                upload: None,
                sleep: self.timing.capture,
            };
        };

        self.stats.captures += 1;
        info!("Picture taken!");

        let info = frame.info();
        info!("Data size: {} bytes", info.len);
        info!("Data shape: [width, height, channels]");
        info!("{}", info.shape());

        let status = self.uploader.post_frame(frame.data());
        if status.is_success() {
            self.stats.uploads_ok += 1;
            info!("HTTP Response: {}", status);
        } else {
            self.stats.upload_failures += 1;
            warn!("HTTP Response: {}", status);
        }

        self.source.release(frame);

        Iteration {
            state: SessionState::Capturing,
            frame: Some(info),
            upload: Some(status),
            sleep: self.timing.capture,
        }
    }

    /// Run forever, handing each sleep to `sleep`
    pub fn run<F: FnMut(Duration)>(&mut self, mut sleep: F) -> ! {
        loop {
            let iteration = self.run_iteration();
            sleep(iteration.sleep);
        }
    }
}
