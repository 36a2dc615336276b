//! Capture session flag and the debounced button toggle that drives it.
//!
//! `on_rising_edge` is called from the GPIO interrupt on the device, so it
//! only touches single-word atomics: no locks, no allocation, no logging.
//! The caller reports the returned [`Toggle`] with [`announce`] from a
//! context where logging is allowed.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Minimum spacing between two accepted button presses
pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

/// Outcome of one rising edge on the session button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Started,
    Stopped,
    Ignored,
}

impl Toggle {
    /// Bit pattern used to pass the outcome through a task notification
    pub const fn bits(self) -> u32 {
        match self {
            Toggle::Started => 0b001,
            Toggle::Stopped => 0b010,
            Toggle::Ignored => 0b100,
        }
    }

    /// Decode notification bits. When several edges were coalesced the
    /// last accepted state wins, which is what `active` holds anyway.
    pub fn from_bits(bits: u32, active: bool) -> Toggle {
        if bits & (Toggle::Started.bits() | Toggle::Stopped.bits()) == 0 {
            Toggle::Ignored
        } else if active {
            Toggle::Started
        } else {
            Toggle::Stopped
        }
    }
}

/// Process-wide capture session. Written only by the toggle handler, read by
/// the control loop.
#[derive(Debug)]
pub struct CaptureSession {
    active: AtomicBool,
    last_toggle_ms: AtomicU32,
    toggled_once: AtomicBool,
    debounce_ms: u32,
}

impl CaptureSession {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            active: AtomicBool::new(false),
            last_toggle_ms: AtomicU32::new(0),
            toggled_once: AtomicBool::new(false),
            debounce_ms,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Timestamp of the last accepted toggle, `None` before the first one
    pub fn last_toggle_ms(&self) -> Option<u32> {
        if self.toggled_once.load(Ordering::Acquire) {
            Some(self.last_toggle_ms.load(Ordering::Acquire))
        } else {
            None
        }
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }

    /// Handle a rising edge seen at `now_ms` (monotonic, wrapping milliseconds).
    ///
    /// Single writer: only the edge handler calls this, so the
    /// load-compare-store below cannot race with another writer.
    pub fn on_rising_edge(&self, now_ms: u32) -> Toggle {
        if self.toggled_once.load(Ordering::Acquire) {
            let last = self.last_toggle_ms.load(Ordering::Acquire);
            if now_ms.wrapping_sub(last) <= self.debounce_ms {
                return Toggle::Ignored;
            }
        }

        let active = !self.active.load(Ordering::Acquire);
        self.active.store(active, Ordering::Release);
        self.last_toggle_ms.store(now_ms, Ordering::Release);
        self.toggled_once.store(true, Ordering::Release);

        if active {
            Toggle::Started
        } else {
            Toggle::Stopped
        }
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

/// Log a toggle outcome. Ignored edges are silent.
pub fn announce(toggle: Toggle) {
    match toggle {
        Toggle::Started => log::info!("Button pressed: Starting periodic capture session..."),
        Toggle::Stopped => log::info!("Button pressed: Stopping periodic capture session..."),
        Toggle::Ignored => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_inactive() {
        let session = CaptureSession::default();
        assert!(!session.is_active());
        assert_eq!(session.last_toggle_ms(), None);
    }

    #[test]
    fn test_first_edge_is_accepted() {
        let session = CaptureSession::default();
        assert_eq!(session.on_rising_edge(0), Toggle::Started);
        assert!(session.is_active());
        assert_eq!(session.last_toggle_ms(), Some(0));
    }

    #[test]
    fn test_bounce_within_window_ignored() {
        let session = CaptureSession::default();
        session.on_rising_edge(1_000);
        assert_eq!(session.on_rising_edge(1_050), Toggle::Ignored);
        assert_eq!(session.on_rising_edge(1_200), Toggle::Ignored); // exactly 200ms is still a bounce
        assert!(session.is_active());
        assert_eq!(session.last_toggle_ms(), Some(1_000));

        assert_eq!(session.on_rising_edge(1_201), Toggle::Stopped);
        assert!(!session.is_active());
    }

    #[test]
    fn test_timestamp_wraparound() {
        let session = CaptureSession::default();
        session.on_rising_edge(u32::MAX - 100);
        // 100ms later across the wrap: bounce
        assert_eq!(session.on_rising_edge(0), Toggle::Ignored);
        // 401ms later across the wrap: accepted
        assert_eq!(session.on_rising_edge(300), Toggle::Stopped);
    }

    #[test]
    fn test_notification_bits() {
        assert_eq!(Toggle::from_bits(Toggle::Ignored.bits(), true), Toggle::Ignored);
        assert_eq!(Toggle::from_bits(Toggle::Started.bits(), true), Toggle::Started);
        let coalesced = Toggle::Started.bits() | Toggle::Stopped.bits();
        assert_eq!(Toggle::from_bits(coalesced, false), Toggle::Stopped);
    }

    proptest! {
        #[test]
        fn prop_close_edge_is_noop(start in 0u32..1_000_000, gap in 0u32..=200) {
            let session = CaptureSession::default();
            session.on_rising_edge(start);
            let active = session.is_active();
            let last = session.last_toggle_ms();

            prop_assert_eq!(session.on_rising_edge(start.wrapping_add(gap)), Toggle::Ignored);
            prop_assert_eq!(session.is_active(), active);
            prop_assert_eq!(session.last_toggle_ms(), last);
        }

        #[test]
        fn prop_active_tracks_parity(gaps in proptest::collection::vec(201u32..5_000, 0..40)) {
            let session = CaptureSession::default();
            let mut now = 10_000u32;
            let mut accepted = 0usize;
            for gap in gaps {
                now = now.wrapping_add(gap);
                if session.on_rising_edge(now) != Toggle::Ignored {
                    accepted += 1;
                }
            }
            prop_assert_eq!(session.is_active(), accepted % 2 == 1);
        }

        #[test]
        fn prop_mixed_edges_parity(gaps in proptest::collection::vec(0u32..600, 1..60)) {
            let session = CaptureSession::default();
            let mut now = 0u32;
            let mut accepted = 0usize;
            for gap in gaps {
                now = now.wrapping_add(gap);
                let before = session.last_toggle_ms();
                match session.on_rising_edge(now) {
                    Toggle::Ignored => prop_assert_eq!(session.last_toggle_ms(), before),
                    _ => accepted += 1,
                }
            }
            prop_assert_eq!(session.is_active(), accepted % 2 == 1);
        }
    }
}
