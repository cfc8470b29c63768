//! Face-gated QR scan loop.
//!
//! The loop is a small state machine:
//!
//! ```text
//! Idle -> Acquiring -> Detecting <-> Decoding -> Found
//!            |            |
//!            +------------+-----> Stopped
//! ```
//!
//! [`Scanner::tick`] runs one step synchronously. [`Scanner::run`] drives
//! ticks, sleeping for the configured period after each one completes, so
//! two ticks never overlap.

use super::{
    canvas::{Canvas, DrawError},
    capture::{CaptureError, CaptureSource},
    detect::{DetectError, FaceDetector, QrDecoder},
    frame::FaceRegion,
};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Acquiring,
    Detecting,
    Decoding,
    Found,
    Stopped,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not scanning, or the source had no frame yet.
    NotReady,
    /// Face count other than one; decode skipped.
    Skipped { faces: usize },
    /// One face, but no readable QR code.
    NoCode,
    Found(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}

#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Pause between the end of one tick and the start of the next.
    pub period: Duration,
    /// Size the face overlay is scaled to; `None` keeps frame pixels.
    pub display_size: Option<(u32, u32)>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(250),
            display_size: None,
        }
    }
}

pub struct Scanner<C: CaptureSource, D: FaceDetector, Q: QrDecoder> {
    capture: C,
    detector: D,
    decoder: Q,
    settings: ScanSettings,
    canvas: Canvas,
    state: ScanState,
    payload: Option<String>,
    overlay: Vec<FaceRegion>,
    session: Uuid,
}

impl<C: CaptureSource, D: FaceDetector, Q: QrDecoder> Scanner<C, D, Q> {
    pub fn new(capture: C, detector: D, decoder: Q, settings: ScanSettings) -> Self {
        Self {
            capture,
            detector,
            decoder,
            settings,
            canvas: Canvas::new(),
            state: ScanState::Idle,
            payload: None,
            overlay: Vec::new(),
            session: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Decoded QR payload, kept until [`Scanner::restart`].
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Face boxes from the latest tick, scaled for display.
    pub fn overlay(&self) -> &[FaceRegion] {
        &self.overlay
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// Acquire the capture source and begin detecting.
    ///
    /// On failure the error is logged, the loop is left `Stopped` and the
    /// error is returned.
    pub fn start(&mut self) -> Result<(), ScanError> {
        if matches!(self.state, ScanState::Detecting | ScanState::Decoding) {
            return Ok(());
        }
        self.state = ScanState::Acquiring;
        match self.capture.acquire() {
            Ok(()) => {
                self.state = ScanState::Detecting;
                info!(session = %self.session, "scan started");
                Ok(())
            }
            Err(e) => {
                error!(session = %self.session, "error accessing camera: {e}");
                self.state = ScanState::Stopped;
                Err(e.into())
            }
        }
    }

    pub fn tick(&mut self) -> Result<TickOutcome, ScanError> {
        if self.state != ScanState::Detecting {
            return Ok(TickOutcome::NotReady);
        }
        let Some(frame) = self.capture.current_frame() else {
            return Ok(TickOutcome::NotReady);
        };

        self.canvas.draw(&frame)?;
        let faces = self.detector.detect(&frame)?;

        let source_size = (frame.width, frame.height);
        let display = self.settings.display_size.unwrap_or(source_size);
        self.overlay = faces
            .iter()
            .map(|face| face.resized(source_size, display))
            .collect();

        if faces.len() != 1 {
            return Ok(TickOutcome::Skipped { faces: faces.len() });
        }

        self.state = ScanState::Decoding;
        let decoded = self.canvas.pixels().and_then(|px| self.decoder.decode(px));
        match decoded {
            Some(payload) => {
                info!(session = %self.session, %payload, "QR code found");
                self.capture.release();
                self.state = ScanState::Found;
                self.payload = Some(payload.clone());
                Ok(TickOutcome::Found(payload))
            }
            None => {
                self.state = ScanState::Detecting;
                Ok(TickOutcome::NoCode)
            }
        }
    }

    /// Release the capture source. A found payload stays readable.
    pub fn stop(&mut self) {
        if self.capture.is_active() {
            self.capture.release();
        }
        if self.state != ScanState::Found {
            self.state = ScanState::Stopped;
        }
        debug!(session = %self.session, state = ?self.state, "scan stopped");
    }

    /// Drop the previous result and scan again from acquisition.
    pub fn restart(&mut self) -> Result<(), ScanError> {
        self.stop();
        self.payload = None;
        self.overlay.clear();
        self.canvas.clear();
        self.session = Uuid::new_v4();
        self.state = ScanState::Idle;
        self.start()
    }

    /// Tick until a payload is found or `cancel` turns true.
    ///
    /// Starts the loop if it is still idle. A dropped cancel sender counts
    /// as cancellation. Tick errors are logged and the loop carries on.
    pub async fn run(&mut self, mut cancel: watch::Receiver<bool>) -> Option<String> {
        if self.state == ScanState::Idle && self.start().is_err() {
            return None;
        }
        loop {
            match self.state {
                ScanState::Found => return self.payload.clone(),
                ScanState::Stopped => return None,
                _ => {}
            }
            if *cancel.borrow() {
                self.stop();
                return None;
            }

            match self.tick() {
                Ok(TickOutcome::Found(payload)) => return Some(payload),
                Ok(outcome) => debug!(session = %self.session, ?outcome, "scan tick"),
                Err(e) => warn!(session = %self.session, "scan tick failed: {e}"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.settings.period) => {}
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        self.stop();
                        return None;
                    }
                }
            }
        }
    }
}

impl<C: CaptureSource, D: FaceDetector, Q: QrDecoder> Drop for Scanner<C, D, Q> {
    fn drop(&mut self) {
        if self.capture.is_active() {
            self.capture.release();
        }
    }
}
