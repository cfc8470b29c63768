//! Capture sources and one-shot snapshot capture.

use super::{
    canvas::{Canvas, DrawError},
    frame::Frame,
};
use std::{path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no capture device available: {0}")]
    Unavailable(String),

    #[error("failed to load frame {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("capture source released before a frame was ready")]
    NoFrame,

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// An exclusive live frame source (a camera, or a stand-in for one).
pub trait CaptureSource: Send {
    /// Open the stream. A no-op when already active.
    fn acquire(&mut self) -> Result<(), CaptureError>;

    /// The current frame, or `None` when the stream has nothing to show yet.
    fn current_frame(&mut self) -> Option<Frame>;

    /// Stop all tracks.
    fn release(&mut self);

    fn is_active(&self) -> bool;
}

enum Origin {
    Paths(Vec<PathBuf>),
    Frames(Vec<Frame>),
}

/// Replays a fixed list of frames in a loop, loaded from image files or
/// handed over in memory.
pub struct ImageSequenceSource {
    origin: Origin,
    frames: Vec<Frame>,
    cursor: usize,
    warmup: usize,
    pending_warmup: usize,
    active: bool,
}

impl ImageSequenceSource {
    pub fn from_paths(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self::with_origin(Origin::Paths(paths.into_iter().map(Into::into).collect()))
    }

    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self::with_origin(Origin::Frames(frames))
    }

    fn with_origin(origin: Origin) -> Self {
        Self {
            origin,
            frames: Vec::new(),
            cursor: 0,
            warmup: 0,
            pending_warmup: 0,
            active: false,
        }
    }

    /// Report "not ready" for the first `polls` frame requests after each
    /// acquisition, like a video element that has not loaded data yet.
    pub fn with_warmup(mut self, polls: usize) -> Self {
        self.warmup = polls;
        self
    }
}

impl CaptureSource for ImageSequenceSource {
    fn acquire(&mut self) -> Result<(), CaptureError> {
        if self.active {
            return Ok(());
        }
        let frames = match &self.origin {
            Origin::Frames(frames) => frames.clone(),
            Origin::Paths(paths) => paths
                .iter()
                .map(|path| {
                    image::open(path)
                        .map(|img| Frame::from_rgba(&img.to_rgba8()))
                        .map_err(|source| CaptureError::Load {
                            path: path.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };
        if frames.is_empty() {
            return Err(CaptureError::Unavailable("image sequence is empty".into()));
        }
        debug!(frames = frames.len(), "image sequence acquired");
        self.frames = frames;
        self.cursor = 0;
        self.pending_warmup = self.warmup;
        self.active = true;
        Ok(())
    }

    fn current_frame(&mut self) -> Option<Frame> {
        if !self.active {
            return None;
        }
        if self.pending_warmup > 0 {
            self.pending_warmup -= 1;
            return None;
        }
        let frame = self.frames[self.cursor % self.frames.len()].clone();
        self.cursor += 1;
        Some(frame)
    }

    fn release(&mut self) {
        self.active = false;
        self.frames.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Grab one still from `source` as a PNG data URL.
///
/// Acquires the source, waits (polling every `poll`) for the first ready
/// frame, draws it, and releases the source whatever the outcome.
pub async fn capture_snapshot<C: CaptureSource>(
    source: &mut C,
    poll: Duration,
) -> Result<String, CaptureError> {
    source.acquire()?;
    let result = snapshot_frame(source, poll).await;
    source.release();
    if result.is_ok() {
        info!("snapshot captured");
    }
    result
}

async fn snapshot_frame<C: CaptureSource>(
    source: &mut C,
    poll: Duration,
) -> Result<String, CaptureError> {
    let frame = loop {
        if !source.is_active() {
            return Err(CaptureError::NoFrame);
        }
        if let Some(frame) = source.current_frame() {
            break frame;
        }
        tokio::time::sleep(poll).await;
    };
    let mut canvas = Canvas::new();
    canvas.draw(&frame)?;
    canvas.to_png_data_url()?.ok_or(CaptureError::NoFrame)
}
