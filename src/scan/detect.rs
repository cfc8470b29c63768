//! Detector and decoder adapters.
//!
//! Face detection is supplied by the embedder through [`FaceDetector`]. QR
//! decoding ships with an `rqrr` backend.

use super::frame::{FaceRegion, Frame};
use image::{DynamicImage, RgbaImage, imageops};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("face detector failed: {0}")]
    Backend(String),
}

/// Pluggable face detection backend.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in `frame`; regions are in frame pixels.
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceRegion>, DetectError>;
}

/// Pluggable QR decoding backend.
pub trait QrDecoder: Send + Sync {
    /// Decode the first readable QR code in `pixels`.
    fn decode(&self, pixels: &RgbaImage) -> Option<String>;
}

/// QR decoder built on `rqrr`.
///
/// Frames larger than `max_dimension` are downscaled before grid detection.
pub struct RqrrDecoder {
    max_dimension: u32,
}

impl Default for RqrrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RqrrDecoder {
    pub fn new() -> Self {
        Self { max_dimension: 640 }
    }

    /// 0 disables downscaling.
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self { max_dimension }
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, pixels: &RgbaImage) -> Option<String> {
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return None;
        }
        let max_dim = self.max_dimension;
        let gray = if max_dim > 0 && (w > max_dim || h > max_dim) {
            let factor = w.max(h) as f32 / max_dim as f32;
            let new_w = ((w as f32 / factor) as u32).max(1);
            let new_h = ((h as f32 / factor) as u32).max(1);
            trace!(new_w, new_h, "downscaling frame for QR decode");
            let resized = imageops::resize(pixels, new_w, new_h, imageops::FilterType::Nearest);
            DynamicImage::ImageRgba8(resized).to_luma8()
        } else {
            DynamicImage::ImageRgba8(pixels.clone()).to_luma8()
        };

        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();
        trace!(grids = grids.len(), "QR grids detected");
        for grid in grids {
            match grid.decode() {
                Ok((_, content)) => return Some(content),
                Err(e) => debug!(error = %e, "failed to decode QR grid"),
            }
        }
        None
    }
}
