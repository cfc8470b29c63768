//! Frames handed from a capture source to the scan loop.

use image::RgbaImage;
use std::{sync::Arc, time::Instant};

/// One RGBA video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, may include padding past `width * 4`.
    pub stride: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl Frame {
    pub fn from_rgba(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            stride: image.width() * 4,
            data: Arc::from(image.as_raw().as_slice()),
            captured_at: Instant::now(),
        }
    }

    /// Tightly packed copy of the frame, or `None` if the buffer is short.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, copy_rgba_without_stride(self))
    }
}

/// Copy RGBA frame data without stride padding
fn copy_rgba_without_stride(frame: &Frame) -> Vec<u8> {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let stride = frame.stride as usize;

    let mut result = Vec::with_capacity(width * height * 4);

    for y in 0..height {
        let row_start = y * stride;
        let row_end = row_start + width * 4;
        if row_end <= frame.data.len() {
            result.extend_from_slice(&frame.data[row_start..row_end]);
        }
    }

    result
}

/// Bounding box of a detected face, in pixels of the frame it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Detection confidence score.
    pub score: f32,
}

impl FaceRegion {
    /// Rescale from `from` (frame size) to `to` (display size).
    pub fn resized(&self, from: (u32, u32), to: (u32, u32)) -> Self {
        let sx = to.0 as f32 / from.0.max(1) as f32;
        let sy = to.1 as f32 / from.1.max(1) as f32;
        Self {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
            score: self.score,
        }
    }
}
