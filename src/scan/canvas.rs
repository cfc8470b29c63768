//! Frame sink: holds the last drawn frame as a pixel buffer.

use super::frame::Frame;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("frame buffer too small for {width}x{height}")]
pub struct DrawError {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default)]
pub struct Canvas {
    pixels: Option<RgbaImage>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `frame`, replacing whatever was there. The canvas takes the
    /// frame's dimensions.
    pub fn draw(&mut self, frame: &Frame) -> Result<(), DrawError> {
        let image = frame.to_rgba_image().ok_or(DrawError {
            width: frame.width,
            height: frame.height,
        })?;
        self.pixels = Some(image);
        Ok(())
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }

    pub fn clear(&mut self) {
        self.pixels = None;
    }

    /// Encode the canvas as a `data:image/png;base64,...` URL.
    pub fn to_png_data_url(&self) -> Result<Option<String>, image::ImageError> {
        let Some(pixels) = &self.pixels else {
            return Ok(None);
        };
        let mut png = Vec::new();
        pixels.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Some(format!("data:image/png;base64,{}", B64.encode(&png))))
    }
}
