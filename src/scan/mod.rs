//! Camera-side attendance scanning.
//!
//! A [`Scanner`] pulls frames from a [`CaptureSource`], draws them onto a
//! [`Canvas`], asks a [`FaceDetector`] for faces and, when exactly one face
//! is in view, asks a [`QrDecoder`] for the badge payload.

pub mod canvas;
pub mod capture;
pub mod detect;
pub mod frame;
pub mod scanner;

pub use canvas::Canvas;
pub use capture::{CaptureError, CaptureSource, ImageSequenceSource, capture_snapshot};
pub use detect::{DetectError, FaceDetector, QrDecoder, RqrrDecoder};
pub use frame::{FaceRegion, Frame};
pub use scanner::{ScanError, ScanSettings, ScanState, Scanner, TickOutcome};
