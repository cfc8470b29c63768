//! dtrkiosk library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, shared state
//! - `http`: Axum router and handlers
//! - `relay`: outbound attendance relay to the external logging endpoint
//! - `store`: in-memory attendance log store
//! - `scan`: capture, face detection and QR decoding loop
//! - `geo`: one-shot geolocation fetch
//! - `models`: typed records used across layers
//! - `util`: tracing setup

pub mod app;
pub mod error;
pub mod geo;
pub mod http;
pub mod models;
pub mod relay;
pub mod scan;
pub mod store;
pub mod util;
