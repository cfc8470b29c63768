//! One-shot geolocation fetch.

use std::{future::Future, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
  pub latitude: f64,
  pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct GeoOptions {
  pub enable_high_accuracy: bool,
  pub timeout: Duration,
  /// Oldest cached fix a provider may return. Zero asks for a fresh one.
  pub maximum_age: Duration,
}

impl Default for GeoOptions {
  fn default() -> Self {
    Self {
      enable_high_accuracy: true,
      timeout: Duration::from_secs(5),
      maximum_age: Duration::ZERO,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
  #[error("Geolocation is not supported by this device.")]
  Unsupported,

  #[error("User denied the request for Geolocation.")]
  PermissionDenied,

  #[error("Location information is unavailable.")]
  PositionUnavailable,

  #[error("The request to get user location timed out.")]
  Timeout,
}

/// A device position backend.
pub trait LocationProvider: Send + Sync {
  fn locate(
    &self,
    options: &GeoOptions,
  ) -> impl Future<Output = Result<Coordinates, GeoError>> + Send;
}

/// Provider for a kiosk mounted at a known spot.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationProvider for FixedLocation {
  fn locate(
    &self,
    _options: &GeoOptions,
  ) -> impl Future<Output = Result<Coordinates, GeoError>> + Send {
    std::future::ready(Ok(self.0))
  }
}

/// Holds the result of a single position request.
pub struct GeoFetcher<P: LocationProvider> {
  provider: Option<P>,
  options: GeoOptions,
  coordinates: Option<Coordinates>,
  alert: Option<String>,
}

impl<P: LocationProvider> GeoFetcher<P> {
  /// `None` means the device has no location capability.
  pub fn new(provider: Option<P>, options: GeoOptions) -> Self {
    Self {
      provider,
      options,
      coordinates: None,
      alert: None,
    }
  }

  pub fn coordinates(&self) -> Option<Coordinates> {
    self.coordinates
  }

  /// User-facing message from the last failed fetch.
  pub fn alert(&self) -> Option<&str> {
    self.alert.as_deref()
  }

  /// Ask the provider once. No retry; coordinates stay as they were on
  /// failure and the failure is kept as an alert.
  pub async fn fetch(&mut self) -> Option<Coordinates> {
    self.alert = None;
    let result = match &self.provider {
      None => Err(GeoError::Unsupported),
      Some(provider) => {
        tokio::time::timeout(self.options.timeout, provider.locate(&self.options))
          .await
          .unwrap_or(Err(GeoError::Timeout))
      }
    };

    match result {
      Ok(coords) => {
        info!(
          latitude = coords.latitude,
          longitude = coords.longitude,
          "location acquired"
        );
        self.coordinates = Some(coords);
        Some(coords)
      }
      Err(e) => {
        warn!("geolocation failed: {e}");
        self.alert = Some(e.to_string());
        None
      }
    }
  }
}
