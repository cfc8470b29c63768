//! Environment configuration.

use crate::relay::DEFAULT_UPSTREAM_URL;
use std::{env, net::SocketAddr, time::Duration};

pub type ConfigError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
  pub addr: SocketAddr,
  pub upstream_url: String,
  /// Accept invalid upstream TLS certificates.
  pub upstream_insecure: bool,
  pub upstream_timeout: Duration,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Build from any key lookup; unset keys take defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let addr = lookup("DTRKIOSK_ADDR")
      .unwrap_or_else(|| "127.0.0.1:3000".to_string())
      .parse::<SocketAddr>()
      .map_err(|e| format!("invalid DTRKIOSK_ADDR: {e}"))?;
    let upstream_url =
      lookup("DTRKIOSK_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
    let upstream_insecure = match lookup("DTRKIOSK_UPSTREAM_INSECURE") {
      Some(v) => parse_flag(&v).ok_or_else(|| format!("invalid DTRKIOSK_UPSTREAM_INSECURE: {v}"))?,
      None => false,
    };
    let timeout_secs = lookup("DTRKIOSK_UPSTREAM_TIMEOUT_SECS")
      .unwrap_or_else(|| "30".to_string())
      .parse::<u64>()
      .map_err(|e| format!("invalid DTRKIOSK_UPSTREAM_TIMEOUT_SECS: {e}"))?;

    Ok(Self {
      addr,
      upstream_url,
      upstream_insecure,
      upstream_timeout: Duration::from_secs(timeout_secs),
    })
  }
}

fn parse_flag(v: &str) -> Option<bool> {
  match v.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" | "" => Some(false),
    _ => None,
  }
}
