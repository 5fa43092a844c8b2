//! Configuration management for the server.
//!
//! Loads configuration from environment variables with the canonical
//! defaults; every duration is overridable so tests can shrink the
//! timeline without touching behavior.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Producer timing configuration
    pub producer: ProducerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Timing knobs for the production modes, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerConfig {
    /// Atomic-delay duration (`/delayed`, `/delayedCancel`)
    pub delay_ms: u64,
    /// Gap between the two chunks of `/delayedBody`
    pub chunk_gap_ms: u64,
    /// Gap before the mid-stream fault of `/throwErrorBody`
    pub failure_gap_ms: u64,
    /// Pause between words of the `/streamAi` token stream
    pub token_pace_ms: u64,
    /// Externally resolved base URL this deployment is reachable at;
    /// consumed by anything relaying requests back into these endpoints
    pub site_url: String,
}

impl ProducerConfig {
    /// Atomic-delay duration.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Gap between the two chunks of the chunked mode.
    #[must_use]
    pub const fn chunk_gap(&self) -> Duration {
        Duration::from_millis(self.chunk_gap_ms)
    }

    /// Gap before the mid-stream fault.
    #[must_use]
    pub const fn failure_gap(&self) -> Duration {
        Duration::from_millis(self.failure_gap_ms)
    }

    /// Pause between token-stream words.
    #[must_use]
    pub const fn token_pace(&self) -> Duration {
        Duration::from_millis(self.token_pace_ms)
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            chunk_gap_ms: 3000,
            failure_gap_ms: 100,
            token_pace_ms: 40,
            site_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// canonical defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = ProducerConfig::default();
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
            },
            producer: ProducerConfig {
                delay_ms: env::var("DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.delay_ms),
                chunk_gap_ms: env::var("CHUNK_GAP_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.chunk_gap_ms),
                failure_gap_ms: env::var("FAILURE_GAP_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.failure_gap_ms),
                token_pace_ms: env::var("TOKEN_PACE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.token_pace_ms),
                site_url: env::var("SITE_URL").unwrap_or(defaults.site_url),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_defaults() {
        let producer = ProducerConfig::default();
        assert_eq!(producer.delay(), Duration::from_millis(3000));
        assert_eq!(producer.chunk_gap(), Duration::from_millis(3000));
        assert_eq!(producer.failure_gap(), Duration::from_millis(100));
    }
}
