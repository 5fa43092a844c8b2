//! Application state shared across HTTP handlers.

use crate::config::{Config, ProducerConfig};
use crate::tokens::{CannedLecture, TokenSource};
use std::sync::Arc;

/// State handed to every handler: the producer timing knobs and the
/// token-stream source behind `/streamAi`.
#[derive(Clone)]
pub struct AppState {
    /// Producer timing configuration.
    pub producer: ProducerConfig,
    /// Token-stream collaborator.
    pub tokens: Arc<dyn TokenSource>,
}

impl AppState {
    /// Build state from explicit parts.
    #[must_use]
    pub fn new(producer: ProducerConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self { producer, tokens }
    }

    /// Build state from loaded configuration, with the canned lecture as
    /// the token source.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let lecture = CannedLecture::new(config.producer.token_pace());
        Self::new(config.producer.clone(), Arc::new(lecture))
    }
}
