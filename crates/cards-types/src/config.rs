use serde::{Deserialize, Serialize};

use crate::{CardsError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub refocus: RefocusPolicy,
    #[serde(default)]
    pub health: HealthConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("cards_url", &self.backend.cards_url),
            ("ai_url", &self.backend.ai_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CardsError::Config(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }
        if self.refocus.max_attempts == 0 {
            return Err(CardsError::Config(
                "refocus.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Card service (list/create/update/delete)
    pub cards_url: String,
    /// Conversational AI service
    pub ai_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            cards_url: "http://localhost:5000".to_string(),
            ai_url: "http://localhost:8000".to_string(),
        }
    }
}

impl BackendConfig {
    /// Base URLs without a trailing slash
    pub fn cards_base(&self) -> &str {
        self.cards_url.trim_end_matches('/')
    }

    pub fn ai_base(&self) -> &str {
        self.ai_url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Characters of card content sent along as focused-card context
    pub max_content_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 500,
        }
    }
}

/// Bounded poll used to find a card the assistant just created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefocusPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: u32,
    pub max_delay_ms: u64,
}

impl Default for RefocusPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay_ms: 500,
            backoff_factor: 2,
            max_delay_ms: 4000,
        }
    }
}

impl RefocusPolicy {
    /// Delay before the given (zero-based) attempt
    pub fn delay_for(&self, attempt: u32) -> u64 {
        let factor = (self.backoff_factor.max(1) as u64).saturating_pow(attempt);
        self.initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms.max(self.initial_delay_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Interval between AI health probes; 0 disables polling
    pub poll_interval_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 30_000,
        }
    }
}
