//! AI availability probe.
//!
//! Unreachable and unhealthy are the same thing to the rest of the system:
//! chat is disabled and the synchronizer stays inert.

use std::rc::Rc;

use cards_types::chat::AiHealth;
use crate::ports::AiPort;

pub struct AvailabilityProbe {
    ai: Rc<dyn AiPort>,
}

impl AvailabilityProbe {
    pub fn new(ai: Rc<dyn AiPort>) -> Self {
        Self { ai }
    }

    pub async fn check(&self) -> AiHealth {
        match self.ai.health().await {
            Some(health) if health.available => health,
            Some(_) => AiHealth::unavailable(),
            None => {
                log::debug!("AI backend unreachable");
                AiHealth::unavailable()
            }
        }
    }
}
