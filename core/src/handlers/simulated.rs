//! Simulated Specialist Backend
//!
//! Stand-in for the real specialist services. Sleeps to model network
//! latency (with a little jitter so it doesn't feel mechanical), then
//! returns a canned narration that references the specialist's display
//! name and the forwarded context. In a real deployment this would call
//! per-domain endpoints or RAG pipelines.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::traits::{HandlerError, SpecialistHandler};
use crate::registry::AgentId;

/// Simulated specialist backend
#[derive(Clone, Debug)]
pub struct SimulatedSpecialists {
    /// Base artificial latency per invocation
    latency: Duration,
    /// Maximum extra jitter added on top of the base latency
    jitter: Duration,
    /// When set, every invocation fails with this reason (for tests)
    fail_with: Option<String>,
}

impl SimulatedSpecialists {
    /// Create with an explicit base latency and no jitter
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            jitter: Duration::ZERO,
            fail_with: None,
        }
    }

    /// Set the latency jitter ceiling
    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Make every invocation fail with the given reason
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            fail_with: Some(reason.into()),
        }
    }

    /// Total sleep for one invocation (base latency plus jitter)
    fn invocation_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        let extra = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        self.latency + Duration::from_millis(extra)
    }
}

impl Default for SimulatedSpecialists {
    /// Production-like defaults: 1.5 s base latency, 250 ms jitter
    fn default() -> Self {
        Self::new(Duration::from_millis(1500)).with_jitter(Duration::from_millis(250))
    }
}

#[async_trait]
impl SpecialistHandler for SimulatedSpecialists {
    fn name(&self) -> &'static str {
        "Simulated"
    }

    async fn invoke(&self, agent: AgentId, context: &str) -> Result<String, HandlerError> {
        tokio::time::sleep(self.invocation_delay()).await;

        if let Some(ref reason) = self.fail_with {
            return Err(HandlerError::Unavailable {
                agent: agent.display_name().to_string(),
                reason: reason.clone(),
            });
        }

        Ok(format!(
            "[{}] telah menerima permintaan Anda: \"{}\".\n\n\u{2705} Data sedang diproses. \
             Sistem telah memperbarui basis data internal sesuai protokol rumah sakit.",
            agent.display_name(),
            context
        ))
    }
}
