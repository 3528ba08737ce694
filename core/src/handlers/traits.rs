//! Handler Traits
//!
//! Trait definition for specialist handler invocation. The dispatcher
//! treats a handler as a capability: it may be slow, it may fail, and it
//! returns plain narration text, not structured data. The core imposes
//! no semantics on that text beyond "non-empty string safe to display".

use async_trait::async_trait;
use thiserror::Error;

use crate::registry::AgentId;

/// Handler invocation failure
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The specialist backend could not be reached or refused the request
    #[error("specialist '{agent}' is unavailable: {reason}")]
    Unavailable {
        /// Display name of the specialist that failed
        agent: String,
        /// Transport-level detail, for the log only
        reason: String,
    },
}

/// Specialist handler trait
///
/// Implement this to plug in real specialist backends. One invocation
/// per routed request; no retries are performed by the dispatcher.
#[async_trait]
pub trait SpecialistHandler: Send + Sync {
    /// The handler backend name (e.g. "Simulated")
    fn name(&self) -> &str;

    /// Invoke the specialist for a resolved identity
    ///
    /// `context` is the forwarded context string from the routing
    /// decision. Returns the specialist's narration of having acted.
    async fn invoke(&self, agent: AgentId, context: &str) -> Result<String, HandlerError>;
}
