//! Classifier Traits
//!
//! Trait definitions for the classification oracle. This abstraction
//! lets the dispatcher work with any classifier implementation (Gemini,
//! a local model, a test mock) without changing core logic.
//!
//! # Design Philosophy
//!
//! The classifier is consumed strictly as a request/response capability:
//! one utterance in, one structured [`RoutingDecision`] out, or a single
//! typed failure. The chosen agent label inside the decision is free
//! text from the oracle - it still has to be resolved against the closed
//! identity set (see [`crate::resolver`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured routing decision returned by the classification oracle
///
/// Field names match the wire schema exactly; all four are required
/// strings. `chosen_subagent` is NOT guaranteed to be a canonical agent
/// name - resolve it with [`crate::resolver::resolve_agent_label`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// The oracle's narration of why it routed the way it did
    pub routing_decision: String,
    /// Free-text label of the chosen specialist
    pub chosen_subagent: String,
    /// Which of the specialist's core functions matched the request
    pub core_function_match: String,
    /// The context forwarded to the specialist
    pub context_passed: String,
}

/// Classification failure
///
/// Transport errors, empty oracle responses, and schema-parse failures
/// are all the same failure from the dispatcher's point of view: routing
/// is unavailable and the user must resubmit. The variants exist only so
/// the operational log can record what actually went wrong; callers must
/// not branch on them.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The HTTP call to the oracle failed (network, auth, quota)
    #[error("classifier transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The oracle answered with a non-success HTTP status
    #[error("classifier returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: reqwest::StatusCode,
        /// Response body, for the log only
        body: String,
    },

    /// The oracle returned no text to parse
    #[error("classifier returned an empty response")]
    EmptyResponse,

    /// The returned text did not parse into the routing schema
    #[error("classifier response did not match the routing schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Classification oracle trait
///
/// Implement this to plug in a different oracle. Implementations perform
/// a single attempt per call; retries, if any, are the caller's decision
/// (the dispatcher performs none).
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// The classifier name (e.g. "Gemini")
    fn name(&self) -> &str;

    /// Classify one utterance into a routing decision
    ///
    /// The utterance must be non-empty after trimming; the caller
    /// enforces this before invocation.
    async fn classify(&self, utterance: &str) -> Result<RoutingDecision, ClassifyError>;
}
