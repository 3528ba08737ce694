//! Intent Classification
//!
//! This module provides abstracted access to the classification oracle
//! that turns a free-text utterance into a structured routing decision.
//!
//! # Available Classifiers
//!
//! - **Gemini**: Google Gemini `generateContent` REST API (default)
//!
//! # Usage
//!
//! ```ignore
//! use medagent_core::classifier::{GeminiClassifier, IntentClassifier};
//!
//! let classifier = GeminiClassifier::from_env()?;
//! let decision = classifier.classify("Jadwalkan janji temu dengan Dr. Sari").await?;
//! ```

mod gemini;
mod traits;

pub use gemini::{GeminiClassifier, ROUTING_POLICY};
pub use traits::{ClassifyError, IntentClassifier, RoutingDecision};
