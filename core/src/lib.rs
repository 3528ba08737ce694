//! MedAgent Core - Headless Routing and Dispatch for a Hospital Assistant
//!
//! This crate is the coordinating core of MedAgent: it takes a free-text
//! request from hospital staff, obtains a structured routing decision
//! from a classification oracle, maps that decision onto a closed set of
//! specialist agents, invokes the chosen specialist, and records the
//! whole round trip in a conversation transcript. It is completely
//! independent of any UI framework.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Presentation Surfaces                      │
//! │            (web chat, TUI, headless REPL, tests)              │
//! │                                                               │
//! │            submit(utterance) ──┐   ┌── CoreMessage stream     │
//! └────────────────────────────────┼───┼──────────────────────────┘
//!                                  │   │
//! ┌────────────────────────────────┼───┼──────────────────────────┐
//! │                        MEDAGENT CORE                          │
//! │  ┌─────────────────────────────┴───┴───────────────────────┐  │
//! │  │                       Dispatcher                         │  │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────┐  │  │
//! │  │  │ Session  │ │Classifier│ │ Resolver │ │ Specialist │  │  │
//! │  │  │(transcript)│ (Gemini) │ │ Registry │ │  Handlers  │  │  │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └────────────┘  │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Dispatcher`]: the state machine that runs one cycle per utterance
//! - [`Session`]: conversation transcript plus dispatch state
//! - [`AgentId`]: the closed set of agent identities
//! - [`IntentClassifier`] / [`GeminiClassifier`]: the classification oracle seam
//! - [`SpecialistHandler`] / [`SimulatedSpecialists`]: the specialist seam
//! - [`CoreMessage`]: messages from the core to presentation surfaces
//!
//! # Quick Start
//!
//! ```ignore
//! use medagent_core::{
//!     CoreConfig, Dispatcher, GeminiClassifier, SimulatedSpecialists,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let config = CoreConfig::from_env();
//!     let classifier = GeminiClassifier::from_config(&config).expect("API key");
//!     let specialists = SimulatedSpecialists::default();
//!     let dispatcher = Dispatcher::new(classifier, specialists, config, tx);
//!
//!     let session = dispatcher.new_session();
//!     dispatcher.submit(&session, "Jadwalkan janji temu dengan Dr. Sari").await;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message to UI
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`registry`]: the closed agent identity set and display profiles
//! - [`resolver`]: free-text label to identity resolution
//! - [`classifier`]: classification oracle adapter (Gemini)
//! - [`handlers`]: specialist invocation adapter (simulated)
//! - [`session`]: conversation session and transcript
//! - [`dispatcher`]: the routing and dispatch state machine
//! - [`messages`]: messages from the core to presentation surfaces
//! - [`config`]: runtime configuration
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on any UI framework. It's pure
//! orchestration logic that can drive a web chat, a TUI, or run headless
//! for testing.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod handlers;
pub mod messages;
pub mod registry;
pub mod resolver;
pub mod session;

// Re-exports for convenience
pub use classifier::{ClassifyError, GeminiClassifier, IntentClassifier, RoutingDecision};
pub use config::CoreConfig;
pub use dispatcher::{Dispatcher, SharedSession, SubmitOutcome};
pub use handlers::{HandlerError, SimulatedSpecialists, SpecialistHandler};
pub use messages::{CoreMessage, CyclePhase, NotifyLevel};
pub use registry::{AgentId, AgentProfile};
pub use resolver::resolve_agent_label;
pub use session::{EntryId, Session, SessionId, Speaker, TranscriptEntry};
