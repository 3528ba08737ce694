//! Specialist Handlers
//!
//! This module provides abstracted access to the downstream specialist
//! backends that actually fulfill routed requests.
//!
//! # Available Handlers
//!
//! - **Simulated**: canned narrations with artificial latency (default);
//!   in production each specialist is a distinct network call.
//!
//! # Usage
//!
//! ```ignore
//! use medagent_core::handlers::{SimulatedSpecialists, SpecialistHandler};
//! use medagent_core::registry::AgentId;
//!
//! let specialists = SimulatedSpecialists::default();
//! let narration = specialists
//!     .invoke(AgentId::Scheduling, "Jadwalkan janji temu dengan Dr. Sari")
//!     .await?;
//! ```

mod simulated;
mod traits;

pub use simulated::SimulatedSpecialists;
pub use traits::{HandlerError, SpecialistHandler};
