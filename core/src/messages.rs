//! Core Messages
//!
//! Messages sent from the dispatch core to presentation surfaces. The
//! core is the "brain" that routes and dispatches; surfaces are pure
//! renderers that display what the core tells them to. This separation
//! enables headless operation for testing and any number of surface
//! implementations without the core knowing about them.

use serde::{Deserialize, Serialize};

use crate::registry::AgentId;
use crate::session::TranscriptEntry;

/// Messages from the dispatch core to a presentation surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CoreMessage {
    /// A transcript entry was appended (user utterance or handler reply)
    EntryAppended {
        /// The appended entry
        entry: TranscriptEntry,
    },

    /// The active agent changed
    AgentActivated {
        /// The now-active agent
        agent: AgentId,
    },

    /// The dispatch cycle moved to a new phase
    PhaseChanged {
        /// The new phase
        phase: CyclePhase,
    },

    /// Out-of-transcript notification (toasts, status lines)
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Dispatch cycle phases
///
/// `Idle` doubles as the transient completed state: a finished cycle
/// folds straight back into `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePhase {
    /// At rest, ready for a submission
    Idle,
    /// Waiting on the classification oracle
    Classifying,
    /// Specialist resolved, invocation pending
    Dispatching,
}

impl CyclePhase {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Siap menerima perintah",
            Self::Classifying => "Koordinator sedang merutekan...",
            Self::Dispatching => "Spesialis sedang memproses...",
        }
    }
}
