//! Session Management
//!
//! One [`Session`] per conversation: an append-only transcript plus the
//! two pieces of dispatch state the presentation layer renders from
//! (whether a request is in flight, and which agent is currently
//! active).
//!
//! # Design Philosophy
//!
//! The session is an explicit, explicitly-owned value, not ambient
//! global state. The dispatcher is the only writer; surfaces get a
//! read-only view of the transcript and the two state fields. Transcript
//! entries are never mutated or removed once appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::RoutingDecision;
use crate::registry::AgentId;

/// Transcript entry identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    /// Generate a new unique entry ID
    ///
    /// Uses an atomic counter, so IDs order entries within a process.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("entry_{id}"))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new unique session ID
    ///
    /// Combines a timestamp with an atomic counter so IDs stay unique
    /// even when several sessions start in the same millisecond.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(format!("session_{timestamp}_{count}"))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who a transcript entry belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The user's utterance
    User,
    /// A handler's reply (specialist narration, or the coordinator's
    /// welcome/fallback notices)
    Handler,
}

/// One entry in the conversation transcript
///
/// Append-only: once created, an entry is never mutated or removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Unique entry ID, monotonic within a process
    pub id: EntryId,
    /// Who this entry belongs to
    pub speaker: Speaker,
    /// Display text
    pub text: String,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// The agent that produced this entry (handler entries only)
    pub responding_agent: Option<AgentId>,
    /// The routing decision behind this entry, attached read-only for
    /// audit/explainability (successful specialist replies only)
    pub routing: Option<RoutingDecision>,
}

impl TranscriptEntry {
    /// Create a user entry
    fn user(text: String) -> Self {
        Self {
            id: EntryId::new(),
            speaker: Speaker::User,
            text,
            created_at: Utc::now(),
            responding_agent: None,
            routing: None,
        }
    }

    /// Create a handler entry
    fn handler(text: String, agent: AgentId, routing: Option<RoutingDecision>) -> Self {
        Self {
            id: EntryId::new(),
            speaker: Speaker::Handler,
            text,
            created_at: Utc::now(),
            responding_agent: Some(agent),
            routing,
        }
    }
}

/// A conversation session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    pub id: SessionId,
    /// Conversation transcript, append-only
    transcript: Vec<TranscriptEntry>,
    /// True from the moment an utterance is accepted until its terminal
    /// handler entry is appended
    request_in_flight: bool,
    /// The agent currently handling the conversation; coordinator at
    /// rest and while classification is pending
    active_agent: AgentId,
}

impl Session {
    /// Create an empty session (no welcome entry)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: SessionId::new(),
            transcript: Vec::new(),
            request_in_flight: false,
            active_agent: AgentId::Coordinator,
        }
    }

    /// Create a session seeded with a coordinator welcome entry
    #[must_use]
    pub fn with_welcome(text: impl Into<String>) -> Self {
        let mut session = Self::empty();
        session.transcript.push(TranscriptEntry::handler(
            text.into(),
            AgentId::Coordinator,
            None,
        ));
        session
    }

    /// Read-only ordered view of the transcript
    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Whether a classify/dispatch cycle is currently running
    #[must_use]
    pub fn request_in_flight(&self) -> bool {
        self.request_in_flight
    }

    /// The currently active agent
    #[must_use]
    pub fn active_agent(&self) -> AgentId {
        self.active_agent
    }

    /// Look up an entry by ID
    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&TranscriptEntry> {
        self.transcript.iter().find(|e| &e.id == id)
    }

    /// The most recent entry, if any
    #[must_use]
    pub fn last_entry(&self) -> Option<&TranscriptEntry> {
        self.transcript.last()
    }

    /// Number of transcript entries
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.transcript.len()
    }

    /// Accept a user utterance and open a cycle
    ///
    /// Appends the user entry, raises the in-flight flag, and resets
    /// the active agent to the coordinator for routing. The caller must
    /// have checked [`Self::request_in_flight`] under the same lock.
    pub(crate) fn begin_cycle(&mut self, utterance: String) -> EntryId {
        debug_assert!(!self.request_in_flight, "cycle opened while one is in flight");
        let entry = TranscriptEntry::user(utterance);
        let id = entry.id.clone();
        self.transcript.push(entry);
        self.request_in_flight = true;
        self.active_agent = AgentId::Coordinator;
        tracing::debug!(entry_id = %id.0, "Cycle opened");
        id
    }

    /// Mark the resolved specialist as active for the dispatch step
    pub(crate) fn activate(&mut self, agent: AgentId) {
        self.active_agent = agent;
    }

    /// Append the cycle's terminal handler entry and return to rest
    ///
    /// Used for both the success path (specialist narration with the
    /// routing decision attached) and the fallback path (coordinator
    /// apology, no routing). Clears the in-flight flag and restores the
    /// coordinator as active agent.
    pub(crate) fn finish_cycle(
        &mut self,
        text: String,
        agent: AgentId,
        routing: Option<RoutingDecision>,
    ) -> EntryId {
        let entry = TranscriptEntry::handler(text, agent, routing);
        let id = entry.id.clone();
        self.transcript.push(entry);
        self.request_in_flight = false;
        self.active_agent = AgentId::Coordinator;
        tracing::debug!(entry_id = %id.0, agent = ?agent, "Cycle closed");
        id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}
