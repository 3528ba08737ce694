//! Label Resolution
//!
//! The classifier returns the chosen agent as free text, not as one of
//! the canonical identities. This module converts that label into an
//! [`AgentId`] with a fixed, ordered rule list.
//!
//! # Determinism
//!
//! Rules are evaluated top to bottom and the first match wins. Keyword
//! sets can overlap (a label mentioning both "pasien" and "tagihan"
//! matches the patient rule because it comes first), so the order below
//! is part of the routing contract and must not be reordered casually.
//! A label matching no rule resolves to the coordinator.

use crate::registry::AgentId;

/// Ordered resolution rules: (keyword set, target identity)
///
/// Priority order: patient > records > billing > scheduling.
const ROUTING_RULES: &[(&[&str], AgentId)] = &[
    (&["pasien", "patient"], AgentId::PatientManagement),
    (&["rekam", "records"], AgentId::MedicalRecords),
    (&["tagihan", "billing", "pembayaran"], AgentId::Billing),
    (&["jadwal", "scheduling"], AgentId::Scheduling),
];

/// Resolve a free-text agent label to an identity
///
/// Case-insensitive substring match against the ordered rule table;
/// first matching rule wins. Pure, total, and deterministic - the same
/// label always yields the same identity.
#[must_use]
pub fn resolve_agent_label(label: &str) -> AgentId {
    let normalized = label.to_lowercase();
    for (keywords, agent) in ROUTING_RULES {
        if keywords.iter().any(|kw| normalized.contains(kw)) {
            return *agent;
        }
    }
    AgentId::Coordinator
}
