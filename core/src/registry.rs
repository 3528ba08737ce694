//! Agent Registry
//!
//! The closed set of agent identities and their static display profiles.
//! Identities are fixed at compile time; nothing creates or destroys them
//! at runtime. The registry lookup is a total function with no failure
//! mode, so downstream code never has to handle an "unknown agent".

use serde::{Deserialize, Serialize};

/// The closed set of agent identities
///
/// `Coordinator` is the routing role: it classifies and dispatches but
/// never fulfills a request itself. The other four are the specialist
/// handlers a request can be routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentId {
    /// Routes requests to specialists, never answers them directly
    Coordinator,
    /// Patient registration, demographics, admission/discharge status
    PatientManagement,
    /// Medical history, diagnoses, prescriptions, lab results
    MedicalRecords,
    /// Invoices, payment processing, insurance claims
    Billing,
    /// Booking, rescheduling, and cancelling appointments
    Scheduling,
}

/// Static display profile for an agent
///
/// Presentation surfaces render from this; the core itself only ever
/// reads `name` (for handler narrations).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AgentProfile {
    /// The identity this profile describes
    pub id: AgentId,
    /// Display name
    pub name: &'static str,
    /// Short description of the agent's core function
    pub description: &'static str,
    /// Accent color token for UI theming
    pub accent: &'static str,
    /// Icon name (lucide icon set)
    pub icon: &'static str,
}

const COORDINATOR: AgentProfile = AgentProfile {
    id: AgentId::Coordinator,
    name: "Koordinator Sistem (Master)",
    description: "Menganalisis maksud dan merutekan ke spesialis.",
    accent: "bg-indigo-600",
    icon: "BrainCircuit",
};

const PATIENT_MANAGEMENT: AgentProfile = AgentProfile {
    id: AgentId::PatientManagement,
    name: "Manajemen Pasien",
    description: "Pendaftaran & Demografi",
    accent: "bg-emerald-500",
    icon: "UserPlus",
};

const MEDICAL_RECORDS: AgentProfile = AgentProfile {
    id: AgentId::MedicalRecords,
    name: "Rekam Medis",
    description: "Riwayat Klinis & Lab",
    accent: "bg-blue-500",
    icon: "FileHeart",
};

const BILLING: AgentProfile = AgentProfile {
    id: AgentId::Billing,
    name: "Penagihan dan Pembayaran",
    description: "Faktur & Asuransi",
    accent: "bg-amber-500",
    icon: "Receipt",
};

const SCHEDULING: AgentProfile = AgentProfile {
    id: AgentId::Scheduling,
    name: "Penjadwalan Janji Temu",
    description: "Booking & Kalender",
    accent: "bg-rose-500",
    icon: "CalendarClock",
};

impl AgentId {
    /// All identities, coordinator first
    pub const ALL: [AgentId; 5] = [
        AgentId::Coordinator,
        AgentId::PatientManagement,
        AgentId::MedicalRecords,
        AgentId::Billing,
        AgentId::Scheduling,
    ];

    /// The four specialist identities (everything except the coordinator)
    pub const SPECIALISTS: [AgentId; 4] = [
        AgentId::PatientManagement,
        AgentId::MedicalRecords,
        AgentId::Billing,
        AgentId::Scheduling,
    ];

    /// Look up the static display profile for this identity
    ///
    /// Total over the identity set; never fails.
    #[must_use]
    pub fn profile(self) -> &'static AgentProfile {
        match self {
            Self::Coordinator => &COORDINATOR,
            Self::PatientManagement => &PATIENT_MANAGEMENT,
            Self::MedicalRecords => &MEDICAL_RECORDS,
            Self::Billing => &BILLING,
            Self::Scheduling => &SCHEDULING,
        }
    }

    /// Display name shorthand
    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.profile().name
    }

    /// Whether this identity is a specialist (can fulfill requests)
    #[must_use]
    pub fn is_specialist(self) -> bool {
        self != Self::Coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_is_total() {
        for id in AgentId::ALL {
            let profile = id.profile();
            assert_eq!(profile.id, id);
            assert!(!profile.name.is_empty());
            assert!(!profile.description.is_empty());
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(AgentId::Coordinator.display_name(), "Koordinator Sistem (Master)");
        assert_eq!(AgentId::PatientManagement.display_name(), "Manajemen Pasien");
        assert_eq!(AgentId::MedicalRecords.display_name(), "Rekam Medis");
        assert_eq!(AgentId::Billing.display_name(), "Penagihan dan Pembayaran");
        assert_eq!(AgentId::Scheduling.display_name(), "Penjadwalan Janji Temu");
    }

    #[test]
    fn test_specialists_exclude_coordinator() {
        assert!(!AgentId::Coordinator.is_specialist());
        for id in AgentId::SPECIALISTS {
            assert!(id.is_specialist());
        }
    }
}
