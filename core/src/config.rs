//! Core Configuration
//!
//! Runtime configuration for the dispatch core. Built either from
//! defaults or from environment variables; no configuration file is
//! involved.

use std::time::Duration;

/// Dispatch core configuration
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// Classification model identifier
    pub model: String,
    /// Classifier API key, if configured
    pub api_key: Option<String>,
    /// Classifier API base URL
    pub base_url: String,
    /// Classifier decoding temperature (low for deterministic routing)
    pub temperature: f32,
    /// Coordinator welcome entry seeded into new sessions
    pub welcome_notice: String,
    /// Fixed apology appended when classification or invocation fails
    pub fallback_notice: String,
    /// Base latency of the simulated specialists
    pub handler_latency: Duration,
    /// Pause between resolving the specialist and invoking it, so
    /// surfaces can show the hand-off
    pub handoff: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.1,
            welcome_notice: "Selamat datang di MedAgent. Saya adalah Koordinator Sistem \
                             Rumah Sakit. Silakan sampaikan kebutuhan Anda terkait pasien, \
                             rekam medis, tagihan, atau jadwal."
                .to_string(),
            fallback_notice: "Maaf, terjadi kesalahan dalam memproses permintaan Anda. \
                              Silakan coba lagi."
                .to_string(),
            handler_latency: Duration::from_millis(1500),
            handoff: Duration::from_millis(800),
        }
    }
}

impl CoreConfig {
    /// Create configuration from environment variables
    ///
    /// - `GEMINI_API_KEY` (or `API_KEY`): classifier API key
    /// - `MEDAGENT_MODEL`: classification model
    /// - `MEDAGENT_BASE_URL`: classifier API base URL
    /// - `MEDAGENT_HANDLER_LATENCY_MS`: simulated specialist latency
    /// - `MEDAGENT_HANDOFF_MS`: hand-off pause before invocation
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: std::env::var("MEDAGENT_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok(),
            base_url: std::env::var("MEDAGENT_BASE_URL").unwrap_or(defaults.base_url),
            temperature: defaults.temperature,
            welcome_notice: defaults.welcome_notice,
            fallback_notice: defaults.fallback_notice,
            handler_latency: std::env::var("MEDAGENT_HANDLER_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.handler_latency),
            handoff: std::env::var("MEDAGENT_HANDOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.handoff),
        }
    }

    /// Configuration with all delays zeroed, for tests
    #[must_use]
    pub fn instant() -> Self {
        Self {
            handler_latency: Duration::ZERO,
            handoff: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert!(config.fallback_notice.starts_with("Maaf"));
        assert_eq!(config.handoff, Duration::from_millis(800));
    }

    #[test]
    fn test_instant_zeroes_delays() {
        let config = CoreConfig::instant();
        assert_eq!(config.handler_latency, Duration::ZERO);
        assert_eq!(config.handoff, Duration::ZERO);
    }
}
