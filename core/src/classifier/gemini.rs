//! Gemini Classifier Implementation
//!
//! Classification oracle backed by the Google Gemini `generateContent`
//! REST API.
//!
//! # Gemini API
//!
//! One endpoint is used:
//! - `/v1beta/models/{model}:generateContent` - single-shot generation
//!
//! Every request carries the fixed routing policy as the system
//! instruction, constrains the output to the routing JSON schema, and
//! uses a low temperature so the same utterance tends to the same
//! routing decision.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{ClassifyError, IntentClassifier, RoutingDecision};
use crate::config::CoreConfig;

/// The fixed routing policy sent as the system instruction
///
/// Classification is based purely on each specialist's core function;
/// the coordinator must never answer the request itself.
pub const ROUTING_POLICY: &str = r#"
Anda adalah Koordinator Sistem Rumah Sakit Digital (Hospital System Coordinator). Tugas mutlak Anda adalah menganalisis setiap permintaan pengguna (staf administrasi atau medis) dan **merutekannya** secara eksklusif ke salah satu dari empat subagen spesialis berikut. Keputusan perutean harus didasarkan murni pada FUNGSI INTI dari subagen tersebut. JANGAN memproses permintaan itu sendiri.

| Subagen | Fungsi Inti | Contoh Permintaan yang Ditangani |
| :--- | :--- | :--- |
| **Manajemen Pasien** | Pendaftaran, Pembaruan Demografi, Status Pasien (Rawat Inap/Keluar) | "Daftarkan pasien baru bernama Andi.", "Ubah alamat pasien ID 123.", "Konfirmasi pemulangan pasien." |
| **Rekam Medis** | Mengambil/Memperbarui/Meringkas Riwayat Medis, Diagnosis, Resep, Hasil Lab. | "Ambil riwayat diagnosis RME pasien Budi.", "Tambahkan resep obat untuk pasien." |
| **Penagihan dan Pembayaran** | Detail Tagihan, Pemrosesan Pembayaran, Pembuatan Faktur, Sengketa Keuangan. | "Berapa total tagihan pasien NIK 456?", "Proses pembayaran klaim asuransi.", "Buatkan faktur layanan radiologi." |
| **Penjadwalan Janji Temu** | Memesan, Mengubah, Membatalkan Janji Temu Dokter atau Layanan. | "Jadwalkan janji temu dengan Dr. Sari minggu depan.", "Batalkan janji temu pasien Toni." |
"#;

/// Default model for routing decisions
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini classifier client
#[derive(Clone)]
pub struct GeminiClassifier {
    /// API base URL (overridable for proxies and tests)
    base_url: String,
    /// Model identifier
    model: String,
    /// API key, sent via the `x-goog-api-key` header
    api_key: String,
    /// Decoding temperature (low for deterministic routing)
    temperature: f32,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiClassifier {
    /// Create a new Gemini classifier
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            temperature: 0.1,
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create from [`CoreConfig`]
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let mut classifier = Self::new(api_key);
        classifier.base_url = config.base_url.clone();
        classifier.model = config.model.clone();
        classifier.temperature = config.temperature;
        Some(classifier)
    }

    /// Create from environment variables
    ///
    /// Reads `GEMINI_API_KEY` (or `API_KEY`); returns `None` when
    /// neither is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_config(&CoreConfig::from_env())
    }

    /// Set the model identifier
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the generateContent endpoint URL
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Build the request body for one utterance
    fn request_body(&self, utterance: &str) -> serde_json::Value {
        serde_json::json!({
            "system_instruction": {
                "parts": [{ "text": ROUTING_POLICY }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": utterance }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "routing_decision": { "type": "STRING" },
                        "chosen_subagent": { "type": "STRING" },
                        "core_function_match": { "type": "STRING" },
                        "context_passed": { "type": "STRING" },
                    },
                    "required": [
                        "routing_decision",
                        "chosen_subagent",
                        "core_function_match",
                        "context_passed",
                    ],
                },
            },
        })
    }

    /// Extract the generated text from a generateContent response
    fn extract_text(data: &serde_json::Value) -> Option<&str> {
        let text = data
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()?;
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parse the generated text into a routing decision
    fn parse_routing_text(text: &str) -> Result<RoutingDecision, ClassifyError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[async_trait]
impl IntentClassifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn classify(&self, utterance: &str) -> Result<RoutingDecision, ClassifyError> {
        let response = self
            .http_client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(utterance))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Status { status, body });
        }

        let data: serde_json::Value = response.json().await?;
        let text = Self::extract_text(&data).ok_or(ClassifyError::EmptyResponse)?;
        Self::parse_routing_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let classifier = GeminiClassifier::new("test-key");
        assert_eq!(
            classifier.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let classifier = classifier
            .with_base_url("http://localhost:8080")
            .with_model("gemini-test");
        assert_eq!(
            classifier.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let classifier = GeminiClassifier::new("test-key");
        let body = classifier.request_body("Cek tagihan pasien ID 123");

        let system_text = body["system_instruction"]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(system_text.contains("Koordinator Sistem Rumah Sakit"));

        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Cek tagihan pasien ID 123"
        );

        let gen = &body["generationConfig"];
        assert!((gen["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(gen["responseMimeType"], "application/json");
        assert_eq!(
            gen["responseSchema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_extract_text() {
        let data = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "{\"routing_decision\":\"x\"}" }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(
            GeminiClassifier::extract_text(&data),
            Some("{\"routing_decision\":\"x\"}")
        );

        // Missing candidates
        assert_eq!(GeminiClassifier::extract_text(&serde_json::json!({})), None);

        // Blank text counts as no response
        let blank = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        });
        assert_eq!(GeminiClassifier::extract_text(&blank), None);
    }

    #[test]
    fn test_parse_routing_text() {
        let text = r#"{
            "routing_decision": "Permintaan menyangkut jadwal dokter",
            "chosen_subagent": "Penjadwalan Janji Temu",
            "core_function_match": "Memesan Janji Temu",
            "context_passed": "Jadwalkan janji temu dengan Dr. Sari"
        }"#;

        let decision = GeminiClassifier::parse_routing_text(text).unwrap();
        assert_eq!(decision.chosen_subagent, "Penjadwalan Janji Temu");

        // Schema violations and non-JSON both fail
        assert!(GeminiClassifier::parse_routing_text("{}").is_err());
        assert!(GeminiClassifier::parse_routing_text("not json").is_err());
    }
}
