// ── Socratic Engine: Configuration ─────────────────────────────────────────
// All engine configuration is explicit: `EngineConfig` is built once (from
// the environment or by hand) and passed into providers and the provisioner
// at construction time. There is no hidden process-wide default, which keeps
// provisioning behavior a pure function of its inputs.
//
// A missing key for the selected backend is a configuration error detected
// here, eagerly, not a runtime failure discovered mid-chat.

use std::env;

use crate::atoms::constants::{FIREBASE_BASE_URL, GEMINI_BASE_URL, SENSAY_BASE_URL};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ReplyBackend, SlugMode};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Which reply backend `chat` talks to.
    pub backend: ReplyBackend,
    /// Sensay organization secret. Required for the sensay backend.
    pub sensay_api_key: Option<String>,
    /// Gemini API key. Required for the gemini backend.
    pub gemini_api_key: Option<String>,
    /// Identity Toolkit web API key. Required only for email/password login.
    pub firebase_api_key: Option<String>,
    pub sensay_base_url: String,
    pub gemini_base_url: String,
    pub firebase_base_url: String,
    /// Replica naming policy for provisioning.
    pub slug_mode: SlugMode,
}

impl EngineConfig {
    /// Read configuration from the environment.
    ///
    /// Variables: `SOCRATIC_BACKEND` (sensay|gemini, default sensay),
    /// `SENSAY_API_KEY_SECRET`, `GEMINI_API_KEY`, `FIREBASE_API_KEY`,
    /// `SENSAY_BASE_URL`, `GEMINI_BASE_URL`, `SOCRATIC_DEMO_SLUG`
    /// (presence switches provisioning into demo naming with that base).
    ///
    /// Callers that are about to chat should `validate()` the result so a
    /// missing backend key is reported before the first message, not during
    /// it. Auth-only commands skip validation: they don't need a chat key.
    pub fn from_env() -> EngineResult<Self> {
        let backend = match env::var("SOCRATIC_BACKEND") {
            Ok(v) => v.parse::<ReplyBackend>().map_err(EngineError::ConfigurationMissing)?,
            Err(_) => ReplyBackend::Sensay,
        };

        let slug_mode = match non_empty(env::var("SOCRATIC_DEMO_SLUG").ok()) {
            Some(base) => SlugMode::Demo { base },
            None => SlugMode::Deterministic,
        };

        let config = EngineConfig {
            backend,
            sensay_api_key: non_empty(env::var("SENSAY_API_KEY_SECRET").ok()),
            gemini_api_key: non_empty(env::var("GEMINI_API_KEY").ok()),
            firebase_api_key: non_empty(env::var("FIREBASE_API_KEY").ok()),
            sensay_base_url: env::var("SENSAY_BASE_URL")
                .unwrap_or_else(|_| SENSAY_BASE_URL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| GEMINI_BASE_URL.to_string()),
            firebase_base_url: FIREBASE_BASE_URL.to_string(),
            slug_mode,
        };
        Ok(config)
    }

    /// Check that the selected backend has its credential.
    pub fn validate(&self) -> EngineResult<()> {
        match self.backend {
            ReplyBackend::Sensay if self.sensay_api_key.is_none() => {
                Err(EngineError::ConfigurationMissing(
                    "Sensay organization secret (set SENSAY_API_KEY_SECRET)".into(),
                ))
            }
            ReplyBackend::Gemini if self.gemini_api_key.is_none() => {
                Err(EngineError::ConfigurationMissing(
                    "Gemini API key (set GEMINI_API_KEY)".into(),
                ))
            }
            _ => Ok(()),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        EngineConfig {
            backend: ReplyBackend::Sensay,
            sensay_api_key: Some("test-secret".into()),
            gemini_api_key: Some("test-key".into()),
            firebase_api_key: None,
            sensay_base_url: SENSAY_BASE_URL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            firebase_base_url: FIREBASE_BASE_URL.to_string(),
            slug_mode: SlugMode::Deterministic,
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
