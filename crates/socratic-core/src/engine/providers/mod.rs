// ── Socratic Engine: Reply Providers ───────────────────────────────────────
// Two interchangeable backends produce teacher replies:
//   • sensay — hosted replica, the remote service owns conversation memory
//   • gemini — stateless generation, we own and resend the full history
//
// Both satisfy the same observable contract: `(subject, history) -> reply`,
// classified errors, and no retry of their own. Retry policy belongs to the
// caller, and in this product there is none: one failed attempt surfaces to
// the student with a try-again affordance.

pub mod gemini;
pub mod sensay;

pub use gemini::GeminiProvider;
pub use sensay::SensayReplyProvider;

use async_trait::async_trait;

use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ChatMessage, LocalUser, ReplyBackend};
use crate::engine::catalog::Subject;
use crate::engine::config::EngineConfig;
use crate::engine::sensay::SensayClient;
use crate::engine::session::SessionProvisioner;

// ── The provider seam ──────────────────────────────────────────────────────

/// One teacher utterance per call. `history` is the full visible transcript
/// including the newest student message; whether it is actually transmitted
/// depends on the backend's memory model.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn reply(&self, subject: &Subject, history: &[ChatMessage]) -> EngineResult<String>;

    fn backend(&self) -> ReplyBackend;
}

// ── Provider factory ───────────────────────────────────────────────────────

/// Type-erased reply provider. Callers hold `AnyProvider` and call `.reply()`
/// without knowing which concrete backend is in use.
pub struct AnyProvider(Box<dyn ReplyProvider>);

impl std::fmt::Debug for AnyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AnyProvider").field(&self.backend()).finish()
    }
}

impl AnyProvider {
    /// Wrap an already-built provider.
    pub fn new(provider: Box<dyn ReplyProvider>) -> Self {
        AnyProvider(provider)
    }

    /// Construct the configured backend for `user`.
    ///
    /// The required API key was already checked eagerly by
    /// `EngineConfig::from_env`, but absence is re-reported here as
    /// `ConfigurationMissing` for callers that assemble configs by hand.
    pub fn from_config(config: &EngineConfig, user: &LocalUser) -> EngineResult<Self> {
        let provider: Box<dyn ReplyProvider> = match config.backend {
            ReplyBackend::Sensay => {
                let secret = config.sensay_api_key.as_deref().ok_or_else(|| {
                    EngineError::ConfigurationMissing(
                        "Sensay organization secret (set SENSAY_API_KEY_SECRET)".into(),
                    )
                })?;
                let client = SensayClient::with_base_url(secret, &config.sensay_base_url);
                let provisioner = SessionProvisioner::new(client.clone(), config.slug_mode.clone());
                Box::new(SensayReplyProvider::new(client, provisioner, user.clone()))
            }
            ReplyBackend::Gemini => {
                let key = config.gemini_api_key.as_deref().ok_or_else(|| {
                    EngineError::ConfigurationMissing("Gemini API key (set GEMINI_API_KEY)".into())
                })?;
                Box::new(GeminiProvider::with_base_url(key, &config.gemini_base_url))
            }
        };
        Ok(AnyProvider(provider))
    }

    pub fn backend(&self) -> ReplyBackend {
        self.0.backend()
    }
}

#[async_trait]
impl ReplyProvider for AnyProvider {
    async fn reply(&self, subject: &Subject, history: &[ChatMessage]) -> EngineResult<String> {
        self.0.reply(subject, history).await
    }

    fn backend(&self) -> ReplyBackend {
        self.0.backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::SlugMode;

    fn user() -> LocalUser {
        LocalUser { id: "u1".into(), email: None, display_name: None }
    }

    #[test]
    fn missing_gemini_key_is_configuration_missing() {
        let config = EngineConfig {
            backend: ReplyBackend::Gemini,
            gemini_api_key: None,
            ..EngineConfig::for_tests()
        };
        let err = AnyProvider::from_config(&config, &user()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationMissing(_)));
    }

    #[test]
    fn missing_sensay_secret_is_configuration_missing() {
        let config = EngineConfig {
            backend: ReplyBackend::Sensay,
            sensay_api_key: None,
            ..EngineConfig::for_tests()
        };
        let err = AnyProvider::from_config(&config, &user()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigurationMissing(_)));
    }

    /// `Result` combinators over `AnyProvider` (as the tests above use)
    /// need it to be `Debug`; the formatting names the wrapped backend.
    #[test]
    fn provider_debug_names_the_backend() {
        let config = EngineConfig {
            backend: ReplyBackend::Gemini,
            gemini_api_key: Some("k".into()),
            ..EngineConfig::for_tests()
        };
        let provider = AnyProvider::from_config(&config, &user()).unwrap();
        assert_eq!(format!("{provider:?}"), "AnyProvider(Gemini)");
    }

    #[test]
    fn factory_selects_the_configured_backend() {
        let config = EngineConfig {
            backend: ReplyBackend::Gemini,
            gemini_api_key: Some("k".into()),
            ..EngineConfig::for_tests()
        };
        assert_eq!(
            AnyProvider::from_config(&config, &user()).unwrap().backend(),
            ReplyBackend::Gemini
        );

        let config = EngineConfig {
            backend: ReplyBackend::Sensay,
            sensay_api_key: Some("s".into()),
            slug_mode: SlugMode::Deterministic,
            ..EngineConfig::for_tests()
        };
        assert_eq!(
            AnyProvider::from_config(&config, &user()).unwrap().backend(),
            ReplyBackend::Sensay
        );
    }
}
