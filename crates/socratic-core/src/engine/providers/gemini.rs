// ── Socratic Engine: Direct-Generation Reply Provider ──────────────────────
// Stateless text generation against the Gemini API. The caller owns the full
// conversation history and resends it on every call, rendered as alternating
// "Student:"/"Teacher:" lines under the subject's persona prompt.
//
// The reply is one text blob. No chunk splitting or delayed reveal happens at
// this layer.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::atoms::constants::{GEMINI_BASE_URL, GEMINI_MODEL};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ChatMessage, ReplyBackend, Role};
use crate::engine::catalog::Subject;
use crate::engine::providers::ReplyProvider;
use crate::engine::sensay::extract_api_error;

pub struct GeminiProvider {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GEMINI_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        GeminiProvider {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: GEMINI_MODEL.to_string(),
        }
    }

    /// Persona block, then the transcript as "Student:"/"Teacher:" lines,
    /// then a trailing "Teacher:" cue for the model to complete.
    fn build_prompt(subject: &Subject, history: &[ChatMessage]) -> String {
        let conversation: String = history
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    Role::User => "Student",
                    Role::Assistant => "Teacher",
                };
                format!("{speaker}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nConversation History:\n{conversation}\n\nTeacher:",
            subject.persona_prompt
        )
    }

    fn extract_text(body: &Value) -> Option<String> {
        let parts = body
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl ReplyProvider for GeminiProvider {
    async fn reply(&self, subject: &Subject, history: &[ChatMessage]) -> EngineResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let prompt = Self::build_prompt(subject, history);
        debug!("[gemini] prompt is {} chars", prompt.len());

        info!("[gemini] request model={}", self.model);
        let resp = self
            .http
            .post(&url)
            .json(&json!({
                "contents": [{"parts": [{"text": prompt}]}]
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::from_status(
                status.as_u16(),
                extract_api_error(status, &body),
            ));
        }

        let body = resp.json::<Value>().await?;
        Self::extract_text(&body)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| EngineError::Unknown("No response received from Gemini API".into()))
    }

    fn backend(&self) -> ReplyBackend {
        ReplyBackend::Gemini
    }
}
