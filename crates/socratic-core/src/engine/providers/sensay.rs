// ── Socratic Engine: Hosted-Replica Reply Provider ─────────────────────────
// Chat completions against a provisioned Sensay replica. The remote service
// keeps the conversation memory, so each call transmits only the newest
// student utterance; the local transcript exists for display alone.

use async_trait::async_trait;

use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::{ChatMessage, LocalUser, ReplyBackend, Role};
use crate::engine::catalog::Subject;
use crate::engine::providers::ReplyProvider;
use crate::engine::sensay::SensayClient;
use crate::engine::session::SessionProvisioner;

pub struct SensayReplyProvider {
    client: SensayClient,
    provisioner: SessionProvisioner,
    user: LocalUser,
}

impl SensayReplyProvider {
    pub fn new(client: SensayClient, provisioner: SessionProvisioner, user: LocalUser) -> Self {
        SensayReplyProvider { client, provisioner, user }
    }
}

#[async_trait]
impl ReplyProvider for SensayReplyProvider {
    async fn reply(&self, subject: &Subject, history: &[ChatMessage]) -> EngineResult<String> {
        let uuid = self.provisioner.ensure_replica(&self.user, subject).await?;

        let utterance = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .ok_or_else(|| EngineError::Unknown("no student message to send".into()))?;

        self.client
            .user_scoped(self.user.id.as_str())
            .chat_completion(&uuid, utterance)
            .await
    }

    fn backend(&self) -> ReplyBackend {
        ReplyBackend::Sensay
    }
}
