// ── Socratic Engine: Chat Session ──────────────────────────────────────────
// Owns the in-memory transcript for one subject and drives the configured
// reply provider. The front-end renders `messages()` and turns any returned
// error into recoverable on-screen text.
//
// Transcript invariant: an assistant entry is appended only after the
// provider succeeds, so a failed call leaves exactly the student's message
// and no empty or partial teacher turn.

use log::warn;

use crate::atoms::error::EngineResult;
use crate::atoms::types::ChatMessage;
use crate::engine::catalog::Subject;
use crate::engine::providers::ReplyProvider;

pub struct ChatSession<P: ReplyProvider> {
    subject: &'static Subject,
    provider: P,
    messages: Vec<ChatMessage>,
}

impl<P: ReplyProvider> ChatSession<P> {
    /// Start a session with the subject's greeting as the first teacher turn.
    pub fn new(subject: &'static Subject, provider: P) -> Self {
        ChatSession {
            subject,
            provider,
            messages: vec![ChatMessage::assistant(subject.greeting)],
        }
    }

    pub fn subject(&self) -> &'static Subject {
        self.subject
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send one student message and append the teacher's reply.
    ///
    /// On failure the student's message stays in the transcript (they did say
    /// it) and the error is returned for the front-end to display with its
    /// try-again affordance. No placeholder remnant is left behind.
    pub async fn send(&mut self, text: impl Into<String>) -> EngineResult<ChatMessage> {
        self.messages.push(ChatMessage::user(text));

        match self.provider.reply(self.subject, &self.messages).await {
            Ok(content) => {
                let reply = ChatMessage::assistant(content);
                self.messages.push(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                warn!("[chat] reply failed for {}: {e}", self.subject.id);
                Err(e)
            }
        }
    }
}
