// ── Socratic Atoms: Core Types ─────────────────────────────────────────────
// Data structures that flow through the entire engine.
// They are independent of any specific hosted backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identity ───────────────────────────────────────────────────────────────

/// An externally issued identity, obtained from the auth gate.
/// Immutable for the lifetime of a session; the engine never mints these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl LocalUser {
    /// Best-effort email for remote profile creation: the real address when
    /// the identity provider supplied one, a synthetic placeholder otherwise.
    pub fn email_or_placeholder(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| format!("{}@example.com", self.id))
    }

    /// Best-effort display name for remote profile creation.
    pub fn name_or_default(&self) -> String {
        self.display_name.clone().unwrap_or_else(|| "User".to_string())
    }
}

// ── Transcript ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Lives only in memory; ordering is insertion order.
/// Persistence, if any, happens inside the remote chat service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

// ── Replicas ───────────────────────────────────────────────────────────────

/// A remote conversational entity as listed by the hosted service.
/// `uuid` is assigned by the service; `slug` is chosen by us and must be
/// unique service-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaDescriptor {
    pub uuid: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "shortDescription")]
    pub short_description: String,
}

/// Naming policy for replica provisioning.
#[derive(Debug, Clone, PartialEq)]
pub enum SlugMode {
    /// One subject maps to one fixed slug (the subject's canonical id).
    /// A collision with a replica owned by another account is surfaced,
    /// never papered over with a generated name.
    Deterministic,
    /// Demo runs generate a fresh `{base}-{timestamp}-{suffix}` slug each
    /// session so repeated runs never collide.
    Demo { base: String },
}

// ── Backend selection ──────────────────────────────────────────────────────

/// Which reply backend a chat session talks to. Selected at configuration
/// time; both implement the same `ReplyProvider` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyBackend {
    Sensay,
    Gemini,
}

impl std::fmt::Display for ReplyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyBackend::Sensay => write!(f, "sensay"),
            ReplyBackend::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for ReplyBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sensay" => Ok(ReplyBackend::Sensay),
            "gemini" => Ok(ReplyBackend::Gemini),
            other => Err(format!("unknown backend '{other}' (expected 'sensay' or 'gemini')")),
        }
    }
}
