// ── Socratic Atoms: Service Constants ──────────────────────────────────────
// Fixed identifiers for the hosted services. Base URLs can be overridden
// through configuration (useful for tests and self-hosted gateways).

/// Default Sensay API root.
pub const SENSAY_BASE_URL: &str = "https://api.sensay.io";

/// Sensay API version header value (`X-API-Version`).
pub const SENSAY_API_VERSION: &str = "2025-03-25";

/// Default Gemini generative-language API root.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini model used for direct generation.
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

/// LLM fixed into every replica creation payload.
pub const REPLICA_LLM_MODEL: &str = "claude-3-7-sonnet-latest";

/// Memory mode fixed into every replica creation payload.
pub const REPLICA_MEMORY_MODE: &str = "prompt-caching";

/// `source` tag attached to chat completion requests.
pub const CHAT_SOURCE: &str = "web";

/// Default Identity Toolkit API root (hosted email/password identity).
pub const FIREBASE_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Directory under the user's home holding CLI state (auth session).
pub const STATE_DIR: &str = ".socratic";

/// Auth session file name inside [`STATE_DIR`].
pub const SESSION_FILE: &str = "session.json";
