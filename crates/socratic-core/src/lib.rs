// Socratic core engine library.
//
// An AI tutoring chat engine over two hosted backends: Sensay conversational
// replicas (the service owns conversation memory) and Gemini direct
// generation (we own the history and resend it each call). The engine
// provisions remote users and replicas on demand, classifies every remote
// failure into recoverable user-facing text, and never crashes the process
// over a remote error.

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult};
pub use atoms::types::{ChatMessage, LocalUser, ReplyBackend, Role, SlugMode};
pub use engine::auth::{AuthGate, AuthMethod, AuthState};
pub use engine::catalog::Subject;
pub use engine::chat::ChatSession;
pub use engine::config::EngineConfig;
pub use engine::providers::{AnyProvider, ReplyProvider};
pub use engine::session::SessionProvisioner;
