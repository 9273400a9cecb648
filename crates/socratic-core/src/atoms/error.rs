// ── Socratic Atoms: Error Types ────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants follow the taxonomy the front-end renders: every failure is
//     recoverable text on screen, never fatal to the process.
//   • Remote-call failures are classified from their HTTP status; a transport
//     error with no status is `Network`.
//   • `Unknown` preserves the upstream message verbatim.
//   • No variant carries secret material (API keys, passwords) in its message.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid or expired credential (HTTP 401 class).
    #[error("Invalid or expired API key. Please check your API key and try again.")]
    AuthenticationFailed,

    /// Credential lacks the required scope (HTTP 403 class).
    #[error("The API key does not have permission for this operation. Please check your account access level.")]
    PermissionDenied,

    /// Remote throttling (HTTP 429 class).
    #[error("Rate limit exceeded. Please wait a moment before trying again.")]
    RateLimited,

    /// Replica naming collision (HTTP 409 on creation). The slug is named so
    /// the operator can pick a different one instead of us silently retrying.
    #[error("A replica with slug \"{slug}\" already exists but couldn't be accessed. This typically happens when a replica with the same slug is owned by a different user. Try a different slug.")]
    SlugConflict { slug: String },

    /// Transport-level failure: DNS, connect, TLS, timeout.
    #[error("Network connection issue: {0}. Please check your internet connection and try again.")]
    Network(String),

    /// A required API key or environment value is absent. Detected eagerly at
    /// configuration time, distinct from runtime failures.
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    /// Filesystem or OS-level I/O failure (auth state file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all: the upstream message is shown verbatim.
    #[error("{0}")]
    Unknown(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        // Status-bearing errors are classified by the call sites that see the
        // response; anything arriving through this conversion is transport.
        EngineError::Network(e.to_string())
    }
}

impl EngineError {
    /// Classify a non-success HTTP status from a hosted service.
    ///
    /// 404 and 409 are deliberately absent: those are contextual (a missing
    /// user is expected during provisioning, a conflict means different
    /// things for users vs. replicas) and handled at the call site.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => EngineError::AuthenticationFailed,
            403 => EngineError::PermissionDenied,
            429 => EngineError::RateLimited,
            _ => EngineError::Unknown(message),
        }
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations return this type.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_is_authentication_failed() {
        assert!(matches!(
            EngineError::from_status(401, "Unauthorized".into()),
            EngineError::AuthenticationFailed
        ));
    }

    #[test]
    fn status_403_is_permission_denied() {
        assert!(matches!(
            EngineError::from_status(403, "Forbidden".into()),
            EngineError::PermissionDenied
        ));
    }

    #[test]
    fn status_429_is_rate_limited() {
        assert!(matches!(
            EngineError::from_status(429, "Too Many Requests".into()),
            EngineError::RateLimited
        ));
    }

    #[test]
    fn unclassified_status_preserves_message_verbatim() {
        let err = EngineError::from_status(500, "upstream exploded".into());
        assert_eq!(err.to_string(), "upstream exploded");
    }

    #[test]
    fn slug_conflict_names_the_slug() {
        let err = EngineError::SlugConflict { slug: "philosophy".into() };
        assert!(err.to_string().contains("\"philosophy\""));
    }
}
