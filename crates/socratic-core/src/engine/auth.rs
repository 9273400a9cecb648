// ── Socratic Engine: Auth Gate ─────────────────────────────────────────────
// One evaluation point for "who is the student?", polymorphic over the two
// sign-in mechanisms the product supports:
//   • hosted identity (Identity Toolkit email/password REST endpoints)
//   • wallet pseudo-auth (a browser-extension account address, validated by
//     shape and stored as the user id)
//
// Whatever the mechanism, the result is one `AuthState` persisted in
// `~/.socratic/session.json`. Protected commands call `require()` once and
// never consult the mechanisms directly.
//
// Identity security itself (password policy, token refresh, wallet
// cryptography) is delegated to the external services.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::atoms::constants::{FIREBASE_BASE_URL, SESSION_FILE, STATE_DIR};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::LocalUser;

// ── Auth state ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Firebase,
    Wallet,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Firebase => write!(f, "firebase"),
            AuthMethod::Wallet => write!(f, "wallet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { method: AuthMethod, user: LocalUser },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    method: AuthMethod,
    user: LocalUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token: Option<String>,
}

// ── Persistence ────────────────────────────────────────────────────────────

/// Reads and writes the persisted auth state. The CLI analog of the web
/// product's browser-local session.
pub struct AuthGate {
    path: PathBuf,
}

impl AuthGate {
    /// Gate backed by `~/.socratic/session.json`.
    pub fn open() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        AuthGate {
            path: home.join(STATE_DIR).join(SESSION_FILE),
        }
    }

    /// Gate backed by an explicit file (tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        AuthGate { path: path.into() }
    }

    /// The single evaluation point for protected commands.
    pub fn current(&self) -> AuthState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return AuthState::Unauthenticated,
        };
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) => AuthState::Authenticated {
                method: stored.method,
                user: stored.user,
            },
            Err(e) => {
                warn!("[auth] unreadable session file, treating as signed out: {e}");
                AuthState::Unauthenticated
            }
        }
    }

    /// Persist a successful sign-in.
    pub fn save(
        &self,
        method: AuthMethod,
        user: &LocalUser,
        id_token: Option<String>,
    ) -> EngineResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let stored = StoredSession { method, user: user.clone(), id_token };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        info!("[auth] signed in as {} via {method}", user.id);
        Ok(())
    }

    /// Sign out.
    pub fn clear(&self) -> EngineResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The redirect-to-login analog: the signed-in user, or an error telling
    /// the student how to sign in.
    pub fn require(&self) -> EngineResult<LocalUser> {
        match self.current() {
            AuthState::Authenticated { user, .. } => Ok(user),
            AuthState::Unauthenticated => Err(EngineError::Unknown(
                "You are not signed in. Run `socratic auth login` or `socratic auth wallet` first."
                    .into(),
            )),
        }
    }
}

// ── Hosted identity ────────────────────────────────────────────────────────

/// Email/password identity against the Identity Toolkit REST API. Only
/// `sign_in`/`sign_up` producing a `LocalUser` is consumed; everything else
/// about the identity service is opaque.
pub struct FirebaseIdentity {
    http: Client,
    api_key: String,
    base_url: String,
}

/// A successful sign-in: the identity plus the session token the service
/// issued for it.
#[derive(Debug)]
pub struct SignedIn {
    pub user: LocalUser,
    pub id_token: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, FIREBASE_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        FirebaseIdentity {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> EngineResult<SignedIn> {
        self.call("accounts:signInWithPassword", email, password).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> EngineResult<SignedIn> {
        self.call("accounts:signUp", email, password).await
    }

    async fn call(&self, endpoint: &str, email: &str, password: &str) -> EngineResult<SignedIn> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true
            }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.json::<Value>().await?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("sign-in failed")
                .to_string();
            return Err(classify_identity_error(status.as_u16(), message));
        }

        let id = body
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| EngineError::Unknown("identity response had no localId".into()))?
            .to_string();
        let id_token = body
            .get("idToken")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(SignedIn {
            user: LocalUser {
                id,
                email: body.get("email").and_then(Value::as_str).map(String::from),
                display_name: body
                    .get("displayName")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            },
            id_token,
        })
    }
}

/// Identity Toolkit reports credential problems as 400 with a code-like
/// message. Those are authentication failures; everything else follows the
/// standard status mapping.
fn classify_identity_error(status: u16, message: String) -> EngineError {
    const CREDENTIAL_CODES: [&str; 5] = [
        "EMAIL_NOT_FOUND",
        "INVALID_PASSWORD",
        "INVALID_LOGIN_CREDENTIALS",
        "USER_DISABLED",
        "EMAIL_EXISTS",
    ];
    if status == 400 && CREDENTIAL_CODES.iter().any(|c| message.starts_with(c)) {
        return EngineError::AuthenticationFailed;
    }
    EngineError::from_status(status, message)
}

// ── Wallet pseudo-auth ─────────────────────────────────────────────────────

/// Accept a wallet account address as an identity. The capability probe the
/// web product did against the browser extension becomes a shape check here:
/// a malformed address is a clear message, not a crash.
pub fn connect_wallet(address: &str) -> EngineResult<LocalUser> {
    let addr = address.trim();
    let hex = addr.strip_prefix("0x").ok_or_else(|| {
        EngineError::Unknown("That doesn't look like a wallet address (expected 0x...).".into())
    })?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::Unknown(
            "That doesn't look like a wallet address (expected 40 hex characters).".into(),
        ));
    }
    Ok(LocalUser {
        id: addr.to_lowercase(),
        email: None,
        display_name: None,
    })
}
