// Sign-in commands. Both mechanisms land in the same stored `AuthState`,
// which `chat` checks exactly once.

use clap::Subcommand;
use colored::Colorize;
use socratic_core::engine::auth::{connect_wallet, AuthGate, AuthMethod, AuthState, FirebaseIdentity};
use socratic_core::{EngineConfig, EngineError, EngineResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in (or sign up) with email and password.
    Login {
        #[arg(long)]
        email: String,
        /// Read from the terminal when omitted.
        #[arg(long)]
        password: Option<String>,
        /// Create the account instead of signing in.
        #[arg(long)]
        create: bool,
    },
    /// Sign in with a wallet account address.
    Wallet { address: String },
    /// Show who is signed in.
    Status,
    /// Sign out.
    Logout,
}

pub async fn run(action: AuthAction) -> EngineResult<()> {
    let gate = AuthGate::open();

    match action {
        AuthAction::Login { email, password, create } => {
            let config = EngineConfig::from_env()?;
            let api_key = config.firebase_api_key.ok_or_else(|| {
                EngineError::ConfigurationMissing(
                    "identity provider web API key (set FIREBASE_API_KEY)".into(),
                )
            })?;
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };

            let identity = FirebaseIdentity::new(api_key);
            let signed_in = if create {
                identity.sign_up(&email, &password).await?
            } else {
                identity.sign_in(&email, &password).await?
            };
            gate.save(AuthMethod::Firebase, &signed_in.user, Some(signed_in.id_token))?;
            println!("Signed in as {}", email.bold());
        }
        AuthAction::Wallet { address } => {
            let user = connect_wallet(&address)?;
            gate.save(AuthMethod::Wallet, &user, None)?;
            println!("Connected wallet {}", user.id.bold());
        }
        AuthAction::Status => match gate.current() {
            AuthState::Authenticated { method, user } => {
                let label = user.email.as_deref().unwrap_or(&user.id);
                println!("Signed in as {} (via {method})", label.bold());
            }
            AuthState::Unauthenticated => println!("Not signed in."),
        },
        AuthAction::Logout => {
            gate.clear()?;
            println!("Signed out.");
        }
    }
    Ok(())
}

fn prompt(label: &str) -> EngineResult<String> {
    let mut editor = rustyline::DefaultEditor::new()
        .map_err(|e| EngineError::Unknown(e.to_string()))?;
    editor
        .readline(label)
        .map(|s| s.trim().to_string())
        .map_err(|e| EngineError::Unknown(e.to_string()))
}
