// The chat screen: auth gate, provisioning, then a read loop.
//
// Flow matches the engine contract: the gate is evaluated once, the session
// opens with the subject greeting, and every send either appends a teacher
// turn or prints a recoverable error with a try-again affordance. Replica
// provisioning happens lazily inside the first send.

use clap::Args;
use colored::Colorize;
use log::info;
use rustyline::error::ReadlineError;
use socratic_core::engine::catalog;
use socratic_core::engine::providers::SensayReplyProvider;
use socratic_core::engine::sensay::SensayClient;
use socratic_core::engine::session::SessionProvisioner;
use socratic_core::{
    AnyProvider, AuthGate, ChatSession, EngineConfig, EngineError, EngineResult, ReplyBackend,
};

#[derive(Args)]
pub struct ChatArgs {
    /// Subject id (see `socratic subjects`).
    pub subject: String,
    /// Override the configured reply backend (sensay or gemini).
    #[arg(long)]
    pub backend: Option<ReplyBackend>,
    /// Skip provisioning and chat against this known replica uuid
    /// (sensay backend only).
    #[arg(long)]
    pub replica_uuid: Option<String>,
}

pub async fn run(args: ChatArgs) -> EngineResult<()> {
    let subject = catalog::find(&args.subject).ok_or_else(|| {
        EngineError::Unknown(format!(
            "Unknown subject '{}'. Run `socratic subjects` to see what's available.",
            args.subject
        ))
    })?;

    // One evaluation point for the whole protected screen.
    let user = AuthGate::open().require()?;

    let mut config = EngineConfig::from_env()?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    // Eager: a missing key fails here, not mid-conversation.
    config.validate()?;

    let provider = match (&config.backend, args.replica_uuid) {
        (ReplyBackend::Sensay, Some(uuid)) => {
            let secret = config.sensay_api_key.clone().ok_or_else(|| {
                EngineError::ConfigurationMissing(
                    "Sensay organization secret (set SENSAY_API_KEY_SECRET)".into(),
                )
            })?;
            let client = SensayClient::with_base_url(secret, &config.sensay_base_url);
            let provisioner =
                SessionProvisioner::with_known_uuid(client.clone(), config.slug_mode.clone(), uuid);
            AnyProvider::new(Box::new(SensayReplyProvider::new(
                client,
                provisioner,
                user.clone(),
            )))
        }
        _ => AnyProvider::from_config(&config, &user)?,
    };
    info!("[cli] chatting about {} via {}", subject.id, provider.backend());

    let mut session = ChatSession::new(subject, provider);
    println!("{} — {}", subject.teacher.bold().yellow(), subject.name);
    println!("{}", session.messages()[0].content);
    println!("{}", "(Ctrl-D to leave the classroom)".dimmed());

    let mut editor =
        rustyline::DefaultEditor::new().map_err(|e| EngineError::Unknown(e.to_string()))?;
    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(EngineError::Unknown(e.to_string())),
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(text);

        match session.send(text).await {
            Ok(reply) => {
                println!();
                println!("{}: {}", subject.teacher.bold().yellow(), reply.content);
                println!();
            }
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                eprintln!("{}", "Your message was not answered. Please try again.".dimmed());
            }
        }
    }

    println!("Class dismissed.");
    Ok(())
}
