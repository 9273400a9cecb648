// Socratic CLI — terminal front-end for the tutoring engine.
//
// Thin layer over socratic-core: argument parsing, the interactive read
// loop, and rendering. Every engine error is recoverable text on stderr,
// never a panic.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "socratic", version, about = "Chat with an AI teacher that tutors by asking questions.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available subjects and their teachers.
    Subjects,
    /// Sign in, check, or clear the stored session.
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Start a tutoring conversation for a subject.
    Chat(commands::chat::ChatArgs),
    /// Redeem an invitation code for a Sensay organization API key.
    Redeem(commands::redeem::RedeemArgs),
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Subjects => commands::subjects::run(),
        Command::Auth { action } => commands::auth::run(action).await,
        Command::Chat(args) => commands::chat::run(args).await,
        Command::Redeem(args) => commands::redeem::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}
