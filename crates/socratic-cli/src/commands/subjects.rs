// Subject selection screen, terminal edition.

use colored::Colorize;
use socratic_core::engine::catalog;
use socratic_core::EngineResult;

pub fn run() -> EngineResult<()> {
    for subject in catalog::all() {
        println!(
            "{}  {} ({})",
            subject.id.bold().yellow(),
            subject.name,
            subject.teacher
        );
        println!("    {}", subject.description.dimmed());
    }
    println!();
    println!("Start a conversation with: {}", "socratic chat <subject>".bold());
    Ok(())
}
