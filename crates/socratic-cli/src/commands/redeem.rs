// One-shot invitation redemption. The issued key is printed once; exporting
// it is the operator's job.

use clap::Args;
use colored::Colorize;
use socratic_core::engine::invites::{self, RedeemRequest};
use socratic_core::EngineResult;

#[derive(Args)]
pub struct RedeemArgs {
    /// Invitation code.
    pub code: String,
    #[arg(long)]
    pub organization: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
}

pub async fn run(args: RedeemArgs) -> EngineResult<()> {
    let response = invites::redeem(
        &args.code,
        &RedeemRequest {
            organization_name: args.organization,
            name: args.name,
            email: args.email,
        },
    )
    .await?;

    println!("{}", "Invitation redeemed.".bold());
    println!("Organization ID: {}", response.organization_id);
    if let Some(until) = response.valid_until {
        println!("Valid until:     {until}");
    }
    println!();
    println!("API key (store it now, it will not be shown again):");
    println!("{}", response.api_key.bold());
    println!();
    println!("export SENSAY_API_KEY_SECRET={}", response.api_key);
    Ok(())
}
