use colored::*;

use atelier_api::StudioClient;
use atelier_config::Settings;

pub async fn show_subscription(settings: &Settings) -> anyhow::Result<()> {
    let client = StudioClient::new(settings)?;
    let status = client.subscription_status().await?;

    println!("{}", "Subscription".blue().bold());
    println!();
    println!("  {} {}", "Account:".bold(), client.session_email());
    println!("  {} {}", "Tier:".bold(), status.tier.to_string().cyan());

    if status.is_trial() {
        if let Some(ends) = status.trial_ends_at {
            println!(
                "  {} trial until {}",
                "Status:".bold(),
                ends.format("%Y-%m-%d").to_string().yellow()
            );
        }
    } else if status.is_active() {
        println!("  {} {}", "Status:".bold(), "active".green());
    } else {
        println!("  {} {}", "Status:".bold(), "lapsed".red());
    }

    if let Some(days) = status.days_remaining() {
        let label = if status.cancel_at_period_end {
            "ends in"
        } else {
            "renews in"
        };
        println!("  {} {} {} days", "Period:".bold(), label, days);
    }

    if status.allows_generator() {
        println!("  {} available", "Generator:".bold());
    } else {
        println!(
            "  {} locked, run 'atelier generate' to start checkout",
            "Generator:".bold()
        );
    }

    Ok(())
}
