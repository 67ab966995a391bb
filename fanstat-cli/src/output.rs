use anyhow::Context;
use colored::Colorize;
use platforms_metrics::ProfileResult;

pub fn print_result(result: &ProfileResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).context("failed to serialize result")?
        );
        return Ok(());
    }

    if result.success {
        println!(
            "{} {}",
            "Account:".green(),
            result.username.as_deref().unwrap_or("<unknown>").cyan()
        );
        if let Some(avatar) = &result.avatar {
            println!("{} {}", "Avatar:".green(), avatar.blue());
        }
        println!(
            "{} {}",
            "Followers:".green(),
            result
                .follower
                .map(|n| n.to_string())
                .unwrap_or_else(|| "<unknown>".to_string())
                .cyan()
                .bold()
        );
    } else {
        println!(
            "{} {}",
            "Error:".red().bold(),
            result.message.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
