mod cli;
mod config;
mod output;

use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use platforms_metrics::extractor::dispatcher::Endpoints;
use platforms_metrics::extractor::platforms::douyin::SessionConfig;
use platforms_metrics::store::{JsonFileCookieStore, JsonFileCredentialStore};
use platforms_metrics::{Dispatcher, Platform};

use crate::cli::{Args, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_directive = if quiet {
        "off"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .expect("valid spinner template")
            .tick_strings(&["▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸", "▪▪▪▪▪"]),
    );
    pb.set_message(message.to_string());
    pb
}

fn build_dispatcher(config: &AppConfig) -> Dispatcher {
    let credentials = Arc::new(JsonFileCredentialStore::new(&config.credentials_path));
    let jar = Arc::new(JsonFileCookieStore::new(&config.cookie_jar_path));

    let endpoints = Endpoints {
        renderer: config.renderer_url.clone(),
        renderer_token: config.renderer_token.clone(),
        ..Endpoints::default()
    };

    Dispatcher::new(credentials, jar).with_endpoints(endpoints)
}

async fn run(args: Args) -> anyhow::Result<()> {
    init_logging(args.verbose, args.quiet);

    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::Query {
            platform,
            identifier,
            json,
        } => {
            let dispatcher = build_dispatcher(&config);

            let pb = (!json).then(|| spinner("Fetching follower count..."));
            let result = dispatcher.get_followers(&platform, &identifier).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            output::print_result(&result, json)?;
            if !result.success {
                process::exit(1);
            }
        }

        Commands::SetKey { platform, key } => {
            let platform = Platform::from_str(&platform)
                .map_err(|_| anyhow::anyhow!("unsupported platform '{platform}'"))?;
            let store = JsonFileCredentialStore::new(&config.credentials_path);
            store.set_key(platform, &key)?;
            println!("{} key stored for {}", "OK:".green().bold(), platform);
        }

        Commands::Keys => {
            let store = JsonFileCredentialStore::new(&config.credentials_path);
            let keys = store.load()?;
            for platform in [Platform::Youtube, Platform::Twitter] {
                let configured = keys
                    .get(&platform.to_string())
                    .is_some_and(|k| !k.trim().is_empty());
                let status = if configured {
                    "configured".green()
                } else {
                    "not configured".yellow()
                };
                println!("{platform}: {status}");
            }
        }

        Commands::Login {
            identifier,
            wait_secs,
        } => {
            let dispatcher = build_dispatcher(&config).with_session_config(SessionConfig {
                login_deadline: Some(Duration::from_secs(wait_secs)),
                ..SessionConfig::default()
            });

            println!(
                "Waiting up to {wait_secs}s for the login code to be scanned in the rendering service..."
            );
            let pb = spinner("Waiting for login...");
            let result = dispatcher.get_followers("douyin", &identifier).await;
            pb.finish_and_clear();

            if result.success {
                println!("{} session saved, cookie jar refreshed", "OK:".green().bold());
            } else {
                anyhow::bail!(
                    "login failed: {}",
                    result.message.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    Ok(())
}
