use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query follower counts across social platforms", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Silence all logs
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the follower count for one account
    Query {
        /// Platform name (bilibili, youtube, twitter, telegram,
        /// telegram_group, xiaohongshu, douyin, ...)
        platform: String,

        /// Platform-scoped account identifier (UID, handle, or slug)
        identifier: String,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store an API key for a key-gated platform
    SetKey {
        /// Platform name (youtube or twitter)
        platform: String,

        /// The API key or bearer token
        key: String,
    },

    /// Show which platforms have an API key configured
    Keys,

    /// Run an attended douyin login: opens a session, waits for the
    /// login code to be scanned, and refreshes the cookie jar
    Login {
        /// Account identifier to verify the refreshed session against
        identifier: String,

        /// How long to wait for the code to be scanned, in seconds
        #[arg(long, default_value_t = 120)]
        wait_secs: u64,
    },
}
