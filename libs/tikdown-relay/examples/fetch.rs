//! Fetch one video through the relay list and print the result
//!
//! This example shows how to:
//! - Load configuration from `.env` and the environment
//! - Wire the reqwest transport into the retrieval service
//! - Render the result the way a front end would
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --example fetch -- https://www.tiktok.com/@user/video/123
//! ```

use anyhow::Context;
use tikdown_domain::{format_count, ApiResult, RetrievalService};
use tikdown_relay::{config_from_env, ReqwestTransport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let link = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TIKDOWN_LINK").ok())
        .context("usage: fetch <video link> (or set TIKDOWN_LINK)")?;

    let config = config_from_env()?;
    let service = RetrievalService::new(ReqwestTransport::new()?, config);

    match service.fetch_video(&link).await {
        ApiResult::Success(video) => {
            println!("{}", video.title);
            println!(
                "  by @{} ({})",
                video.author.unique_id, video.author.nickname
            );
            println!(
                "  {} views · {} likes · {} comments · {} shares",
                format_count(video.play_count),
                format_count(video.like_count),
                format_count(video.comment_count),
                format_count(video.share_count),
            );
            println!("  video: {}", video.best_play_url());
            println!("  audio: {}", video.music_url);
            println!("  cover: {}", video.cover_url);
        }
        ApiResult::Failure { msg, .. } => {
            eprintln!("{}", msg);
            std::process::exit(1);
        }
    }

    Ok(())
}
