#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use chrono::TimeZone;
use fbscheduler::{Attachment, JsonFileStore, Post, Scheduler};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage: schedule UNIX_TIME MESSAGE [LINK]";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config_path = std::env::var("FBSCHEDULER_CONFIG")?;
    let mut args = std::env::args().skip(1);
    let when = chrono::Utc
        .timestamp_opt(
            args.next()
                .context(USAGE)?
                .parse::<i64>()
                .context("failed to parse publish time")?,
            0,
        )
        .single()
        .context("publish time out of range")?;
    let message = args.next().context(USAGE)?;
    let attachment = match args.next() {
        Some(url) => Attachment::Link { url },
        None => Attachment::None,
    };

    let scheduler = Scheduler::new(JsonFileStore::new(config_path));
    let post = Post {
        message,
        attachment,
        ..Default::default()
    }
    .scheduled_at(when);
    scheduler.schedule(post).await?;

    Ok(())
}
