#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use fbscheduler::{ConfigStore, ConfigurationSubmission, JsonFileStore, Scheduler};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config_path = std::env::var("FBSCHEDULER_CONFIG")?;
    let temp_token = std::env::args()
        .nth(1)
        .context("usage: exchange USER_ACCESS_TOKEN [PAGE_ID]")?;
    let page_id = std::env::args().nth(2);

    let scheduler = Scheduler::new(JsonFileStore::new(config_path));
    let mut configuration = scheduler.store().load()?;
    if let Ok(app_id) = std::env::var("FACEBOOK_APP_ID") {
        configuration.app_id = app_id;
    }
    if let Ok(app_secret) = std::env::var("FACEBOOK_APP_SECRET") {
        configuration.app_secret = app_secret;
    }

    let saved = match scheduler
        .save_configuration(ConfigurationSubmission {
            configuration,
            user_access_token: Some(temp_token),
        })
        .await
    {
        Ok(saved) => saved,
        Err(err) => {
            eprintln!("{} {}", err.status_code(), err.user_message());
            return Err(err.into());
        }
    };

    let pages = scheduler.pages().await?;
    for page in &pages {
        println!("{}\t{}", page.id, page.name);
    }

    if let Some(page_id) = page_id {
        let page = pages
            .iter()
            .find(|page| page.id == page_id)
            .context("page not found among managed pages")?;
        let mut configuration = saved;
        configuration.select_page(page);
        scheduler.store().persist(&configuration)?;
    }

    Ok(())
}
