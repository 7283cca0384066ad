mod config;

use tracing::{info, warn};

use lightbnb_db::{Database, Store};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightbnb=debug,lightbnb_db=debug,lightbnb_fixtures=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let store = Store::new(Database::open(&config.pool)?);

    match (&config.users_fixture, &config.properties_fixture) {
        (Some(users), Some(properties)) => {
            let users = lightbnb_fixtures::load_users(users)?;
            let properties = lightbnb_fixtures::load_properties(properties)?;
            lightbnb_fixtures::seed(&store, users, properties).await?;
        }
        (None, None) => {}
        _ => warn!(
            "Seeding needs both LIGHTBNB_USERS_FIXTURE and LIGHTBNB_PROPERTIES_FIXTURE; skipping"
        ),
    }

    // Confirm the pool reaches the store
    let titles = store.probe().await?;
    let total = store.property_count().await?;
    info!("LightBnB store ready: {} properties", total);
    for title in titles {
        info!("  {}", title);
    }

    Ok(())
}
