mod app;
mod config;
mod error;
mod handlers;
mod line;
mod render;
mod state;

use clap::Parser;
use config::Config;
use line::LineClient;
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zipline_cache::RedisUrlCache;
use zipline_generator::SaltedHashGenerator;
use zipline_resolver::ResolverService;
use zipline_shortener::ShortenerService;
use zipline_storage::MySqlRepository;

/// How often expired rows are physically purged from the store.
const PURGE_INTERVAL: Duration = Duration::from_secs(3_600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::parse();

    let repository = MySqlRepository::connect(&config.database_url).await?;
    repository.migrate().await?;
    let repository = Arc::new(repository);
    info!("connected to mysql");

    let redis_client = redis::Client::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    let cache = Arc::new(RedisUrlCache::new(redis_conn));
    info!("connected to redis");

    let shortener = Arc::new(ShortenerService::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
        Arc::new(SaltedHashGenerator::new()),
    ));
    let resolver = Arc::new(ResolverService::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
    ));

    // Reads already filter on expiry; this loop reclaims dead rows.
    let purge_repo = Arc::clone(&repository);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(e) = purge_repo.purge_expired().await {
                warn!(error = %e, "purge of expired rows failed");
            }
        }
    });

    let mut state = AppState::new(shortener, resolver, config.public_base_url.clone());
    match (
        config.line_channel_token.clone(),
        config.line_channel_secret.clone(),
    ) {
        (Some(token), Some(secret)) => {
            state = state.with_line(LineClient::new(token, secret));
            info!("line bot webhook enabled");
        }
        (None, None) => {}
        _ => warn!("line bot disabled: CHANNELTOKEN and CHANNELSECRET must both be set"),
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, public_url = %config.public_base_url, "starting gateway");
    axum::serve(listener, app::router(state)).await?;

    Ok(())
}
