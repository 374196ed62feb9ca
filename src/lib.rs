pub mod config;
pub mod database;
pub mod error;
pub mod redis_client;
pub mod models;
pub mod controllers;
pub mod middleware;
pub mod cache;
pub mod services;

use std::sync::Arc;
use tokio::task;
use tracing::info;

use services::{AccountService, BookingLifecycleService, CatalogService, JwtKeys};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub redis: redis_client::RedisClient,
    pub cache: cache::CacheService,
    pub config: config::Config,
    pub catalog: CatalogService,
    pub bookings: BookingLifecycleService,
    pub accounts: AccountService,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(
            &config.database.url,
            config.database.pool_size,
            config.database.query_timeout(),
        )
        .await?;
        info!("Database connected");

        db.run_migrations().await?;

        let redis = redis_client::RedisClient::new(&config.redis.url).await?;
        info!("Redis connected");

        let catalog = CatalogService::new(db.clone());
        let cache = cache::CacheService::new(redis.clone(), catalog.clone(), config.redis.catalog_ttl_seconds);
        let bookings = BookingLifecycleService::new(db.clone(), catalog.clone(), config.booking.clone());
        let accounts = AccountService::new(db.clone(), JwtKeys::new(&config.jwt));

        let state = Arc::new(Self {
            db,
            redis,
            cache,
            config,
            catalog,
            bookings,
            accounts,
        });

        let state_for_bg = state.clone();
        task::spawn(async move {
            // Warmup cache в фоне
            state_for_bg.cache.warmup_cache().await;
        });

        Ok(state)
    }
}
