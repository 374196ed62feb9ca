use crate::{redis_client::RedisClient, services::CatalogService};
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

pub mod catalog;

/// Кеш справочников поверх Redis. Места и сеансы сюда не попадают никогда:
/// все решения о доступности принимаются по свежему чтению из Postgres.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    catalog: CatalogService,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, catalog: CatalogService, ttl_seconds: u64) -> Self {
        Self { redis, catalog, ttl_seconds }
    }

    // Прогрев кеша при старте
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");

        let today = chrono::Utc::now().date_naive();
        let _ = self.upcoming_movies(today).await;

        info!("Cache warmup done");
    }

    // === Работа с кешем ===

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: String = conn.get(key).await?;
        serde_json::from_str(&data).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
        })
    }

    async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(value).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(key, data, self.ttl_seconds).await
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;
        if !keys.is_empty() {
            let _: () = conn.del(&keys).await?;
        }
        Ok(keys.len())
    }
}
